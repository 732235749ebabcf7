pub mod capability;
pub mod get_capabilities;
pub mod version;

pub use capability::{CapabilityBooleanType, E2EVersion, OCCapability};
pub use get_capabilities::GetCapabilitiesRemoteOperation;
pub use version::OwnCloudVersion;
