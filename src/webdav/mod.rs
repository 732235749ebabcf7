pub mod client;
pub mod properties;
pub mod streaming;
pub mod types;
pub mod xml;

pub use client::NextcloudClient;
pub use properties::{ALL_PROPERTIES, DavProperty, Namespace};
pub use streaming::{parse_multistatus_bytes, parse_multistatus_bytes_visit};
pub use types::{AuthMode, DavEntry, DavProperties, DavRequest, DavResponse, DavSharee, Depth};
pub use xml::{build_propfind_body, build_proppatch_body, escape_xml};
