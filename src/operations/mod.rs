pub mod operation;
pub mod result;

pub use operation::RemoteOperation;
pub use result::{RemoteOperationResult, ResultCode};
