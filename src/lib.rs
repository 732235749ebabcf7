//! Asynchronous Nextcloud / ownCloud client library.
//!
//! Turns file-management calls into authenticated WebDAV and OCS requests and
//! reports every outcome through a [`RemoteOperationResult`]. Built on hyper 1.x,
//! rustls and tokio.
//!
//! # Features
//!
//! - Folder creation with optional creation of missing parents
//! - Favorite toggling (challenge-driven and preemptive authentication)
//! - Folder listings and single-file reads mapped to [`RemoteFile`]
//! - Server capabilities with conditional (`If-None-Match`) refresh
//! - Streaming multistatus parsing, automatic response decompression (br/zstd/gzip)
//!
//! # Example
//!
//! ```no_run
//! use nc_dav_rs::{
//!     CreateFolderRemoteOperation, NextcloudClient, ReadFolderRemoteOperation, RemoteOperation,
//! };
//! use anyhow::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = NextcloudClient::new("https://cloud.example.com", "alice", "secret")?;
//!
//!     let created = CreateFolderRemoteOperation::new("/Photos/2024/", true)
//!         .run(&client)
//!         .await;
//!     println!("create: {:?}", created.code());
//!
//!     let listing = ReadFolderRemoteOperation::new("/Photos/").run(&client).await;
//!     for file in listing.data().into_iter().flatten() {
//!         println!("{} {}", file.remote_path, file.mime_type);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! [`ClientConfig::from_env`] and [`ServerSettings::from_env`] read `NEXTCLOUD_*`
//! variables, loading a `.env` file first when present.

pub mod common;
pub mod files;
pub mod operations;
pub mod status;
pub mod webdav;

pub use common::auth::{Authenticator, Credentials, Exchange, NextcloudAuthenticator};
pub use common::config::{ClientConfig, ServerSettings};
pub use common::error::DavError;
pub use common::http::{HttpTransport, HyperTransport};
pub use files::{
    CreateFolderRemoteOperation, MountType, PropFindResult, ReadFileRemoteOperation,
    ReadFolderRemoteOperation, ReadMode, RemoteFile, ShareType, ShareeUser,
    ToggleFavoriteRemoteOperation, WebDavFileUtils,
};
pub use operations::{RemoteOperation, RemoteOperationResult, ResultCode};
pub use status::{
    CapabilityBooleanType, E2EVersion, GetCapabilitiesRemoteOperation, OCCapability,
    OwnCloudVersion,
};
pub use webdav::{
    DavEntry, DavRequest, DavResponse, Depth, NextcloudClient, parse_multistatus_bytes,
};
