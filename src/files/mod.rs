pub mod create_folder;
pub mod mapper;
pub mod model;
pub mod read_file;
pub mod read_folder;
pub mod toggle_favorite;
pub mod utils;

pub use create_folder::CreateFolderRemoteOperation;
pub use mapper::{ReadMode, WebDavFileUtils};
pub use model::{DIR_TYPE, MountType, RemoteFile, ShareType, ShareeUser};
pub use read_file::ReadFileRemoteOperation;
pub use read_folder::{PropFindResult, ReadFolderRemoteOperation};
pub use toggle_favorite::ToggleFavoriteRemoteOperation;
