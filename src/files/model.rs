/// Mime type reported for collections.
pub const DIR_TYPE: &str = "DIR";

/// Where a folder's storage comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MountType {
    #[default]
    Internal,
    External,
    Group,
}

impl MountType {
    /// `nc:mount-type` value; anything unrecognised is internal storage.
    pub fn parse(value: &str) -> Self {
        match value {
            "external" => MountType::External,
            "group" => MountType::Group,
            _ => MountType::Internal,
        }
    }
}

/// Kind of share a sharee holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShareType {
    User,
    Group,
    PublicLink,
    Email,
    Contact,
    Federated,
    Circle,
    Guest,
    FederatedGroup,
    Room,
    Deck,
    Unknown(i32),
}

impl ShareType {
    pub fn from_value(value: i32) -> Self {
        match value {
            0 => ShareType::User,
            1 => ShareType::Group,
            3 => ShareType::PublicLink,
            4 => ShareType::Email,
            5 => ShareType::Contact,
            6 => ShareType::Federated,
            7 => ShareType::Circle,
            8 => ShareType::Guest,
            9 => ShareType::FederatedGroup,
            10 => ShareType::Room,
            12 => ShareType::Deck,
            other => ShareType::Unknown(other),
        }
    }

    pub fn value(self) -> i32 {
        match self {
            ShareType::User => 0,
            ShareType::Group => 1,
            ShareType::PublicLink => 3,
            ShareType::Email => 4,
            ShareType::Contact => 5,
            ShareType::Federated => 6,
            ShareType::Circle => 7,
            ShareType::Guest => 8,
            ShareType::FederatedGroup => 9,
            ShareType::Room => 10,
            ShareType::Deck => 12,
            ShareType::Unknown(other) => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareeUser {
    pub user_id: Option<String>,
    pub display_name: Option<String>,
    pub share_type: Option<ShareType>,
}

/// A file or folder as reported by the server.
///
/// Timestamps are milliseconds since the Unix epoch, `0` when unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    /// Path below the user's files root, starting with `/`; folders end with `/`.
    pub remote_path: String,
    pub name: String,
    pub mime_type: String,
    /// `d:getcontentlength`
    pub length: i64,
    /// `oc:size`, which for folders is the size of the whole subtree; `-1` when unknown.
    pub size: i64,
    pub creation_timestamp: i64,
    pub modified_timestamp: i64,
    pub upload_timestamp: i64,
    pub etag: String,
    pub permissions: Option<String>,
    /// `oc:id`
    pub remote_id: Option<String>,
    /// `oc:fileid`, `-1` when absent.
    pub local_id: i64,
    pub is_favorite: bool,
    pub is_encrypted: bool,
    pub has_preview: bool,
    pub is_hidden: bool,
    pub is_locked: bool,
    pub mount_type: MountType,
    pub owner_id: Option<String>,
    pub owner_display_name: Option<String>,
    pub unread_comments_count: u32,
    pub note: Option<String>,
    pub rich_workspace: Option<String>,
    pub quota_used_bytes: Option<i64>,
    pub quota_available_bytes: Option<i64>,
    pub sharees: Vec<ShareeUser>,
    pub tags: Vec<String>,
}

impl Default for RemoteFile {
    fn default() -> Self {
        Self {
            remote_path: String::new(),
            name: String::new(),
            mime_type: String::new(),
            length: 0,
            size: 0,
            creation_timestamp: 0,
            modified_timestamp: 0,
            upload_timestamp: 0,
            etag: String::new(),
            permissions: None,
            remote_id: None,
            local_id: -1,
            is_favorite: false,
            is_encrypted: false,
            has_preview: false,
            is_hidden: false,
            is_locked: false,
            mount_type: MountType::Internal,
            owner_id: None,
            owner_display_name: None,
            unread_comments_count: 0,
            note: None,
            rich_workspace: None,
            quota_used_bytes: None,
            quota_available_bytes: None,
            sharees: Vec::new(),
            tags: Vec::new(),
        }
    }
}

impl RemoteFile {
    pub fn new(remote_path: impl Into<String>) -> Self {
        Self {
            remote_path: remote_path.into(),
            ..Self::default()
        }
    }

    pub fn is_folder(&self) -> bool {
        self.mime_type == DIR_TYPE
    }
}
