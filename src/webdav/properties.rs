//! Property names understood by the files endpoint.

pub const NAMESPACE_DAV: &str = "DAV:";
pub const NAMESPACE_OC: &str = "http://owncloud.org/ns";
pub const NAMESPACE_NC: &str = "http://nextcloud.org/ns";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Dav,
    OwnCloud,
    Nextcloud,
}

impl Namespace {
    pub fn prefix(self) -> &'static str {
        match self {
            Namespace::Dav => "d",
            Namespace::OwnCloud => "oc",
            Namespace::Nextcloud => "nc",
        }
    }

    pub fn uri(self) -> &'static str {
        match self {
            Namespace::Dav => NAMESPACE_DAV,
            Namespace::OwnCloud => NAMESPACE_OC,
            Namespace::Nextcloud => NAMESPACE_NC,
        }
    }
}

/// A WebDAV property as `(namespace, local name)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DavProperty {
    DisplayName,
    GetContentType,
    GetContentLength,
    GetLastModified,
    GetEtag,
    CreationDate,
    ResourceType,
    QuotaUsedBytes,
    QuotaAvailableBytes,
    Favorite,
    FileId,
    Id,
    Permissions,
    Size,
    OwnerId,
    OwnerDisplayName,
    CommentsUnread,
    MountType,
    RichWorkspace,
    Note,
    IsEncrypted,
    HasPreview,
    Hidden,
    Lock,
    Sharees,
    SystemTags,
    CreationTime,
    UploadTime,
}

impl DavProperty {
    pub fn namespace(self) -> Namespace {
        use DavProperty::*;
        match self {
            DisplayName | GetContentType | GetContentLength | GetLastModified | GetEtag
            | CreationDate | ResourceType | QuotaUsedBytes | QuotaAvailableBytes => Namespace::Dav,
            Favorite | FileId | Id | Permissions | Size | OwnerId | OwnerDisplayName
            | CommentsUnread => Namespace::OwnCloud,
            MountType | RichWorkspace | Note | IsEncrypted | HasPreview | Hidden | Lock
            | Sharees | SystemTags | CreationTime | UploadTime => Namespace::Nextcloud,
        }
    }

    pub fn local_name(self) -> &'static str {
        use DavProperty::*;
        match self {
            DisplayName => "displayname",
            GetContentType => "getcontenttype",
            GetContentLength => "getcontentlength",
            GetLastModified => "getlastmodified",
            GetEtag => "getetag",
            CreationDate => "creationdate",
            ResourceType => "resourcetype",
            QuotaUsedBytes => "quota-used-bytes",
            QuotaAvailableBytes => "quota-available-bytes",
            Favorite => "favorite",
            FileId => "fileid",
            Id => "id",
            Permissions => "permissions",
            Size => "size",
            OwnerId => "owner-id",
            OwnerDisplayName => "owner-display-name",
            CommentsUnread => "comments-unread",
            MountType => "mount-type",
            RichWorkspace => "rich-workspace",
            Note => "note",
            IsEncrypted => "is-encrypted",
            HasPreview => "has-preview",
            Hidden => "hidden",
            Lock => "lock",
            Sharees => "sharees",
            SystemTags => "system-tags",
            CreationTime => "creation_time",
            UploadTime => "upload_time",
        }
    }

    /// Prefixed name as written in request bodies, e.g. `oc:favorite`.
    pub fn qualified_name(self) -> String {
        format!("{}:{}", self.namespace().prefix(), self.local_name())
    }
}

/// Everything a folder listing asks for.
pub const ALL_PROPERTIES: &[DavProperty] = &[
    DavProperty::DisplayName,
    DavProperty::GetContentType,
    DavProperty::ResourceType,
    DavProperty::GetContentLength,
    DavProperty::GetLastModified,
    DavProperty::CreationDate,
    DavProperty::GetEtag,
    DavProperty::QuotaUsedBytes,
    DavProperty::QuotaAvailableBytes,
    DavProperty::Permissions,
    DavProperty::Id,
    DavProperty::FileId,
    DavProperty::Size,
    DavProperty::Favorite,
    DavProperty::IsEncrypted,
    DavProperty::MountType,
    DavProperty::OwnerId,
    DavProperty::OwnerDisplayName,
    DavProperty::CommentsUnread,
    DavProperty::HasPreview,
    DavProperty::Note,
    DavProperty::Sharees,
    DavProperty::RichWorkspace,
    DavProperty::CreationTime,
    DavProperty::UploadTime,
    DavProperty::Lock,
    DavProperty::SystemTags,
    DavProperty::Hidden,
];
