//! Multistatus entries to [`RemoteFile`] records.

use chrono::DateTime;

use crate::files::model::{DIR_TYPE, MountType, RemoteFile, ShareType, ShareeUser};
use crate::files::utils::{collapse_slashes, decode_path, file_name};
use crate::webdav::types::{DavEntry, DavProperties};

/// Which entries of a multistatus body become records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Folder listing: the first entry is the folder itself and is skipped.
    Listing,
    /// Every entry, the target included.
    Full,
}

pub struct WebDavFileUtils;

impl WebDavFileUtils {
    /// Map `entries` in response order.
    ///
    /// `files_dav_path` is the path component of the user's files root and is
    /// stripped from every href.
    pub fn read_data(entries: &[DavEntry], files_dav_path: &str, mode: ReadMode) -> Vec<RemoteFile> {
        let skip = match mode {
            ReadMode::Listing => 1,
            ReadMode::Full => 0,
        };
        entries
            .iter()
            .skip(skip)
            .map(|entry| Self::parse_response(entry, files_dav_path))
            .collect()
    }

    /// Map one entry. Every property is read independently; missing ones keep the default.
    pub fn parse_response(entry: &DavEntry, files_dav_path: &str) -> RemoteFile {
        let path = remote_path_of(&entry.href, files_dav_path);
        let mut file = RemoteFile::new(path);
        apply_properties(&mut file, &entry.properties);

        if file.name.is_empty() {
            file.name = file_name(&file.remote_path).to_string();
        }
        file
    }
}

/// `href` minus everything up to and including `files_dav_path`, decoded, with `//` collapsed.
pub(crate) fn remote_path_of(href: &str, files_dav_path: &str) -> String {
    let files_dav_path = files_dav_path.trim_end_matches('/');
    let relative = if files_dav_path.is_empty() {
        href
    } else {
        match href.find(files_dav_path) {
            Some(idx) => &href[idx + files_dav_path.len()..],
            None => {
                tracing::warn!("href {href} is outside {files_dav_path}");
                href
            }
        }
    };

    let path = collapse_slashes(&decode_path(relative));
    if path.is_empty() {
        "/".to_string()
    } else if path.starts_with('/') {
        path
    } else {
        format!("/{path}")
    }
}

fn apply_properties(file: &mut RemoteFile, props: &DavProperties) {
    if let Some(name) = props.displayname.as_deref().filter(|n| !n.trim().is_empty()) {
        file.name = name.to_string();
    }
    if let Some(etag) = &props.etag {
        file.etag = etag.trim().trim_matches('"').to_string();
    }
    if let Some(favorite) = &props.favorite {
        file.is_favorite = flag(favorite);
    }
    if let Some(modified) = &props.last_modified {
        if let Some(ts) = parse_http_date(modified) {
            file.modified_timestamp = ts;
        }
    }
    if let Some(created) = &props.creation_date {
        if let Some(ts) = parse_iso_date(created) {
            file.creation_timestamp = ts;
        }
    }
    if let Some(length) = &props.content_length {
        file.length = length.trim().parse().unwrap_or_default();
    }
    if let Some(mime) = &props.content_type {
        file.mime_type = mime.trim().to_string();
    }
    // collection beats any transported content type
    if props.is_collection == Some(true) {
        file.mime_type = DIR_TYPE.to_string();
    }
    if let Some(permissions) = &props.permissions {
        file.permissions = Some(permissions.clone());
    }
    if let Some(remote_id) = &props.remote_id {
        file.remote_id = Some(remote_id.clone());
    }
    if let Some(size) = &props.size {
        file.size = size.trim().parse().unwrap_or_default();
    }
    if let Some(local_id) = &props.file_id {
        file.local_id = local_id.trim().parse().unwrap_or(-1);
    }
    if let Some(mount_type) = &props.mount_type {
        file.mount_type = MountType::parse(mount_type.trim());
    }
    if let Some(owner_id) = &props.owner_id {
        file.owner_id = Some(owner_id.clone());
    }
    if let Some(owner) = &props.owner_display_name {
        file.owner_display_name = Some(owner.clone());
    }
    if let Some(workspace) = &props.rich_workspace {
        file.rich_workspace = Some(workspace.clone());
    }
    if let Some(note) = &props.note {
        file.note = Some(note.clone());
    }
    if let Some(unread) = &props.comments_unread {
        file.unread_comments_count = unread.trim().parse().unwrap_or_default();
    }
    if let Some(encrypted) = &props.is_encrypted {
        file.is_encrypted = flag(encrypted);
    }
    if let Some(preview) = &props.has_preview {
        file.has_preview = flag(preview);
    }
    if let Some(hidden) = &props.hidden {
        file.is_hidden = flag(hidden);
    }
    if let Some(lock) = &props.lock {
        file.is_locked = flag(lock);
    }
    if let Some(seconds) = &props.creation_time {
        file.creation_timestamp = unix_seconds_to_millis(seconds).unwrap_or(file.creation_timestamp);
    }
    if let Some(seconds) = &props.upload_time {
        file.upload_timestamp = unix_seconds_to_millis(seconds).unwrap_or_default();
    }
    if let Some(used) = &props.quota_used {
        file.quota_used_bytes = used.trim().parse().ok();
    }
    if let Some(available) = &props.quota_available {
        file.quota_available_bytes = available.trim().parse().ok();
    }
    if let Some(sharees) = &props.sharees {
        file.sharees = sharees
            .iter()
            .map(|s| ShareeUser {
                user_id: s.id.clone(),
                display_name: s.display_name.clone(),
                share_type: s
                    .share_type
                    .as_deref()
                    .and_then(|t| t.trim().parse().ok())
                    .map(ShareType::from_value),
            })
            .collect();
    }
    if let Some(tags) = &props.tags {
        file.tags = tags.clone();
    }
}

fn flag(value: &str) -> bool {
    matches!(value.trim(), "1" | "true")
}

/// `getlastmodified` is an RFC 1123 date, e.g. `Tue, 10 Jan 2023 08:00:00 GMT`.
pub(crate) fn parse_http_date(value: &str) -> Option<i64> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|dt| dt.timestamp_millis())
}

pub(crate) fn parse_iso_date(value: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|dt| dt.timestamp_millis())
}

fn unix_seconds_to_millis(value: &str) -> Option<i64> {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|s| *s > 0)
        .and_then(|s| s.checked_mul(1000))
}
