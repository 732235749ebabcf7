use anyhow::Result;
use quick_xml::Reader;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::Event;
use std::io::{BufRead, Cursor};

use crate::common::error::DavError;
use crate::webdav::types::{DavEntry, DavProperties, DavSharee};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementName {
    Multistatus,
    Response,
    Propstat,
    Prop,
    Href,
    Status,
    Displayname,
    Getetag,
    Getcontenttype,
    Getcontentlength,
    Getlastmodified,
    Creationdate,
    Resourcetype,
    Collection,
    QuotaUsedBytes,
    QuotaAvailableBytes,
    Permissions,
    Id,
    Fileid,
    Size,
    Favorite,
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
    CreationTime,
    UploadTime,
    Sharees,
    Sharee,
    ShareeDisplayName,
    ShareType,
    SystemTags,
    SystemTag,
    Other,
}

pub fn element_from_bytes(raw: &[u8]) -> ElementName {
    let local = match raw.iter().position(|b| *b == b':') {
        Some(idx) => &raw[idx + 1..],
        None => raw,
    };

    match local.to_ascii_lowercase().as_slice() {
        b"multistatus" => ElementName::Multistatus,
        b"response" => ElementName::Response,
        b"propstat" => ElementName::Propstat,
        b"prop" => ElementName::Prop,
        b"href" => ElementName::Href,
        b"status" => ElementName::Status,
        b"displayname" => ElementName::Displayname,
        b"getetag" => ElementName::Getetag,
        b"getcontenttype" => ElementName::Getcontenttype,
        b"getcontentlength" => ElementName::Getcontentlength,
        b"getlastmodified" => ElementName::Getlastmodified,
        b"creationdate" => ElementName::Creationdate,
        b"resourcetype" => ElementName::Resourcetype,
        b"collection" => ElementName::Collection,
        b"quota-used-bytes" => ElementName::QuotaUsedBytes,
        b"quota-available-bytes" => ElementName::QuotaAvailableBytes,
        b"permissions" => ElementName::Permissions,
        b"id" => ElementName::Id,
        b"fileid" => ElementName::Fileid,
        b"size" => ElementName::Size,
        b"favorite" => ElementName::Favorite,
        b"owner-id" => ElementName::OwnerId,
        b"owner-display-name" => ElementName::OwnerDisplayName,
        b"comments-unread" => ElementName::CommentsUnread,
        b"mount-type" => ElementName::MountType,
        b"rich-workspace" => ElementName::RichWorkspace,
        b"note" => ElementName::Note,
        b"is-encrypted" => ElementName::IsEncrypted,
        b"has-preview" => ElementName::HasPreview,
        b"hidden" => ElementName::Hidden,
        b"lock" => ElementName::Lock,
        b"creation_time" => ElementName::CreationTime,
        b"upload_time" => ElementName::UploadTime,
        b"sharees" => ElementName::Sharees,
        b"sharee" => ElementName::Sharee,
        b"display-name" => ElementName::ShareeDisplayName,
        b"type" => ElementName::ShareType,
        b"system-tags" => ElementName::SystemTags,
        b"system-tag" => ElementName::SystemTag,
        _ => ElementName::Other,
    }
}

pub(crate) trait EntryConsumer {
    fn consume(&mut self, entry: DavEntry) -> Result<()>;
}

impl EntryConsumer for Vec<DavEntry> {
    fn consume(&mut self, entry: DavEntry) -> Result<()> {
        self.push(entry);
        Ok(())
    }
}

impl<F> EntryConsumer for F
where
    F: FnMut(DavEntry) -> Result<()>,
{
    fn consume(&mut self, entry: DavEntry) -> Result<()> {
        (self)(entry)
    }
}

/// `true` unless the status line carries a non-2xx code.
pub fn status_is_success(status: Option<&str>) -> bool {
    status
        .and_then(|line| line.split_whitespace().find_map(|t| t.parse::<u16>().ok()))
        .map(|code| (200..300).contains(&code))
        .unwrap_or(true)
}

const PROP: [ElementName; 3] = [ElementName::Response, ElementName::Propstat, ElementName::Prop];

pub(crate) struct MultistatusParser<C> {
    stack: Vec<ElementName>,
    current: DavEntry,
    pending: DavProperties,
    pending_status: Option<String>,
    text: String,
    sink: C,
}

impl<C: EntryConsumer> MultistatusParser<C> {
    pub fn new(sink: C) -> Self {
        Self {
            stack: Vec::with_capacity(16),
            current: DavEntry::default(),
            pending: DavProperties::default(),
            pending_status: None,
            text: String::new(),
            sink,
        }
    }

    fn finish(self) -> C {
        self.sink
    }

    fn path_ends_with(&self, needle: &[ElementName]) -> bool {
        self.stack.len() >= needle.len()
            && self.stack[self.stack.len() - needle.len()..] == needle[..]
    }

    /// True when the stack ends with `<d:prop>` followed by `tail`.
    fn in_prop(&self, tail: &[ElementName]) -> bool {
        let depth = PROP.len() + tail.len();
        self.stack.len() >= depth
            && self.stack[self.stack.len() - depth..self.stack.len() - tail.len()] == PROP[..]
            && self.path_ends_with(tail)
    }

    fn on_start(&mut self, raw: &[u8]) {
        self.text.clear();
        let element = element_from_bytes(raw);
        self.stack.push(element);

        match element {
            ElementName::Response => {
                self.current = DavEntry::default();
            }
            ElementName::Propstat => {
                self.pending = DavProperties::default();
                self.pending_status = None;
            }
            ElementName::Resourcetype if self.in_prop(&[ElementName::Resourcetype]) => {
                self.pending.is_collection.get_or_insert(false);
            }
            ElementName::Collection
                if self.in_prop(&[ElementName::Resourcetype, ElementName::Collection]) =>
            {
                self.pending.is_collection = Some(true);
            }
            ElementName::RichWorkspace if self.in_prop(&[ElementName::RichWorkspace]) => {
                self.pending.rich_workspace.get_or_insert_with(String::new);
            }
            ElementName::Sharees if self.in_prop(&[ElementName::Sharees]) => {
                self.pending.sharees.get_or_insert_with(Vec::new);
            }
            ElementName::Sharee if self.in_prop(&[ElementName::Sharees, ElementName::Sharee]) => {
                self.pending
                    .sharees
                    .get_or_insert_with(Vec::new)
                    .push(DavSharee::default());
            }
            ElementName::SystemTags if self.in_prop(&[ElementName::SystemTags]) => {
                self.pending.tags.get_or_insert_with(Vec::new);
            }
            _ => {}
        }
    }

    fn on_end(&mut self) -> Result<()> {
        let text = std::mem::take(&mut self.text);
        self.apply_text(&text);

        match self.stack.pop() {
            Some(ElementName::Propstat) => {
                let pending = std::mem::take(&mut self.pending);
                let status = self.pending_status.take();
                if status_is_success(status.as_deref()) {
                    self.current.properties.merge(pending);
                    if self.current.status.is_none() {
                        self.current.status = status;
                    }
                }
            }
            Some(ElementName::Response) => {
                let finished = std::mem::take(&mut self.current);
                self.sink.consume(finished)?;
            }
            // Ignore mismatches silently; the XML is assumed well-formed.
            _ => {}
        }
        Ok(())
    }

    fn on_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    fn apply_text(&mut self, text: &str) {
        // user-authored values are kept exactly as sent
        let verbatim = matches!(
            self.stack.last(),
            Some(
                ElementName::Displayname
                    | ElementName::OwnerDisplayName
                    | ElementName::RichWorkspace
                    | ElementName::Note
                    | ElementName::ShareeDisplayName
            )
        );
        let value = if verbatim { text } else { text.trim() };
        if value.is_empty() {
            return;
        }
        let value = value.to_string();

        if self.path_ends_with(&[ElementName::Response, ElementName::Href]) {
            self.current.href = value;
            return;
        }
        if self.path_ends_with(&[ElementName::Response, ElementName::Status]) {
            self.current.status = Some(value);
            return;
        }
        if self.path_ends_with(&[ElementName::Response, ElementName::Propstat, ElementName::Status])
        {
            self.pending_status = Some(value);
            return;
        }

        if self.in_prop(&[ElementName::Sharees, ElementName::Sharee, ElementName::Id]) {
            if let Some(sharee) = self.last_sharee() {
                sharee.id = Some(value);
            }
            return;
        }
        if self.in_prop(&[
            ElementName::Sharees,
            ElementName::Sharee,
            ElementName::ShareeDisplayName,
        ]) {
            if let Some(sharee) = self.last_sharee() {
                sharee.display_name = Some(value);
            }
            return;
        }
        if self.in_prop(&[ElementName::Sharees, ElementName::Sharee, ElementName::ShareType]) {
            if let Some(sharee) = self.last_sharee() {
                sharee.share_type = Some(value);
            }
            return;
        }
        if self.in_prop(&[ElementName::SystemTags, ElementName::SystemTag]) {
            self.pending.tags.get_or_insert_with(Vec::new).push(value);
            return;
        }

        let Some(&element) = self.stack.last() else {
            return;
        };
        if !self.in_prop(&[element]) {
            return;
        }
        let props = &mut self.pending;
        let slot = match element {
            ElementName::Displayname => &mut props.displayname,
            ElementName::Getetag => &mut props.etag,
            ElementName::Getcontenttype => &mut props.content_type,
            ElementName::Getcontentlength => &mut props.content_length,
            ElementName::Getlastmodified => &mut props.last_modified,
            ElementName::Creationdate => &mut props.creation_date,
            ElementName::QuotaUsedBytes => &mut props.quota_used,
            ElementName::QuotaAvailableBytes => &mut props.quota_available,
            ElementName::Permissions => &mut props.permissions,
            ElementName::Id => &mut props.remote_id,
            ElementName::Fileid => &mut props.file_id,
            ElementName::Size => &mut props.size,
            ElementName::Favorite => &mut props.favorite,
            ElementName::OwnerId => &mut props.owner_id,
            ElementName::OwnerDisplayName => &mut props.owner_display_name,
            ElementName::CommentsUnread => &mut props.comments_unread,
            ElementName::MountType => &mut props.mount_type,
            ElementName::RichWorkspace => &mut props.rich_workspace,
            ElementName::Note => &mut props.note,
            ElementName::IsEncrypted => &mut props.is_encrypted,
            ElementName::HasPreview => &mut props.has_preview,
            ElementName::Hidden => &mut props.hidden,
            ElementName::Lock => &mut props.lock,
            ElementName::CreationTime => &mut props.creation_time,
            ElementName::UploadTime => &mut props.upload_time,
            _ => return,
        };
        *slot = Some(value);
    }

    fn last_sharee(&mut self) -> Option<&mut DavSharee> {
        self.pending.sharees.as_mut().and_then(|list| list.last_mut())
    }
}

fn parse_multistatus_with<R, C>(reader: R, sink: C) -> Result<C>
where
    R: BufRead,
    C: EntryConsumer,
{
    let mut xml = Reader::from_reader(reader);
    xml.config_mut().trim_text(false);

    let mut buf = Vec::with_capacity(8 * 1024);
    let mut parser = MultistatusParser::new(sink);

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => parser.on_start(e.name().as_ref()),
            Ok(Event::Empty(e)) => {
                parser.on_start(e.name().as_ref());
                parser.on_end()?;
            }
            Ok(Event::Text(e)) => {
                let text = decode_text(e.as_ref())?;
                parser.on_text(&text);
            }
            Ok(Event::CData(e)) => {
                parser.on_text(&String::from_utf8_lossy(e.as_ref()));
            }
            Ok(Event::GeneralRef(e)) => {
                let resolved = match e.resolve_char_ref() {
                    Ok(Some(ch)) => Some(ch.to_string()),
                    Ok(None) => e
                        .decode()
                        .ok()
                        .and_then(|name| resolve_predefined_entity(&name).map(str::to_string)),
                    Err(err) => return Err(DavError::Xml(err.to_string()).into()),
                };
                if let Some(text) = resolved {
                    parser.on_text(&text);
                }
            }
            Ok(Event::End(_)) => parser.on_end()?,
            Ok(Event::Eof) => break,
            Err(e) => return Err(DavError::Xml(e.to_string()).into()),
            _ => {}
        }
        buf.clear();
    }

    Ok(parser.finish())
}

/// Parse an aggregated `207 Multi-Status` body into entries, in document order.
pub fn parse_multistatus_bytes(body: &[u8]) -> Result<Vec<DavEntry>> {
    parse_multistatus_with(Cursor::new(body), Vec::<DavEntry>::new())
}

/// Parse an aggregated multistatus body, handing each entry to `on_entry` as soon as it closes.
pub fn parse_multistatus_bytes_visit<F>(body: &[u8], on_entry: F) -> Result<()>
where
    F: FnMut(DavEntry) -> Result<()>,
{
    parse_multistatus_with(Cursor::new(body), on_entry)?;
    Ok(())
}

pub fn decode_text(raw: &[u8]) -> Result<String> {
    match std::str::from_utf8(raw) {
        Ok(s) => Ok(unescape(s)
            .map_err(|err| DavError::Xml(err.to_string()))?
            .into_owned()),
        Err(_) => Ok(String::from_utf8_lossy(raw).into_owned()),
    }
}
