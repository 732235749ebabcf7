//! Server capabilities as reported by `cloud/capabilities`.

use anyhow::Result;
use serde::Deserialize;
use serde_json::Value;

use crate::common::error::DavError;
use crate::status::version::OwnCloudVersion;

/// A flag that older servers may not report at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CapabilityBooleanType {
    #[default]
    Unknown,
    False,
    True,
}

impl CapabilityBooleanType {
    pub fn from_bool(value: bool) -> Self {
        if value {
            CapabilityBooleanType::True
        } else {
            CapabilityBooleanType::False
        }
    }

    pub fn is_true(self) -> bool {
        self == CapabilityBooleanType::True
    }

    pub fn is_false(self) -> bool {
        self == CapabilityBooleanType::False
    }

    pub fn is_unknown(self) -> bool {
        self == CapabilityBooleanType::Unknown
    }
}

/// End-to-end encryption API version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum E2EVersion {
    #[default]
    Unknown,
    V1_0,
    V1_1,
    V1_2,
    V2_0,
    V2_1,
}

impl E2EVersion {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "1.0" => E2EVersion::V1_0,
            "1.1" => E2EVersion::V1_1,
            "1.2" => E2EVersion::V1_2,
            "2.0" => E2EVersion::V2_0,
            "2.1" => E2EVersion::V2_1,
            _ => E2EVersion::Unknown,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OCCapability {
    pub version: OwnCloudVersion,
    /// `ETag` of the capabilities response; never empty once fetched.
    pub etag: String,
    pub poll_interval: u32,
    pub webdav_root: Option<String>,

    pub files_sharing_api_enabled: CapabilityBooleanType,
    pub files_sharing_public_enabled: CapabilityBooleanType,
    pub files_sharing_public_password_enforced: CapabilityBooleanType,
    pub files_sharing_public_expire_date_enabled: CapabilityBooleanType,
    pub files_sharing_public_upload: CapabilityBooleanType,
    pub files_sharing_resharing: CapabilityBooleanType,
    pub files_sharing_federation_outgoing: CapabilityBooleanType,
    pub files_sharing_federation_incoming: CapabilityBooleanType,
    pub files_sharing_by_mail: CapabilityBooleanType,
    pub files_sharing_by_mail_send_password_by_mail: CapabilityBooleanType,

    pub files_big_file_chunking: CapabilityBooleanType,
    pub files_undelete: CapabilityBooleanType,
    pub files_versioning: CapabilityBooleanType,
    pub files_locking_version: Option<String>,
    pub direct_editing_etag: String,

    pub activity: CapabilityBooleanType,
    pub rich_documents: CapabilityBooleanType,

    pub end_to_end_encryption: CapabilityBooleanType,
    pub end_to_end_encryption_api_version: E2EVersion,
    pub end_to_end_encryption_keys_exist: CapabilityBooleanType,

    pub user_status: CapabilityBooleanType,
    pub user_status_supports_emoji: CapabilityBooleanType,
    pub external_links: CapabilityBooleanType,
    pub groupfolders: CapabilityBooleanType,
    pub drop_account: CapabilityBooleanType,

    pub server_name: Option<String>,
    pub server_slogan: Option<String>,
    pub server_color: Option<String>,
    pub server_text_color: Option<String>,
    pub server_element_color: Option<String>,
    pub server_logo: Option<String>,
    pub server_background: Option<String>,
    pub server_background_plain: CapabilityBooleanType,
    pub server_background_default: CapabilityBooleanType,
}

impl OCCapability {
    /// Nextcloud 19 and later: everything must match. Older servers: only the etag.
    pub fn is_same(&self, other: &OCCapability) -> bool {
        if self.version.is_newer_or_equal(&OwnCloudVersion::nextcloud_19()) {
            self == other
        } else {
            self.etag == other.etag
        }
    }

    /// Parse an OCS `cloud/capabilities` JSON body. The etag is left empty.
    pub fn from_json(body: &[u8]) -> Result<Self> {
        let envelope: OcsEnvelope = serde_json::from_slice(body).map_err(DavError::from)?;
        let ocs = envelope.ocs;
        if !matches!(ocs.meta.statuscode, 100 | 200) {
            return Err(DavError::Ocs {
                code: ocs.meta.statuscode,
                message: ocs.meta.message.unwrap_or_default(),
            }
            .into());
        }

        let mut capability = OCCapability::default();
        if let Ok(version) = ServerVersion::deserialize(&ocs.data["version"]) {
            capability.version = version.to_version();
        }
        capability.apply(&ocs.data["capabilities"]);
        Ok(capability)
    }

    fn apply(&mut self, caps: &Value) {
        let core = &caps["core"];
        self.poll_interval = core["pollinterval"]
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or_default();
        self.webdav_root = string_at(core, "webdav-root");

        let sharing = &caps["files_sharing"];
        if sharing.is_object() {
            self.files_sharing_api_enabled = flag_at(sharing, &["api_enabled"]);
            self.files_sharing_public_enabled = flag_at(sharing, &["public", "enabled"]);
            self.files_sharing_public_password_enforced =
                flag_at(sharing, &["public", "password", "enforced"]);
            self.files_sharing_public_expire_date_enabled =
                flag_at(sharing, &["public", "expire_date", "enabled"]);
            self.files_sharing_public_upload = flag_at(sharing, &["public", "upload"]);
            self.files_sharing_resharing = flag_at(sharing, &["resharing"]);
            self.files_sharing_federation_outgoing = flag_at(sharing, &["federation", "outgoing"]);
            self.files_sharing_federation_incoming = flag_at(sharing, &["federation", "incoming"]);
            self.files_sharing_by_mail = flag_at(sharing, &["sharebymail", "enabled"]);
            self.files_sharing_by_mail_send_password_by_mail =
                flag_at(sharing, &["sharebymail", "send_password_by_mail"]);
        }

        let files = &caps["files"];
        if files.is_object() {
            self.files_big_file_chunking = flag_at(files, &["bigfilechunking"]);
            self.files_undelete = flag_at(files, &["undelete"]);
            self.files_versioning = flag_at(files, &["versioning"]);
            self.files_locking_version = string_at(files, "locking");
            self.direct_editing_etag = files["directEditing"]["etag"]
                .as_str()
                .unwrap_or_default()
                .to_string();
        }

        // section presence is the flag for these apps
        self.activity = CapabilityBooleanType::from_bool(caps.get("activity").is_some());
        self.rich_documents = CapabilityBooleanType::from_bool(caps.get("richdocuments").is_some());
        self.external_links = CapabilityBooleanType::from_bool(caps.get("external").is_some());

        let e2e = &caps["end-to-end-encryption"];
        if e2e.is_object() {
            self.end_to_end_encryption = flag_at(e2e, &["enabled"]);
            self.end_to_end_encryption_api_version = e2e["api-version"]
                .as_str()
                .map(E2EVersion::parse)
                .unwrap_or_default();
            self.end_to_end_encryption_keys_exist = flag_at(e2e, &["keys-exist"]);
        } else {
            self.end_to_end_encryption = CapabilityBooleanType::False;
        }

        let user_status = &caps["user_status"];
        if user_status.is_object() {
            self.user_status = flag_at(user_status, &["enabled"]);
            self.user_status_supports_emoji = flag_at(user_status, &["supports_emoji"]);
        } else {
            self.user_status = CapabilityBooleanType::False;
            self.user_status_supports_emoji = CapabilityBooleanType::False;
        }

        self.groupfolders = match caps["groupfolders"]["hasGroupFolders"].as_bool() {
            Some(value) => CapabilityBooleanType::from_bool(value),
            None => CapabilityBooleanType::False,
        };
        self.drop_account = flag_at(caps, &["drop-account", "enabled"]);

        let theming = &caps["theming"];
        if theming.is_object() {
            self.server_name = string_at(theming, "name");
            self.server_slogan = string_at(theming, "slogan");
            self.server_color = string_at(theming, "color");
            self.server_text_color = string_at(theming, "color-text");
            self.server_element_color = string_at(theming, "color-element");
            self.server_logo = string_at(theming, "logo");
            self.server_background = string_at(theming, "background");
            self.server_background_plain = flag_at(theming, &["background-plain"]);
            self.server_background_default = flag_at(theming, &["background-default"]);
        }
    }
}

/// Tri-state value at `path`: a JSON bool, or `"1"`/`"true"` style strings.
fn flag_at(root: &Value, path: &[&str]) -> CapabilityBooleanType {
    let value = path.iter().fold(root, |node, key| &node[*key]);
    match value {
        Value::Bool(b) => CapabilityBooleanType::from_bool(*b),
        Value::Number(n) => CapabilityBooleanType::from_bool(n.as_i64() == Some(1)),
        Value::String(s) => match s.as_str() {
            "1" | "true" | "yes" => CapabilityBooleanType::True,
            "0" | "false" | "no" => CapabilityBooleanType::False,
            _ => CapabilityBooleanType::Unknown,
        },
        _ => CapabilityBooleanType::Unknown,
    }
}

fn string_at(root: &Value, key: &str) -> Option<String> {
    match &root[key] {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct OcsEnvelope {
    ocs: Ocs,
}

#[derive(Debug, Deserialize)]
struct Ocs {
    meta: OcsMeta,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Deserialize)]
struct OcsMeta {
    statuscode: u16,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServerVersion {
    #[serde(default)]
    major: u32,
    #[serde(default)]
    minor: u32,
    #[serde(default)]
    micro: u32,
    #[serde(default)]
    string: Option<String>,
}

impl ServerVersion {
    fn to_version(&self) -> OwnCloudVersion {
        self.string
            .as_deref()
            .and_then(OwnCloudVersion::parse)
            .unwrap_or_else(|| OwnCloudVersion::from_parts(self.major, self.minor, self.micro))
    }
}
