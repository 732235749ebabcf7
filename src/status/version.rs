use std::cmp::Ordering;
use std::fmt;

/// Dotted server version, compared numerically part by part (`20.0.1 > 20.0`).
#[derive(Debug, Clone, Default)]
pub struct OwnCloudVersion {
    parts: [u32; 4],
    raw: String,
}

impl OwnCloudVersion {
    /// Parse `major[.minor[.micro[.patch]]]`, ignoring anything after the first
    /// non-numeric character of a part (`26.0.0 beta 1` reads as `26.0.0`).
    pub fn parse(version: &str) -> Option<Self> {
        let trimmed = version.trim();
        let mut parts = [0u32; 4];
        let mut seen = 0;
        for (slot, piece) in parts.iter_mut().zip(trimmed.split('.')) {
            let digits: String = piece.chars().take_while(|c| c.is_ascii_digit()).collect();
            if digits.is_empty() {
                break;
            }
            *slot = digits.parse().ok()?;
            seen += 1;
            if digits.len() != piece.len() {
                break;
            }
        }
        if seen == 0 {
            return None;
        }
        Some(Self {
            parts,
            raw: trimmed.to_string(),
        })
    }

    pub const fn from_parts(major: u32, minor: u32, micro: u32) -> Self {
        Self {
            parts: [major, minor, micro, 0],
            raw: String::new(),
        }
    }

    pub fn major(&self) -> u32 {
        self.parts[0]
    }

    pub fn is_newer_or_equal(&self, other: &OwnCloudVersion) -> bool {
        self >= other
    }

    pub fn nextcloud_19() -> Self {
        Self::from_parts(19, 0, 0)
    }
}

impl PartialEq for OwnCloudVersion {
    fn eq(&self, other: &Self) -> bool {
        self.parts == other.parts
    }
}

impl Eq for OwnCloudVersion {}

impl PartialOrd for OwnCloudVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OwnCloudVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.parts.cmp(&other.parts)
    }
}

impl fmt::Display for OwnCloudVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.raw.is_empty() {
            write!(f, "{}.{}.{}", self.parts[0], self.parts[1], self.parts[2])
        } else {
            f.write_str(&self.raw)
        }
    }
}
