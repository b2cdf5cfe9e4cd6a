use serde::{Deserialize, Serialize};

use crate::Result;

/// Metadata written after a successful media download.
///
/// Read back on later requests for the same URL hash or cache name; this
/// crate never invalidates one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// Hex SHA-256 of the media bytes.
    pub hash: String,
    pub size: u64,
    /// Handle ID the backend assigned on upload, when it differs from
    /// `<hash>.<subtype>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    /// Download URL reported by the backend after upload, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Media subtype sniffed from the bytes (`png`, `jpg`, `amr`, ...).
    pub subtype: String,
    /// Unix seconds.
    #[serde(default)]
    pub added_at: i64,
}

impl CacheRecord {
    #[must_use]
    pub fn new(hash: impl Into<String>, size: u64, url: Option<String>, subtype: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            size,
            handle: None,
            url,
            subtype: subtype.into(),
            added_at: chrono::Utc::now().timestamp(),
        }
    }

    #[must_use]
    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.handle = Some(handle.into());
        self
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_layout() {
        let record = CacheRecord {
            hash: "ab12".into(),
            size: 42,
            handle: None,
            url: None,
            subtype: "png".into(),
            added_at: 1_700_000_000,
        };
        let json: serde_json::Value = serde_json::from_slice(&record.to_bytes().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"hash": "ab12", "size": 42, "subtype": "png", "added_at": 1_700_000_000})
        );
        assert_eq!(CacheRecord::from_bytes(&record.to_bytes().unwrap()).unwrap(), record);
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(CacheRecord::from_bytes(b"[image]\nmd5=").is_err());
    }
}
