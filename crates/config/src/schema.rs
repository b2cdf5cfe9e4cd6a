/// Config schema types (media resolution, reply lookup).
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub media: MediaConfig,
    pub reply: ReplyConfig,
}

/// Media resolution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Root of the type-scoped data directories (`<data_dir>/image/`,
    /// `<data_dir>/record/`). Defaults to the platform data directory.
    pub data_dir: Option<PathBuf>,
    /// Extra roots searched for `<root>/<kind>/<name>` after the data dir.
    pub search_paths: Vec<PathBuf>,
    /// Global switch for the URL-hash media cache. When off, the per-segment
    /// `cache` attribute is ignored.
    pub cache_enabled: bool,
    /// Fetch timeout used when a segment carries no `timeout` attribute
    /// (0 = no explicit timeout).
    pub default_timeout_secs: u64,
    /// Proxy URL used for fetches whose segment sets `proxy=1`.
    pub proxy: Option<String>,
    /// `User-Agent` header sent with media downloads.
    pub user_agent: String,
    /// Downloads larger than this are rejected (0 = unlimited).
    pub max_download_bytes: usize,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            search_paths: Vec::new(),
            cache_enabled: true,
            default_timeout_secs: 0,
            proxy: None,
            user_agent: concat!("cqbridge/", env!("CARGO_PKG_VERSION")).into(),
            max_download_bytes: 32 * 1024 * 1024,
        }
    }
}

/// Reply (quote) lookup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplyConfig {
    /// Resolve `reply` segments against stored messages.
    pub enabled: bool,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_sections() {
        let cfg: BridgeConfig = toml::from_str("[media]\nproxy = \"http://127.0.0.1:7890\"\n").unwrap();
        assert_eq!(cfg.media.proxy.as_deref(), Some("http://127.0.0.1:7890"));
        assert!(cfg.media.cache_enabled);
        assert_eq!(cfg.media.default_timeout_secs, 0);
        assert!(cfg.reply.enabled);
    }

    #[test]
    fn reply_can_be_disabled() {
        let cfg: BridgeConfig = toml::from_str("[reply]\nenabled = false\n").unwrap();
        assert!(!cfg.reply.enabled);
    }
}
