//! Classification of a segment's media attributes.

use std::{collections::BTreeMap, path::PathBuf, time::Duration};

use {base64::Engine, cqbridge_config::MediaConfig};

use crate::{Error, Result};

/// Marker for inline base64 payloads in `file=`.
pub const BASE64_PREFIX: &str = "base64://";

/// Where the bytes (or handle) for a media segment should come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// Payload embedded in the segment itself.
    Inline(Vec<u8>),
    /// Download from this URL.
    Remote(String),
    /// A `file://` URI on the local filesystem.
    Local {
        path: PathBuf,
        fallback_url: Option<String>,
    },
    /// An opaque name: cache record first, then the data directories.
    Named {
        name: String,
        fallback_url: Option<String>,
    },
    /// Neither `file` nor `url` was given.
    Missing,
}

/// Cache and network policy from the `cache`, `timeout` and `proxy`
/// attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub use_cache: bool,
    pub timeout: Option<Duration>,
    pub use_proxy: bool,
}

impl CachePolicy {
    /// `cache` defaults on and only `0` turns it off; `timeout` is in seconds
    /// with `0` meaning none; `proxy` is on only for `1`. Unparseable values
    /// fall back to the defaults.
    #[must_use]
    pub fn from_attrs(attrs: &BTreeMap<String, String>, config: &MediaConfig) -> Self {
        let int = |key: &str| attrs.get(key).and_then(|v| v.trim().parse::<i64>().ok());

        let use_cache = config.cache_enabled && int("cache") != Some(0);
        let timeout_secs = match int("timeout") {
            Some(secs) => u64::try_from(secs).unwrap_or(0),
            None => config.default_timeout_secs,
        };
        Self {
            use_cache,
            timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            use_proxy: int("proxy") == Some(1),
        }
    }
}

/// A classified media reference. Built per segment and discarded after
/// resolution; the attribute map it came from is never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaReference {
    pub source: MediaSource,
    pub policy: CachePolicy,
}

impl MediaReference {
    /// Classify `file`/`url` in precedence order: inline data, remote URL,
    /// `file://` URI, opaque name; `url` alone is remote.
    pub fn from_attrs(attrs: &BTreeMap<String, String>, config: &MediaConfig) -> Result<Self> {
        let url = attrs.get("url").cloned();
        let source = match attrs.get("file") {
            Some(file) => classify_file(file, url)?,
            None => url.map_or(MediaSource::Missing, MediaSource::Remote),
        };
        Ok(Self {
            source,
            policy: CachePolicy::from_attrs(attrs, config),
        })
    }
}

fn classify_file(file: &str, url: Option<String>) -> Result<MediaSource> {
    if let Some(encoded) = file.strip_prefix(BASE64_PREFIX) {
        let data = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| Error::external("invalid base64 media payload", e))?;
        return Ok(MediaSource::Inline(data));
    }
    if file.starts_with("http") {
        return Ok(MediaSource::Remote(file.to_owned()));
    }
    if file.starts_with("file:") {
        return Ok(MediaSource::Local {
            path: file_uri_to_path(file)?,
            fallback_url: url,
        });
    }
    Ok(MediaSource::Named {
        name: file.to_owned(),
        fallback_url: url,
    })
}

/// Convert a `file:` URI to a path.
///
/// `file://C:/x` and `file://host/x` style URIs put the first path element in
/// the authority; those are re-read as `file:///...` so the whole thing is
/// treated as a path.
fn file_uri_to_path(uri: &str) -> Result<PathBuf> {
    let parsed = url::Url::parse(uri).map_err(|e| Error::external("invalid file URI", e))?;
    let parsed = if parsed.host_str().is_some_and(|h| !h.is_empty()) {
        let rest = uri.trim_start_matches("file:").trim_start_matches('/');
        url::Url::parse(&format!("file:///{rest}"))
            .map_err(|e| Error::external("invalid file URI", e))?
    } else {
        parsed
    };
    parsed
        .to_file_path()
        .map_err(|()| Error::invalid_input(format!("not a local file URI: {uri}")))
}
