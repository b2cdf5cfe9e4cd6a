//! The media resolver: source precedence, URL-hash cache, upload.

use std::{collections::BTreeMap, sync::Arc};

use {
    cqbridge_backend::{Contact, MediaHandle, MediaUpload},
    cqbridge_config::MediaConfig,
    cqbridge_store::{CacheRecord, CacheStore},
    tracing::{debug, info, warn},
};

use crate::{
    digest::sha256_hex,
    fetch::Fetcher,
    files::{DataDirs, read_if_readable},
    kind::MediaKind,
    reference::{CachePolicy, MediaReference, MediaSource},
    subtype,
};

/// Outcome of resolving one media segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(MediaHandle),
    /// Nothing usable was found. `url` is the remote URL that was tried, if
    /// any, for the diagnostic text.
    Unobtainable { url: Option<String> },
}

/// Resolves media attributes to backend handles.
///
/// Holds no per-message state, so one resolver can serve concurrent
/// translations; the only shared mutable state is the cache store.
pub struct MediaResolver {
    uploader: Arc<dyn MediaUpload>,
    fetcher: Arc<dyn Fetcher>,
    store: Option<Arc<dyn CacheStore>>,
    dirs: DataDirs,
    config: MediaConfig,
}

impl MediaResolver {
    #[must_use]
    pub fn new(
        uploader: Arc<dyn MediaUpload>,
        fetcher: Arc<dyn Fetcher>,
        store: Option<Arc<dyn CacheStore>>,
        config: MediaConfig,
    ) -> Self {
        Self {
            uploader,
            fetcher,
            store,
            dirs: DataDirs::from_config(&config),
            config,
        }
    }

    /// Replace the data directory search roots.
    #[must_use]
    pub fn with_data_dirs(mut self, dirs: DataDirs) -> Self {
        self.dirs = dirs;
        self
    }

    /// Resolve a media segment's attributes.
    ///
    /// Never fails: every dead end (bad payload, missing file, network or
    /// upload error) ends in [`Resolution::Unobtainable`].
    pub async fn resolve(
        &self,
        kind: MediaKind,
        contact: Option<&Contact>,
        attrs: &BTreeMap<String, String>,
    ) -> Resolution {
        let reference = match MediaReference::from_attrs(attrs, &self.config) {
            Ok(reference) => reference,
            Err(e) => {
                warn!(%kind, error = %e, "unusable media reference");
                return Resolution::Unobtainable { url: None };
            },
        };

        let mut handle = None;
        let mut bytes = None;
        let mut url = None;

        match reference.source {
            MediaSource::Inline(data) => bytes = Some(data),
            MediaSource::Remote(remote) => url = Some(remote),
            MediaSource::Local { path, fallback_url } => {
                bytes = read_if_readable(&path).await;
                if bytes.is_none() {
                    url = fallback_url;
                }
            },
            MediaSource::Named { name, fallback_url } => {
                handle = self.cached_handle(kind, &name).await;
                if handle.is_none() {
                    bytes = self.dirs.read(kind, &name).await;
                }
                if handle.is_none() && bytes.is_none() {
                    url = fallback_url;
                }
            },
            MediaSource::Missing => debug!(%kind, "media segment has neither file nor url"),
        }

        if handle.is_none()
            && bytes.is_none()
            && let Some(remote) = url.as_deref()
        {
            handle = self
                .resolve_remote(kind, contact, remote, reference.policy)
                .await;
        }

        if handle.is_none()
            && let Some(data) = bytes
        {
            handle = self.upload(kind, contact, data).await.map(|(handle, _)| handle);
        }

        match handle {
            Some(handle) => Resolution::Resolved(handle),
            None => {
                warn!(%kind, url = url.as_deref().unwrap_or(""), "media unobtainable");
                Resolution::Unobtainable { url }
            },
        }
    }

    /// Cache lookup by URL hash, then fetch + upload + cache write.
    async fn resolve_remote(
        &self,
        kind: MediaKind,
        contact: Option<&Contact>,
        url: &str,
        policy: CachePolicy,
    ) -> Option<MediaHandle> {
        let url_hash = sha256_hex(url);

        if policy.use_cache
            && let Some(handle) = self.cached_handle(kind, &url_hash).await
        {
            debug!(%kind, url, "media cache hit");
            return Some(handle);
        }

        let fetch = self.fetcher.fetch(url, policy.timeout, policy.use_proxy);
        let fetched = match policy.timeout {
            Some(limit) => match tokio::time::timeout(limit, fetch).await {
                Ok(result) => result,
                Err(_) => Err(crate::Error::Timeout {
                    url: url.to_owned(),
                }),
            },
            None => fetch.await,
        };
        let data = match fetched {
            Ok(data) => data,
            Err(e) => {
                warn!(%kind, url, error = %e, "media fetch failed");
                return None;
            },
        };

        let (handle, record) = self.upload(kind, contact, data).await?;

        if policy.use_cache {
            info!(%kind, url, key = %url_hash, "caching fetched media");
            self.write_record(kind, &url_hash, &record).await;
        }
        Some(handle)
    }

    /// Upload `data` and register the handle under its own id, so a later
    /// `file=<id>` resolves to the same handle whatever the bytes came from.
    async fn upload(
        &self,
        kind: MediaKind,
        contact: Option<&Contact>,
        data: Vec<u8>,
    ) -> Option<(MediaHandle, CacheRecord)> {
        let Some(contact) = contact else {
            warn!(%kind, "no contact to upload media to");
            return None;
        };
        let record = CacheRecord::new(
            sha256_hex(&data),
            data.len() as u64,
            None,
            subtype::detect(kind, &data),
        );
        let result = match kind {
            MediaKind::Image => self.uploader.upload_image(contact, data).await,
            MediaKind::Record => self.uploader.upload_audio(contact, data).await,
        };
        match result {
            Ok(handle) => {
                let mut record = record.with_handle(&handle.id);
                record.url = handle.url.clone();
                self.write_record(kind, &handle.id, &record).await;
                Some((handle, record))
            },
            Err(e) => {
                warn!(%kind, error = %e, "media upload failed");
                None
            },
        }
    }

    /// Handle rebuilt from the record stored under `name`, if any.
    async fn cached_handle(&self, kind: MediaKind, name: &str) -> Option<MediaHandle> {
        let store = self.store.as_ref()?;
        let bytes = match store.get(&kind.cache_key(name)).await {
            Ok(bytes) => bytes?,
            Err(e) => {
                warn!(%kind, name, error = %e, "media cache lookup failed");
                return None;
            },
        };
        match CacheRecord::from_bytes(&bytes) {
            Ok(record) => Some(handle_from_record(&record)),
            Err(e) => {
                warn!(%kind, name, error = %e, "ignoring malformed media cache record");
                None
            },
        }
    }

    async fn write_record(&self, kind: MediaKind, name: &str, record: &CacheRecord) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        let result = match record.to_bytes() {
            Ok(bytes) => store.put(&kind.cache_key(name), bytes).await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            warn!(%kind, name, error = %e, "failed to write media cache record");
        }
    }
}

/// The handle a cache record stands for.
#[must_use]
pub fn handle_from_record(record: &CacheRecord) -> MediaHandle {
    let id = record
        .handle
        .clone()
        .unwrap_or_else(|| format!("{}.{}", record.hash, record.subtype));
    MediaHandle::new(id, record.url.clone())
}
