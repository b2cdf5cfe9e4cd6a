//! Translation entry points.

use std::{path::Path, sync::Arc};

use {
    cqbridge_backend::{Backend, Contact, MediaUpload},
    cqbridge_config::BridgeConfig,
    cqbridge_media::{DataDirs, Fetcher, HttpFetcher, MediaResolver},
    cqbridge_store::{CacheStore, reply_key},
    serde_json::Value,
    tracing::{debug, warn},
};

use crate::{
    Error, Result,
    decode::SegmentDecoder,
    descriptor::SegmentDescriptor,
    encode::encode_chain,
    scanner::{Piece, pieces},
    segment::{MessageChain, Segment},
    structured::{Record, parse_record},
};

/// Bidirectional translator between coded messages and [`MessageChain`]s.
///
/// Stateless apart from its collaborators, so one instance can serve
/// concurrent translations.
pub struct Translator {
    decoder: SegmentDecoder,
}

pub struct TranslatorBuilder {
    backend: Arc<dyn Backend>,
    store: Option<Arc<dyn CacheStore>>,
    fetcher: Option<Arc<dyn Fetcher>>,
    data_dirs: Option<DataDirs>,
    config: BridgeConfig,
}

impl TranslatorBuilder {
    /// Cache store for reply lookup and the media cache.
    #[must_use]
    pub fn store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Replace the HTTP fetcher built from the media config.
    #[must_use]
    pub fn fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    #[must_use]
    pub fn data_dirs(mut self, dirs: DataDirs) -> Self {
        self.data_dirs = Some(dirs);
        self
    }

    #[must_use]
    pub fn config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    /// Settings from a config file; see [`cqbridge_config::load_config`].
    pub fn config_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let config = cqbridge_config::load_config(path.as_ref()).map_err(Error::Config)?;
        Ok(self.config(config))
    }

    /// Settings from the first config file in the standard locations, or
    /// the defaults.
    #[must_use]
    pub fn discovered_config(self) -> Self {
        self.config(cqbridge_config::discover_and_load())
    }

    pub fn build(self) -> Result<Translator> {
        let fetcher: Arc<dyn Fetcher> = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(HttpFetcher::from_config(&self.config.media)?),
        };
        let uploader: Arc<dyn MediaUpload> = self.backend.clone();
        let mut resolver = MediaResolver::new(
            uploader,
            fetcher,
            self.store.clone(),
            self.config.media.clone(),
        );
        if let Some(dirs) = self.data_dirs {
            resolver = resolver.with_data_dirs(dirs);
        }
        Ok(Translator {
            decoder: SegmentDecoder::new(
                self.backend,
                resolver,
                self.store,
                self.config.reply.enabled,
            ),
        })
    }
}

impl Translator {
    #[must_use]
    pub fn builder(backend: Arc<dyn Backend>) -> TranslatorBuilder {
        TranslatorBuilder {
            backend,
            store: None,
            fetcher: None,
            data_dirs: None,
            config: BridgeConfig::default(),
        }
    }

    /// Decode coded text or structured records.
    ///
    /// Arrays are record batches where malformed records are skipped; an
    /// object is a single record; strings, numbers and booleans are coded
    /// text (literal text when `raw`). `None` only when the input as a whole
    /// cannot be used: `null` or a malformed single record.
    pub async fn decode(
        &self,
        input: &Value,
        contact: Option<&Contact>,
        raw: bool,
    ) -> Option<MessageChain> {
        match input {
            Value::Array(records) => {
                let mut chain = MessageChain::new();
                for (index, value) in records.iter().enumerate() {
                    match parse_record(value) {
                        Ok(record) => chain.push(self.decode_record(record, contact).await),
                        Err(e) => warn!(index, error = %e, "skipping malformed message record"),
                    }
                }
                Some(chain)
            },
            Value::Object(_) => match parse_record(input) {
                Ok(record) => Some(MessageChain::from(vec![
                    self.decode_record(record, contact).await,
                ])),
                Err(e) => {
                    warn!(error = %e, "unusable message record");
                    None
                },
            },
            Value::String(text) => Some(self.decode_text(text, contact, raw).await),
            Value::Number(n) => Some(self.decode_text(&n.to_string(), contact, raw).await),
            Value::Bool(b) => Some(self.decode_text(&b.to_string(), contact, raw).await),
            Value::Null => {
                warn!("message input is null");
                None
            },
        }
    }

    /// Decode coded text, resolving segments left to right.
    pub async fn decode_text(&self, text: &str, contact: Option<&Contact>, raw: bool) -> MessageChain {
        if raw {
            return MessageChain::from(vec![Segment::text(text)]);
        }
        let mut chain = MessageChain::new();
        for piece in pieces(text) {
            let segment = match piece {
                Piece::Text(text) => Segment::Text(text),
                Piece::Code(descriptor) => self.decoder.decode(&descriptor, contact).await,
            };
            chain.push(segment);
        }
        chain
    }

    /// Decode a single descriptor.
    pub async fn decode_segment(
        &self,
        descriptor: &SegmentDescriptor,
        contact: Option<&Contact>,
    ) -> Segment {
        self.decoder.decode(descriptor, contact).await
    }

    #[must_use]
    pub fn encode(&self, chain: &MessageChain) -> String {
        encode_chain(chain)
    }

    /// Store `chain` under its source id so later `reply` codes can quote
    /// it.
    pub async fn remember(&self, chain: &MessageChain) -> Result<()> {
        let store = self.decoder.store().ok_or(Error::NoStore)?;
        let source = chain.source().ok_or(Error::MissingSource)?;
        store
            .put(&reply_key(source.id), serde_json::to_vec(chain)?)
            .await?;
        debug!(id = source.id, "message stored for reply lookup");
        Ok(())
    }

    async fn decode_record(&self, record: Record, contact: Option<&Contact>) -> Segment {
        match record {
            Record::Text(text) => Segment::Text(text),
            Record::Code(descriptor) => self.decoder.decode(&descriptor, contact).await,
            Record::Empty => Segment::empty(),
        }
    }
}
