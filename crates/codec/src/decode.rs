//! Descriptor to [`Segment`] decoding.

use std::sync::Arc;

use {
    cqbridge_backend::{Backend, Contact, ContactKind},
    cqbridge_media::{MediaKind, MediaResolver, Resolution},
    cqbridge_store::{CacheStore, reply_key},
    tracing::{debug, error, warn},
};

use crate::{
    descriptor::SegmentDescriptor,
    error::DecodeError,
    poke::PokeKind,
    segment::{AtTarget, ContactCard, MessageChain, MusicShare, Segment, ShareCard},
};

/// Text that stands in for media that could not be resolved.
#[must_use]
pub fn unobtainable_text(url: Option<&str>) -> String {
    match url {
        Some(url) => format!("unable to obtain media, url: {url}"),
        None => "unable to obtain media".to_owned(),
    }
}

/// Turns descriptors into segments, consulting the backend, the media
/// resolver and the cache store as each type requires.
pub struct SegmentDecoder {
    backend: Arc<dyn Backend>,
    resolver: MediaResolver,
    store: Option<Arc<dyn CacheStore>>,
    reply_enabled: bool,
}

impl SegmentDecoder {
    #[must_use]
    pub fn new(
        backend: Arc<dyn Backend>,
        resolver: MediaResolver,
        store: Option<Arc<dyn CacheStore>>,
        reply_enabled: bool,
    ) -> Self {
        Self {
            backend,
            resolver,
            store,
            reply_enabled,
        }
    }

    #[must_use]
    pub fn store(&self) -> Option<&Arc<dyn CacheStore>> {
        self.store.as_ref()
    }

    /// Decode one descriptor. Failures never escape: they are logged and the
    /// segment becomes empty text.
    pub async fn decode(&self, descriptor: &SegmentDescriptor, contact: Option<&Contact>) -> Segment {
        match self.try_decode(descriptor, contact).await {
            Ok(segment) => segment,
            Err(e @ DecodeError::Argument { .. }) => {
                error!(kind = %descriptor.kind, error = %e, "segment rejected");
                Segment::empty()
            },
            Err(e) => {
                warn!(kind = %descriptor.kind, error = %e, "unsupported code");
                Segment::empty()
            },
        }
    }

    pub async fn try_decode(
        &self,
        d: &SegmentDescriptor,
        contact: Option<&Contact>,
    ) -> Result<Segment, DecodeError> {
        let segment = match d.kind.as_str() {
            "at" => self.decode_at(d, contact).await?,
            "face" => Segment::Face(d.parse("id")?),
            "emoji" => {
                let code: u32 = d.parse("id")?;
                let ch = char::from_u32(code).ok_or_else(|| DecodeError::InvalidAttribute {
                    kind: d.kind.clone(),
                    attr: "id",
                    value: code.to_string(),
                })?;
                Segment::Text(ch.to_string())
            },
            "image" => {
                let flash = d.get("type") == Some("flash");
                match self.resolver.resolve(MediaKind::Image, contact, &d.attrs).await {
                    Resolution::Resolved(handle) if flash => Segment::FlashImage(handle),
                    Resolution::Resolved(handle) => Segment::Image(handle),
                    Resolution::Unobtainable { url } => Segment::Text(unobtainable_text(url.as_deref())),
                }
            },
            "record" => match self.resolver.resolve(MediaKind::Record, contact, &d.attrs).await {
                Resolution::Resolved(handle) => Segment::Record(handle),
                Resolution::Unobtainable { url } => Segment::Text(unobtainable_text(url.as_deref())),
            },
            "share" => Segment::Share(ShareCard {
                url: d.require("url")?.to_owned(),
                title: d.get("title").map(str::to_owned),
                content: d.get("content").map(str::to_owned),
                image: d.get("image").map(str::to_owned),
            }),
            "contact" => self.decode_contact(d).await?,
            "music" => Segment::Music(decode_music(d)?),
            "shake" => Segment::Poke(PokeKind::Poke),
            "poke" => {
                let poke_type = d.parse("type")?;
                let id = d.parse("id")?;
                match PokeKind::lookup(poke_type, id) {
                    Some(poke) => Segment::Poke(poke),
                    None => {
                        debug!(poke_type, id, "no such poke");
                        Segment::empty()
                    },
                }
            },
            "nudge" => {
                self.nudge(d, contact).await?;
                Segment::empty()
            },
            "xml" => Segment::Xml(d.require("data")?.to_owned()),
            "json" => {
                let data = d.require("data")?;
                if data.contains("\"app\":") {
                    Segment::LightApp(data.to_owned())
                } else {
                    Segment::Json(data.to_owned())
                }
            },
            "reply" => self.decode_reply(d).await?,
            other => {
                warn!(kind = other, "unsupported segment type");
                Segment::empty()
            },
        };
        Ok(segment)
    }

    async fn decode_at(
        &self,
        d: &SegmentDescriptor,
        contact: Option<&Contact>,
    ) -> Result<Segment, DecodeError> {
        if d.require("qq")?.trim() == "all" {
            return Ok(Segment::At(AtTarget::All));
        }
        let member_id: i64 = d.parse("qq")?;
        let Some(group_id) = contact.and_then(Contact::group_id) else {
            debug!(member_id, "mention outside a group, dropped");
            return Ok(Segment::empty());
        };
        match self.backend.member(group_id, member_id).await {
            Some(member) => Ok(Segment::At(AtTarget::Member(member.id))),
            None => {
                warn!(group_id, member_id, "mentioned member not found");
                Ok(Segment::empty())
            },
        }
    }

    async fn decode_contact(&self, d: &SegmentDescriptor) -> Result<Segment, DecodeError> {
        let kind = match d.get("type") {
            Some("qq") => ContactKind::User,
            _ => ContactKind::Group,
        };
        let id: i64 = d.parse("id")?;
        match self.backend.profile(kind, id).await {
            Some(profile) => Ok(Segment::Contact(ContactCard {
                kind,
                id,
                name: profile.name,
            })),
            None => {
                warn!(kind = kind.as_code(), id, "contact card target not found");
                Ok(Segment::empty())
            },
        }
    }

    async fn nudge(&self, d: &SegmentDescriptor, contact: Option<&Contact>) -> Result<(), DecodeError> {
        let target: i64 = d.parse("qq")?;
        let Some(contact) = contact else {
            debug!(target, "nudge without a conversation, ignored");
            return Ok(());
        };
        if let Err(e) = self.backend.nudge(contact, target).await {
            warn!(target, error = %e, "nudge failed");
        }
        Ok(())
    }

    async fn decode_reply(&self, d: &SegmentDescriptor) -> Result<Segment, DecodeError> {
        let id: i32 = d.parse("id")?;
        if !self.reply_enabled {
            debug!(id, "reply lookup disabled");
            return Ok(Segment::empty());
        }
        let Some(store) = self.store.as_ref() else {
            debug!(id, "no cache store for reply lookup");
            return Ok(Segment::empty());
        };
        let bytes = match store.get(&reply_key(id)).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(id, "replied message not in cache");
                return Ok(Segment::empty());
            },
            Err(e) => {
                warn!(id, error = %e, "reply lookup failed");
                return Ok(Segment::empty());
            },
        };
        match serde_json::from_slice::<MessageChain>(&bytes) {
            Ok(chain) => match chain.source() {
                Some(source) => Ok(Segment::Reply(*source)),
                None => {
                    warn!(id, "cached message has no source");
                    Ok(Segment::empty())
                },
            },
            Err(e) => {
                warn!(id, error = %e, "malformed cached message");
                Ok(Segment::empty())
            },
        }
    }
}

fn decode_music(d: &SegmentDescriptor) -> Result<MusicShare, DecodeError> {
    let owned = |key: &'static str| d.require(key).map(str::to_owned);
    match d.require("type")? {
        "qq" => Ok(MusicShare::Qq { id: owned("id")? }),
        "163" => Ok(MusicShare::Netease { id: owned("id")? }),
        "custom" => {
            let (Some(url), Some(audio), Some(title)) = (d.get("url"), d.get("audio"), d.get("title"))
            else {
                return Err(DecodeError::argument(
                    "custom music share needs url, audio and title",
                ));
            };
            Ok(MusicShare::Custom {
                url: url.to_owned(),
                audio: audio.to_owned(),
                title: title.to_owned(),
                content: d.get("content").map(str::to_owned),
                image: d.get("image").map(str::to_owned),
            })
        },
        other => Err(DecodeError::argument(format!(
            "unsupported music share type `{other}`"
        ))),
    }
}
