//! [`Segment`] to coded text.

use cqbridge_backend::MediaHandle;

use crate::{
    descriptor::SegmentDescriptor,
    escape::escape,
    segment::{AtTarget, MessageChain, MusicShare, Segment},
};

/// Stand-in for elements that have no coded form.
pub const UNSUPPORTED_PLACEHOLDER: &str = "(unsupported message element)";

#[must_use]
pub fn encode_chain(chain: &MessageChain) -> String {
    chain.into_iter().map(encode_segment).collect()
}

#[must_use]
pub fn encode_segment(segment: &Segment) -> String {
    match segment {
        Segment::Text(text) => escape(text).into_owned(),
        Segment::At(AtTarget::All) => code("at").with("qq", "all").to_code(),
        Segment::At(AtTarget::Member(id)) => code("at").with("qq", id.to_string()).to_code(),
        Segment::Face(id) => code("face").with("id", id.to_string()).to_code(),
        Segment::Image(handle) => media("image", handle).to_code(),
        Segment::FlashImage(handle) => media("image", handle).with("type", "flash").to_code(),
        Segment::Record(handle) => media("record", handle).to_code(),
        Segment::Share(card) => code("share")
            .with("url", &card.url)
            .maybe("title", card.title.as_deref())
            .maybe("content", card.content.as_deref())
            .maybe("image", card.image.as_deref())
            .to_code(),
        Segment::Contact(card) => code("contact")
            .with("type", card.kind.as_code())
            .with("id", card.id.to_string())
            .to_code(),
        Segment::Music(MusicShare::Qq { id }) => {
            code("music").with("type", "qq").with("id", id).to_code()
        },
        Segment::Music(MusicShare::Netease { id }) => {
            code("music").with("type", "163").with("id", id).to_code()
        },
        Segment::Music(MusicShare::Custom {
            url,
            audio,
            title,
            content,
            image,
        }) => code("music")
            .with("type", "custom")
            .with("url", url)
            .with("audio", audio)
            .with("title", title)
            .maybe("content", content.as_deref())
            .maybe("image", image.as_deref())
            .to_code(),
        Segment::Poke(poke) => code("poke")
            .with("type", poke.poke_type().to_string())
            .with("id", poke.id().to_string())
            .with("name", poke.name())
            .to_code(),
        Segment::Xml(data) => code("xml").with("data", data).to_code(),
        Segment::Json(data) | Segment::LightApp(data) => code("json").with("data", data).to_code(),
        Segment::Reply(source) => code("reply").with("id", source.id.to_string()).to_code(),
        Segment::Source(_) => String::new(),
        Segment::Unsupported(_) => UNSUPPORTED_PLACEHOLDER.to_owned(),
    }
}

fn code(kind: &str) -> SegmentDescriptor {
    SegmentDescriptor::new(kind)
}

fn media(kind: &str, handle: &MediaHandle) -> SegmentDescriptor {
    code(kind)
        .with("file", &handle.id)
        .maybe("url", handle.url.as_deref())
}
