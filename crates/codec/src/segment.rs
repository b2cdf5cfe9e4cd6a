//! The decoded message model.

use {
    cqbridge_backend::{ContactKind, MediaHandle},
    serde::{Deserialize, Serialize},
};

use crate::poke::PokeKind;

/// Who an `at` segment mentions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtTarget {
    All,
    Member(i64),
}

/// Identity of a stored message: what a `reply` quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSource {
    pub id: i32,
    pub sender: i64,
    pub time: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareCard {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactCard {
    pub kind: ContactKind,
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum MusicShare {
    Qq {
        id: String,
    },
    Netease {
        id: String,
    },
    Custom {
        url: String,
        audio: String,
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image: Option<String>,
    },
}

/// One semantic unit of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Segment {
    Text(String),
    At(AtTarget),
    Face(i32),
    Image(MediaHandle),
    /// An image shown once and then hidden.
    FlashImage(MediaHandle),
    Record(MediaHandle),
    Share(ShareCard),
    Contact(ContactCard),
    Music(MusicShare),
    Poke(PokeKind),
    Xml(String),
    Json(String),
    LightApp(String),
    Reply(MessageSource),
    /// Zero-width marker naming the message itself; never rendered.
    Source(MessageSource),
    /// A backend element with no coded form, named by its kind.
    Unsupported(String),
}

impl Segment {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// What a segment that could not be decoded becomes.
    #[must_use]
    pub fn empty() -> Self {
        Self::Text(String::new())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(text) if text.is_empty())
    }
}

/// An ordered run of segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageChain(Vec<Segment>);

impl MessageChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, segment: Segment) {
        self.0.push(segment);
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    #[must_use]
    pub fn into_segments(self) -> Vec<Segment> {
        self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The chain's own [`Segment::Source`] marker, if it carries one.
    #[must_use]
    pub fn source(&self) -> Option<&MessageSource> {
        self.0.iter().find_map(|segment| match segment {
            Segment::Source(source) => Some(source),
            _ => None,
        })
    }
}

impl From<Vec<Segment>> for MessageChain {
    fn from(segments: Vec<Segment>) -> Self {
        Self(segments)
    }
}

impl FromIterator<Segment> for MessageChain {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for MessageChain {
    type IntoIter = std::vec::IntoIter<Segment>;
    type Item = Segment;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a MessageChain {
    type IntoIter = std::slice::Iter<'a, Segment>;
    type Item = &'a Segment;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_serializes_as_tagged_segments() {
        let chain = MessageChain::from(vec![
            Segment::Source(MessageSource {
                id: 7,
                sender: 42,
                time: 1_700_000_000,
            }),
            Segment::text("hi"),
            Segment::Face(1),
        ]);
        let json = serde_json::to_value(&chain).unwrap();
        assert_eq!(json[1], serde_json::json!({"type": "text", "data": "hi"}));
        assert_eq!(json[2], serde_json::json!({"type": "face", "data": 1}));

        let back: MessageChain = serde_json::from_value(json).unwrap();
        assert_eq!(back, chain);
        assert_eq!(back.source().map(|s| s.id), Some(7));
    }

    #[test]
    fn only_empty_text_is_empty() {
        assert!(Segment::empty().is_empty());
        assert!(!Segment::text(" ").is_empty());
        assert!(!Segment::Face(0).is_empty());
    }
}
