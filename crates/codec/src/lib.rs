//! Coded-message translation.
//!
//! A coded message mixes literal text with `[CQ:type,key=value,...]` codes.
//! [`Translator::decode`] turns such text, or the equivalent `{type, data}`
//! JSON records, into a [`MessageChain`]; [`Translator::encode`] goes back.
//! Media codes are resolved through `cqbridge-media`, contacts through the
//! `cqbridge-backend` traits, and replies through a `cqbridge-store` cache.

pub mod decode;
pub mod descriptor;
pub mod encode;
pub mod error;
pub mod escape;
pub mod poke;
pub mod scanner;
pub mod segment;
pub mod structured;
pub mod translate;

#[cfg(test)]
mod test_support;

pub use {
    decode::{SegmentDecoder, unobtainable_text},
    descriptor::SegmentDescriptor,
    encode::{UNSUPPORTED_PLACEHOLDER, encode_chain, encode_segment},
    error::{DecodeError, Error, Result},
    escape::{escape, unescape},
    poke::PokeKind,
    scanner::{Scan, ScanError, Token, parse_code, scan},
    segment::{AtTarget, ContactCard, MessageChain, MessageSource, MusicShare, Segment, ShareCard},
    translate::{Translator, TranslatorBuilder},
};
