//! The parsed form of one code: a type name and its attributes.

use std::{collections::BTreeMap, str::FromStr};

use crate::{error::DecodeError, escape::escape};

/// A segment type plus unescaped attribute values.
///
/// Produced by the scanner for `[CQ:...]` tokens and by the structured
/// adapter for `{type, data}` records; both feed the same decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentDescriptor {
    pub kind: String,
    pub attrs: BTreeMap<String, String>,
}

impl SegmentDescriptor {
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attrs: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Like [`with`](Self::with), skipping absent values.
    #[must_use]
    pub fn maybe(self, key: impl Into<String>, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    pub fn require(&self, key: &'static str) -> Result<&str, DecodeError> {
        self.get(key).ok_or_else(|| DecodeError::MissingAttribute {
            kind: self.kind.clone(),
            attr: key,
        })
    }

    /// Required attribute parsed as `T`, surrounding whitespace ignored.
    pub fn parse<T: FromStr>(&self, key: &'static str) -> Result<T, DecodeError> {
        let raw = self.require(key)?;
        raw.trim()
            .parse()
            .map_err(|_| DecodeError::InvalidAttribute {
                kind: self.kind.clone(),
                attr: key,
                value: raw.to_owned(),
            })
    }

    /// Render back to `[CQ:kind,k=v,...]` with values escaped.
    #[must_use]
    pub fn to_code(&self) -> String {
        let mut out = format!("[CQ:{}", self.kind);
        for (key, value) in &self.attrs {
            out.push(',');
            out.push_str(key);
            out.push('=');
            out.push_str(&escape(value));
        }
        out.push(']');
        out
    }
}
