/// The two media-bearing segment types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Record,
}

impl MediaKind {
    /// Segment type name; also the data directory and cache namespace.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Record => "record",
        }
    }

    /// Extension of cache record names in this kind's namespace.
    #[must_use]
    pub fn cache_extension(&self) -> &'static str {
        match self {
            Self::Image => "cqimg",
            Self::Record => "cqrecord",
        }
    }

    #[must_use]
    pub fn cache_key(&self, name: &str) -> Vec<u8> {
        cqbridge_store::media_key(self.as_str(), self.cache_extension(), name)
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
