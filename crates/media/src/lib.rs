//! Media resolution: turn `image`/`record` segment attributes into uploaded
//! media handles.
//!
//! A reference is classified by [`reference::MediaReference`], bytes are
//! obtained from inline data, local files, the data directories, or the
//! network ([`fetch::Fetcher`]), and [`resolver::MediaResolver`] applies the
//! URL-hash cache policy before uploading through the backend.

pub mod digest;
pub mod error;
pub mod fetch;
pub mod files;
pub mod kind;
pub mod reference;
pub mod resolver;
pub mod subtype;

pub use {
    error::{Error, Result},
    fetch::{Fetcher, HttpFetcher},
    files::DataDirs,
    kind::MediaKind,
    reference::{CachePolicy, MediaReference, MediaSource},
    resolver::{MediaResolver, Resolution},
};
