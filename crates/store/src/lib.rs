//! Cache bridge: a narrow key-value contract used for reply lookup and for
//! the URL-hash media cache.
//!
//! The bridge only defines the key scheme and record layout; durability and
//! eviction belong to whatever implements [`CacheStore`].

pub mod dir;
pub mod error;
pub mod keys;
pub mod memory;
pub mod record;
pub mod store;

pub use {
    dir::DirStore,
    error::{Error, Result},
    keys::{media_key, reply_key},
    memory::MemoryStore,
    record::CacheRecord,
    store::CacheStore,
};
