//! Key scheme shared by every [`CacheStore`](crate::CacheStore) user.
//!
//! Reply lookups use the message ID as four big-endian bytes. Media entries
//! live in one namespace per media kind, `<namespace>/<name>.<extension>`,
//! where `name` is either the name a segment referenced or the hex digest of
//! a remote URL.

/// Key for a stored message, by its integer message ID.
#[must_use]
pub fn reply_key(message_id: i32) -> [u8; 4] {
    message_id.to_be_bytes()
}

/// Key for a media cache record.
///
/// The extension is appended only when `name` does not already carry it, so
/// `abc` and `abc.cqimg` address the same record.
#[must_use]
pub fn media_key(namespace: &str, extension: &str, name: &str) -> Vec<u8> {
    let mut key = format!("{namespace}/{name}");
    let suffix = format!(".{extension}");
    if !name.ends_with(&suffix) {
        key.push_str(&suffix);
    }
    key.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_key_is_big_endian() {
        assert_eq!(reply_key(1), [0, 0, 0, 1]);
        assert_eq!(reply_key(-1), [0xff, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn media_key_appends_extension_once() {
        assert_eq!(media_key("image", "cqimg", "abc"), b"image/abc.cqimg");
        assert_eq!(media_key("image", "cqimg", "abc.cqimg"), b"image/abc.cqimg");
        assert_eq!(media_key("record", "cqrecord", "abc"), b"record/abc.cqrecord");
    }
}
