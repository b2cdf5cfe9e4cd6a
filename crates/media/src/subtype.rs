//! Media subtype sniffing for cache records.

use image::ImageFormat;

use crate::kind::MediaKind;

/// Subtype recorded when the bytes match nothing known.
pub const UNKNOWN_SUBTYPE: &str = "unknown";

/// Sniff the subtype of `data` from its magic bytes.
#[must_use]
pub fn detect(kind: MediaKind, data: &[u8]) -> &'static str {
    match kind {
        MediaKind::Image => image_subtype(data),
        MediaKind::Record => audio_subtype(data),
    }
}

fn image_subtype(data: &[u8]) -> &'static str {
    match image::guess_format(data) {
        Ok(ImageFormat::Png) => "png",
        Ok(ImageFormat::Jpeg) => "jpg",
        Ok(ImageFormat::Gif) => "gif",
        Ok(ImageFormat::WebP) => "webp",
        Ok(ImageFormat::Bmp) => "bmp",
        _ => UNKNOWN_SUBTYPE,
    }
}

fn audio_subtype(data: &[u8]) -> &'static str {
    // SILK streams from some clients carry a leading 0x02.
    let silk = data.strip_prefix(&[0x02]).unwrap_or(data);
    if data.starts_with(b"#!AMR") {
        "amr"
    } else if silk.starts_with(b"#!SILK_V3") {
        "silk"
    } else if data.starts_with(b"OggS") {
        "ogg"
    } else if data.starts_with(b"RIFF") && data.get(8..12) == Some(b"WAVE".as_slice()) {
        "wav"
    } else if data.starts_with(b"ID3") || data.starts_with(&[0xFF, 0xFB]) {
        "mp3"
    } else {
        UNKNOWN_SUBTYPE
    }
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    #[rstest]
    #[case(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR".as_slice(), "png")]
    #[case(b"\xFF\xD8\xFF\xE0\0\x10JFIF".as_slice(), "jpg")]
    #[case(b"GIF89a\x01\0\x01\0".as_slice(), "gif")]
    #[case(b"RIFF\0\0\0\0WEBPVP8 ".as_slice(), "webp")]
    #[case(b"hello world".as_slice(), "unknown")]
    fn image_subtypes(#[case] data: &[u8], #[case] expected: &str) {
        assert_eq!(detect(MediaKind::Image, data), expected);
    }

    #[rstest]
    #[case(b"#!AMR\n".as_slice(), "amr")]
    #[case(b"\x02#!SILK_V3".as_slice(), "silk")]
    #[case(b"#!SILK_V3".as_slice(), "silk")]
    #[case(b"OggS\0\x02".as_slice(), "ogg")]
    #[case(b"RIFF\x24\0\0\0WAVEfmt ".as_slice(), "wav")]
    #[case(b"ID3\x04".as_slice(), "mp3")]
    #[case(b"\0\0\0".as_slice(), "unknown")]
    fn audio_subtypes(#[case] data: &[u8], #[case] expected: &str) {
        assert_eq!(detect(MediaKind::Record, data), expected);
    }
}
