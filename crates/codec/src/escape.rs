//! Escaping of the four characters reserved by the coded-message format.

use std::borrow::Cow;

const CODES: [(char, &str); 4] = [
    ('&', "&amp;"),
    ('[', "&#91;"),
    (']', "&#93;"),
    (',', "&#44;"),
];

/// Replace `&`, `[`, `]` and `,` with their escape codes.
///
/// Borrows when there is nothing to escape.
#[must_use]
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '[', ']', ',']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match CODES.iter().find(|(c, _)| *c == ch) {
            Some((_, code)) => out.push_str(code),
            None => out.push(ch),
        }
    }
    Cow::Owned(out)
}

/// Reverse [`escape`] in a single pass.
///
/// Each code is recognised once at its own position, so `&amp;#91;` yields
/// `&#91;`, never `[`. An `&` that starts no known code is kept as is.
#[must_use]
pub fn unescape(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match CODES.iter().find(|(_, code)| tail.starts_with(code)) {
            Some((ch, code)) => {
                out.push(*ch);
                rest = &tail[code.len()..];
            },
            None => {
                out.push('&');
                rest = &tail[1..];
            },
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    #[rstest]
    #[case("", "")]
    #[case("plain", "plain")]
    #[case("a&b", "a&amp;b")]
    #[case("[CQ:face,id=1]", "&#91;CQ:face&#44;id=1&#93;")]
    #[case("&#91;", "&amp;#91;")]
    fn escapes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape(input), expected);
    }

    #[rstest]
    #[case("&#91;x&#93;", "[x]")]
    #[case("a&amp;b", "a&b")]
    #[case("&amp;#91;", "&#91;")]
    #[case("fish & chips", "fish & chips")]
    #[case("&#44", "&#44")]
    fn unescapes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(unescape(input), expected);
    }

    #[rstest]
    #[case("")]
    #[case("[[nested]],,&&")]
    #[case("&amp;&#91;&#93;&#44;")]
    #[case("emoji 🎉 & [brackets], commas")]
    #[case("&&#91;;&")]
    fn unescape_inverts_escape(#[case] input: &str) {
        let escaped = escape(input);
        assert!(
            !escaped.contains(['[', ']', ',']),
            "raw reserved character in {escaped}"
        );
        assert_eq!(unescape(&escaped), input);
    }

    #[test]
    fn every_ampersand_in_escaped_text_starts_a_code() {
        let escaped = escape("a&b&amp;c");
        for (i, _) in escaped.match_indices('&') {
            let tail = &escaped[i..];
            assert!(CODES.iter().any(|(_, code)| tail.starts_with(code)), "{tail}");
        }
    }

    #[test]
    fn borrows_when_unchanged() {
        assert!(matches!(escape("hello"), Cow::Borrowed(_)));
        assert!(matches!(unescape("hello"), Cow::Borrowed(_)));
    }
}
