//! Splitting a coded message into text runs and code tokens.
//!
//! The scanner is a two-state machine over characters. `[` opens a code and
//! `]` closes it; a `[` inside an open code and a `]` outside one are
//! recorded as errors and dropped, and scanning carries on. Whatever is left
//! when the input ends, including an unterminated code, is literal text.

use {
    std::mem,
    tracing::{debug, error},
};

use crate::{descriptor::SegmentDescriptor, escape::unescape};

/// Marks the start of a code token.
pub const CODE_PREFIX: &str = "[CQ:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Characters outside any brackets, still escaped.
    Text(String),
    /// A bracketed run including both brackets. Not necessarily a `[CQ:`
    /// code; `[b]` is a code token too.
    Code(String),
}

/// A structural problem found while scanning, at a character offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanError {
    /// `[` while a code was already open.
    NestedOpen { index: usize },
    /// `]` with no open code.
    StrayClose { index: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scan {
    pub tokens: Vec<Token>,
    pub errors: Vec<ScanError>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Text,
    Code,
}

#[must_use]
pub fn scan(input: &str) -> Scan {
    let mut scan = Scan::default();
    let mut state = State::Text;
    let mut buf = String::new();

    for (index, ch) in input.chars().enumerate() {
        match (ch, state) {
            ('[', State::Code) => {
                error!(index, input, "nested `[` inside a code, dropped");
                scan.errors.push(ScanError::NestedOpen { index });
            },
            ('[', State::Text) => {
                if !buf.is_empty() {
                    scan.tokens.push(Token::Text(mem::take(&mut buf)));
                }
                buf.push('[');
                state = State::Code;
            },
            (']', State::Text) => {
                error!(index, input, "`]` without an open code, dropped");
                scan.errors.push(ScanError::StrayClose { index });
            },
            (']', State::Code) => {
                buf.push(']');
                scan.tokens.push(Token::Code(mem::take(&mut buf)));
                state = State::Text;
            },
            _ => buf.push(ch),
        }
    }
    if !buf.is_empty() {
        scan.tokens.push(Token::Text(buf));
    }
    scan
}

/// Parse a `[CQ:type,k=v,...]` token.
///
/// Returns `None` when `raw` is not shaped like a code. The type is
/// everything up to the first comma; each attribute splits on its first
/// `=`, so values may contain `=`. Keys are trimmed and values unescaped.
/// Pieces without `=` are skipped and a repeated key keeps its last value.
#[must_use]
pub fn parse_code(raw: &str) -> Option<SegmentDescriptor> {
    let inner = raw.strip_prefix(CODE_PREFIX)?.strip_suffix(']')?;
    let (kind, rest) = match inner.split_once(',') {
        Some((kind, rest)) => (kind, Some(rest)),
        None => (inner, None),
    };

    let mut descriptor = SegmentDescriptor::new(kind);
    for piece in rest.into_iter().flat_map(|rest| rest.split(',')) {
        match piece.split_once('=') {
            Some((key, value)) => {
                descriptor
                    .attrs
                    .insert(key.trim().to_owned(), unescape(value).into_owned());
            },
            None => debug!(kind, piece, "attribute without `=`, skipped"),
        }
    }
    Some(descriptor)
}

/// One classified piece of a scanned message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    Text(String),
    Code(SegmentDescriptor),
}

/// Scan `input` and classify every token: `[CQ:...]` tokens become
/// descriptors, everything else is unescaped text. A message that contains
/// no code prefix at all is a single text piece.
#[must_use]
pub fn pieces(input: &str) -> Vec<Piece> {
    if !input.contains(CODE_PREFIX) {
        return vec![Piece::Text(unescape(input).into_owned())];
    }
    scan(input)
        .tokens
        .into_iter()
        .map(|token| match token {
            Token::Code(raw) => match parse_code(&raw) {
                Some(descriptor) => Piece::Code(descriptor),
                None => Piece::Text(unescape(&raw).into_owned()),
            },
            Token::Text(raw) => Piece::Text(unescape(&raw).into_owned()),
        })
        .collect()
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    fn text(s: &str) -> Token {
        Token::Text(s.into())
    }

    fn code(s: &str) -> Token {
        Token::Code(s.into())
    }

    #[test]
    fn splits_text_and_codes() {
        let scan = scan("a[b]c[d");
        assert_eq!(scan.tokens, vec![text("a"), code("[b]"), text("c"), text("[d")]);
        assert!(scan.errors.is_empty());
    }

    #[test]
    fn nested_open_is_dropped() {
        let scan = scan("[[x]");
        assert_eq!(scan.tokens, vec![code("[x]")]);
        assert_eq!(scan.errors, vec![ScanError::NestedOpen { index: 1 }]);
    }

    #[test]
    fn stray_close_is_dropped() {
        let scan = scan("a]b");
        assert_eq!(scan.tokens, vec![text("ab")]);
        assert_eq!(scan.errors, vec![ScanError::StrayClose { index: 1 }]);
    }

    #[test]
    fn error_index_counts_characters() {
        let scan = scan("é]");
        assert_eq!(scan.errors, vec![ScanError::StrayClose { index: 1 }]);
    }

    #[test]
    fn empty_input_has_no_tokens() {
        assert_eq!(scan(""), Scan::default());
    }

    #[test]
    fn parse_code_splits_on_first_comma_and_equals() {
        let desc = parse_code("[CQ:share,url=http://a/?x=1&#44;y=2, title =T]").unwrap();
        assert_eq!(desc.kind, "share");
        assert_eq!(desc.get("url"), Some("http://a/?x=1,y=2"));
        assert_eq!(desc.get("title"), Some("T"));
    }

    #[rstest]
    #[case("[CQ:face]", "face", 0)]
    #[case("[CQ:face,]", "face", 0)]
    #[case("[CQ:face,id=1,junk]", "face", 1)]
    #[case("[CQ:face,id=1,id=2]", "face", 1)]
    fn parse_code_shapes(#[case] raw: &str, #[case] kind: &str, #[case] attrs: usize) {
        let desc = parse_code(raw).unwrap();
        assert_eq!(desc.kind, kind);
        assert_eq!(desc.attrs.len(), attrs);
    }

    #[test]
    fn repeated_key_keeps_last_value() {
        let desc = parse_code("[CQ:face,id=1,id=2]").unwrap();
        assert_eq!(desc.get("id"), Some("2"));
    }

    #[rstest]
    #[case("[b]")]
    #[case("[CQ:face")]
    #[case("CQ:face]")]
    fn non_codes_are_rejected(#[case] raw: &str) {
        assert!(parse_code(raw).is_none());
    }

    #[test]
    fn pieces_classify_tokens() {
        let pieces = pieces("hi &amp; [CQ:face,id=1][b]&#91;x");
        assert_eq!(pieces, vec![
            Piece::Text("hi & ".into()),
            Piece::Code(SegmentDescriptor::new("face").with("id", "1")),
            Piece::Text("[b]".into()),
            Piece::Text("[x".into()),
        ]);
    }

    #[test]
    fn plain_message_is_one_unescaped_piece() {
        assert_eq!(pieces("[x] &#44; y]"), vec![Piece::Text("[x] , y]".into())]);
    }

    #[test]
    fn unterminated_code_is_text() {
        assert_eq!(pieces("[CQ:face,id=1"), vec![Piece::Text("[CQ:face,id=1".into())]);
    }
}
