#![cfg(feature = "alloc")]

use lexpos::{ScanError, TokenBuffer, TokenRecord, TokenSpec, compile};
use pretty_assertions::assert_eq;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
enum Tok {
    #[default]
    Whitespace,
    If,
    Ident,
    Number,
    Equals,
}

const TOKENS: usize = 5;
const STATES: usize = 32;

fn compiled() -> lexpos::CompiledLexer<Tok, TOKENS, STATES> {
    let specs = [
        TokenSpec {
            pattern: r"\s\s*",
            token: Tok::Whitespace,
            skip: true,
        },
        TokenSpec {
            pattern: "if",
            token: Tok::If,
            skip: false,
        },
        TokenSpec {
            pattern: r"\w\w*",
            token: Tok::Ident,
            skip: false,
        },
        TokenSpec {
            pattern: r"\d\d*",
            token: Tok::Number,
            skip: false,
        },
        TokenSpec {
            pattern: "=",
            token: Tok::Equals,
            skip: false,
        },
    ];
    compile::<Tok, TOKENS, STATES>(&specs).expect("lexer compilation")
}

fn significant<'a, const N: usize>(
    buffer: &TokenBuffer<Tok, N>,
    source: &'a str,
) -> Vec<(Tok, &'a str)> {
    buffer
        .significant()
        .map(|record| (record.token, &source[record.start..record.end]))
        .collect()
}

#[test]
fn scan_skips_whitespace() {
    let compiled = compiled();
    let mut buffer: TokenBuffer<Tok, 16> = TokenBuffer::new();
    let source = "if x = 42";
    buffer
        .scan(&compiled, source.as_bytes())
        .expect("scan succeeds");

    assert_eq!(
        significant(&buffer, source),
        vec![
            (Tok::If, "if"),
            (Tok::Ident, "x"),
            (Tok::Equals, "="),
            (Tok::Number, "42"),
        ]
    );
    assert_eq!(buffer.tokens().len(), 7);
    assert_eq!(
        buffer.tokens()[1],
        TokenRecord {
            id: 0,
            token: Tok::Whitespace,
            start: 2,
            end: 3,
            skipped: true,
        }
    );
}

#[test]
fn keywords_only_match_whole_words() {
    let compiled = compiled();
    let mut buffer: TokenBuffer<Tok, 16> = TokenBuffer::default();
    let source = "iffy if i";
    buffer
        .scan(&compiled, source.as_bytes())
        .expect("scan succeeds");

    assert_eq!(
        significant(&buffer, source),
        vec![(Tok::Ident, "iffy"), (Tok::If, "if"), (Tok::Ident, "i")]
    );
}

#[test]
fn rescan_replaces_previous_tokens() {
    let compiled = compiled();
    let mut buffer: TokenBuffer<Tok, 16> = TokenBuffer::new();
    buffer.scan(&compiled, b"a = b").expect("scan succeeds");
    buffer.scan(&compiled, b"7").expect("scan succeeds");
    assert_eq!(significant(&buffer, "7"), vec![(Tok::Number, "7")]);

    buffer.clear();
    assert!(buffer.tokens().is_empty());
}

#[test]
fn scan_backtracks_to_last_accept() {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
    enum Piece {
        #[default]
        Short,
        Long,
        Tail,
    }

    let specs = [
        TokenSpec {
            pattern: "ab",
            token: Piece::Short,
            skip: false,
        },
        TokenSpec {
            pattern: "abcd",
            token: Piece::Long,
            skip: false,
        },
        TokenSpec {
            pattern: "c",
            token: Piece::Tail,
            skip: false,
        },
    ];
    let compiled = compile::<Piece, 3, 16>(&specs).expect("lexer compilation");
    let mut buffer: TokenBuffer<Piece, 8> = TokenBuffer::new();

    buffer.scan(&compiled, b"abcab").expect("scan succeeds");
    let spans: Vec<(Piece, usize, usize)> = buffer
        .tokens()
        .iter()
        .map(|record| (record.token, record.start, record.end))
        .collect();
    assert_eq!(
        spans,
        vec![(Piece::Short, 0, 2), (Piece::Tail, 2, 3), (Piece::Short, 3, 5)]
    );

    buffer.scan(&compiled, b"abc").expect("scan succeeds");
    let spans: Vec<(Piece, usize, usize)> = buffer
        .tokens()
        .iter()
        .map(|record| (record.token, record.start, record.end))
        .collect();
    assert_eq!(spans, vec![(Piece::Short, 0, 2), (Piece::Tail, 2, 3)]);

    buffer.scan(&compiled, b"abcd").expect("scan succeeds");
    assert_eq!(buffer.tokens().len(), 1);
    assert_eq!(buffer.tokens()[0].token, Piece::Long);
}

#[test]
fn scan_reports_rejected_offset() {
    let compiled = compiled();
    let mut buffer: TokenBuffer<Tok, 16> = TokenBuffer::new();
    assert_eq!(
        buffer.scan(&compiled, b"if ?"),
        Err(ScanError::Reject { offset: 3, span: 0 })
    );
}

#[test]
fn scan_reports_unfinished_token() {
    let specs = [TokenSpec {
        pattern: "abcd",
        token: Tok::Ident,
        skip: false,
    }];
    let compiled = compile::<Tok, 1, 8>(&specs).expect("lexer compilation");
    let mut buffer: TokenBuffer<Tok, 4> = TokenBuffer::new();
    assert_eq!(
        buffer.scan(&compiled, b"abcdabc"),
        Err(ScanError::UnexpectedEnd { offset: 4, span: 3 })
    );
    assert_eq!(buffer.tokens().len(), 1);
}

#[test]
fn scan_reports_overflow() {
    let compiled = compiled();
    let mut buffer: TokenBuffer<Tok, 2> = TokenBuffer::new();
    assert_eq!(
        buffer.scan(&compiled, b"a b c"),
        Err(ScanError::TokenOverflow)
    );
}
