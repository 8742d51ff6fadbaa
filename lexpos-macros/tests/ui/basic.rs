use lexpos::TokenBuffer;
use lexpos_macros::LexposLexer;

#[derive(LexposLexer, Copy, Clone, Debug, PartialEq, Eq, Default)]
enum TokenKind {
    #[default]
    #[pattern(r"\s\s*", skip)]
    Whitespace,
    #[token("let")]
    Let,
    #[pattern(r"\w\w*")]
    Ident,
}

fn main() {
    let compiled = TokenKind::lexer();
    let mut buffer: TokenBuffer<TokenKind, 8> = TokenBuffer::new();
    buffer.scan(compiled, b"let answer").unwrap();
    assert_eq!(buffer.tokens()[0].token, TokenKind::Let);
}
