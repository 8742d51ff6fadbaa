use lexpos_macros::LexposLexer;

#[derive(LexposLexer, Copy, Clone, Debug, PartialEq, Eq, Default)]
enum Punct {
    #[default]
    #[token("(")]
    Open,
    #[token(")")]
    Close,
    #[token("...")]
    Ellipsis,
}

#[derive(LexposLexer, Copy, Clone, Debug, PartialEq, Eq, Default)]
enum Word {
    #[default]
    #[skip]
    #[pattern(r"\s")]
    Space,
    #[pattern(r"\w\w*")]
    #[pattern(r"\d\d*")]
    Atom,
}

fn main() {
    let mut lexer = Punct::lexer().lexer();
    for byte in *b"..." {
        assert_eq!(lexer.advance(byte), lexpos::Advance::Progress);
    }
    let m = lexer.finish().unwrap().unwrap();
    assert_eq!(m.token, Punct::Ellipsis);

    assert_eq!(Word::lexer().token(0), None);
    assert_eq!(Word::lexer().token(2), Some(Word::Atom));
}
