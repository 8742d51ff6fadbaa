use lexpos_macros::LexposLexer;

#[allow(dead_code)]
#[derive(LexposLexer)]
enum Keyword {
    #[token("fn")]
    Fn,
    Bare,
}

fn main() {}
