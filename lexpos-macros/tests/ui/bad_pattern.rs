use lexpos_macros::LexposLexer;

#[allow(dead_code)]
#[derive(LexposLexer)]
enum Op {
    #[token("+")]
    Plus,
    #[pattern("b**")]
    Stars,
}

fn main() {}
