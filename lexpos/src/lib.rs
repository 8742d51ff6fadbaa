#![no_std]
#![forbid(unsafe_code)]
#![doc = "Lexpos: a no_std, table-driven lexer built from followpos DFAs."]

mod compile;
mod dfa;
mod lexer;
mod tokens;

#[cfg(feature = "alloc")]
pub use compile::compile;
pub use compile::{CompileError, CompiledLexer, TokenSpec};
pub use dfa::PackedDfa;
pub use lexer::{Advance, Checkpoint, Lexer, LexerError, Match, TokenInfo};
pub use tokens::{ScanError, TokenBuffer, TokenRecord};

pub mod prelude {
    #[cfg(feature = "alloc")]
    pub use crate::compile::compile;
    pub use crate::compile::{CompiledLexer, TokenSpec};
    pub use crate::dfa::PackedDfa;
    pub use crate::lexer::{Advance, Checkpoint, Lexer, LexerError, Match, TokenInfo};
    pub use crate::tokens::{ScanError, TokenBuffer, TokenRecord};
}
