#![forbid(unsafe_code)]
#![doc = "Compiles lists of patterns into one DFA with the followpos construction."]

extern crate alloc;

mod attribute;
mod compile;
mod dfa;
mod error;
mod parser;
mod positions;
mod syntax;

pub use crate::attribute::{
    ActionId, Attributes, Attribution, MAX_PATTERNS, distribute_end_markers, evaluate,
};
pub use crate::compile::{Compilation, compile, prepare};
pub use crate::dfa::{Dfa, MAX_STATES, REJECT, StateId, build};
pub use crate::error::{CompileError, SyntaxError, SyntaxErrorKind};
pub use crate::parser::{MAX_GROUP_DEPTH, parse};
pub use crate::positions::{Position, PositionSeq};
pub use crate::syntax::{CharPredicate, Symbol, SyntaxNode};
