use crate::positions::Position;
use alloc::collections::TryReserveError;
use thiserror::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    #[error("expected a literal, escape, `.` or group")]
    ExpectedAtom,
    #[error("`(` is never closed")]
    UnclosedGroup,
    #[error("unexpected `)`")]
    UnexpectedCloseParen,
    #[error("`*` cannot follow another `*`")]
    RepeatedStar,
    #[error("`\\{}` is not a known escape", .0.escape_ascii())]
    UnknownEscape(u8),
    #[error("pattern ends with a lone `\\`")]
    DanglingEscape,
    #[error("byte {0:#04x} cannot appear unescaped")]
    UnexpectedByte(u8),
    #[error("groups nest deeper than {}", crate::parser::MAX_GROUP_DEPTH)]
    NestingTooDeep,
}

/// A malformed pattern, located by byte offset.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
#[error("{reason} at offset {offset}")]
pub struct SyntaxError {
    pub reason: SyntaxErrorKind,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("pattern #{pattern} is invalid: {source}")]
    Syntax {
        pattern: usize,
        #[source]
        source: SyntaxError,
    },
    #[error("leaf at position {position} has no owning action")]
    Association { position: Position },
    #[error("out of memory while growing compiler tables")]
    Allocation(#[from] TryReserveError),
    #[error("no patterns to compile")]
    EmptyAutomaton,
    #[error("{count} patterns exceed the limit of {}", crate::attribute::MAX_PATTERNS)]
    TooManyPatterns { count: usize },
    #[error("automaton needs more than {} states", crate::dfa::MAX_STATES)]
    TooManyStates,
}
