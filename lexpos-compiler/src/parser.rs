//! Recursive-descent parser for the pattern dialect.
//!
//! ```text
//! regex  := term ('|' term)*
//! term   := factor+
//! factor := atom '*'?
//! atom   := literal | escape | '.' | '(' regex ')'
//! ```
//!
//! Alternation leans right, concatenation grows to the left. Only groups
//! recurse, and their depth is capped at [`MAX_GROUP_DEPTH`].

use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::syntax::{CharPredicate, Symbol, SyntaxNode};
use alloc::vec;
use alloc::vec::Vec;

/// Deepest group nesting a pattern may use.
pub const MAX_GROUP_DEPTH: usize = 128;

/// Parse a whole pattern, returning its tree and the number of bytes consumed.
pub fn parse(pattern: &[u8]) -> Result<(SyntaxNode, usize), SyntaxError> {
    let mut parser = Parser::new(pattern);
    let tree = parser.regex()?;
    Ok((tree, parser.pos))
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    /// Parsing stops here; the closing paren of the innermost open group.
    end: usize,
    depth: usize,
    /// `closes[i]` is the matching `)` of a `(` at `i`.
    closes: Vec<Option<usize>>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            end: input.len(),
            depth: 0,
            closes: closing_parens(input),
        }
    }

    fn peek(&self) -> Option<u8> {
        if self.pos < self.end {
            self.input.get(self.pos).copied()
        } else {
            None
        }
    }

    fn error(&self, reason: SyntaxErrorKind) -> SyntaxError {
        self.error_at(self.pos, reason)
    }

    fn error_at(&self, offset: usize, reason: SyntaxErrorKind) -> SyntaxError {
        SyntaxError { reason, offset }
    }

    fn regex(&mut self) -> Result<SyntaxNode, SyntaxError> {
        let mut terms = vec![self.term()?];
        while self.peek() == Some(b'|') {
            self.pos += 1;
            terms.push(self.term()?);
        }

        terms
            .into_iter()
            .rev()
            .reduce(|rest, term| SyntaxNode::alternation(term, rest))
            .ok_or_else(|| self.error(SyntaxErrorKind::ExpectedAtom))
    }

    fn term(&mut self) -> Result<SyntaxNode, SyntaxError> {
        let mut acc = self.factor()?;
        while let Some(byte) = self.peek() {
            if byte == b'|' {
                break;
            }
            let next = self.factor()?;
            acc = SyntaxNode::concatenation(acc, next);
        }
        Ok(acc)
    }

    fn factor(&mut self) -> Result<SyntaxNode, SyntaxError> {
        let atom = self.atom()?;
        if self.peek() != Some(b'*') {
            return Ok(atom);
        }
        self.pos += 1;
        if self.peek() == Some(b'*') {
            return Err(self.error(SyntaxErrorKind::RepeatedStar));
        }
        Ok(SyntaxNode::star(atom))
    }

    fn atom(&mut self) -> Result<SyntaxNode, SyntaxError> {
        let byte = match self.peek() {
            Some(byte) => byte,
            None => return Err(self.error(SyntaxErrorKind::ExpectedAtom)),
        };
        match byte {
            b'(' => self.group(),
            b')' => Err(self.error(SyntaxErrorKind::UnexpectedCloseParen)),
            b'*' | b'|' => Err(self.error(SyntaxErrorKind::ExpectedAtom)),
            b'\\' => self.escape(),
            b'.' => {
                self.pos += 1;
                Ok(SyntaxNode::Symbol(Symbol::class(b'.', CharPredicate::Any)))
            }
            _ if is_literal(byte) => {
                self.pos += 1;
                Ok(SyntaxNode::Symbol(Symbol::literal(byte)))
            }
            _ => Err(self.error(SyntaxErrorKind::UnexpectedByte(byte))),
        }
    }

    fn escape(&mut self) -> Result<SyntaxNode, SyntaxError> {
        let start = self.pos;
        let escaped = match self.input.get(start + 1) {
            Some(&byte) if start + 1 < self.end => byte,
            _ => return Err(self.error_at(start, SyntaxErrorKind::DanglingEscape)),
        };
        let symbol = if let Some(predicate) = CharPredicate::from_escape(escaped) {
            Symbol::class(escaped, predicate)
        } else if is_metachar(escaped) {
            Symbol::literal(escaped)
        } else {
            return Err(self.error_at(start, SyntaxErrorKind::UnknownEscape(escaped)));
        };
        self.pos += 2;
        Ok(SyntaxNode::Symbol(symbol))
    }

    fn group(&mut self) -> Result<SyntaxNode, SyntaxError> {
        let open = self.pos;
        let close = match self.closes.get(open).copied().flatten() {
            Some(close) => close,
            None => return Err(self.error_at(open, SyntaxErrorKind::UnclosedGroup)),
        };
        if self.depth == MAX_GROUP_DEPTH {
            return Err(self.error_at(open, SyntaxErrorKind::NestingTooDeep));
        }

        let outer_end = self.end;
        self.depth += 1;
        self.end = close;
        self.pos = open + 1;
        let tree = self.regex()?;
        debug_assert_eq!(self.pos, close);
        self.end = outer_end;
        self.depth -= 1;

        self.pos = close + 1;
        Ok(tree)
    }
}

/// Pair every `(` with its `)` in one pass, stepping over escaped bytes.
/// Unbalanced parens are left unpaired for the parser to report.
fn closing_parens(input: &[u8]) -> Vec<Option<usize>> {
    let mut closes = vec![None; input.len()];
    let mut open = Vec::new();
    let mut idx = 0;
    while idx < input.len() {
        match input[idx] {
            b'\\' => idx += 1,
            b'(' => open.push(idx),
            b')' => {
                if let Some(start) = open.pop() {
                    closes[start] = Some(idx);
                }
            }
            _ => {}
        }
        idx += 1;
    }
    closes
}

const fn is_metachar(byte: u8) -> bool {
    matches!(byte, b'\\' | b'.' | b'*' | b'|' | b'(' | b')' | b'"')
}

const fn is_literal(byte: u8) -> bool {
    matches!(byte, 0x21..=0x7E) && !is_metachar(byte)
}
