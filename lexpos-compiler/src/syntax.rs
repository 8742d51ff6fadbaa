//! Syntax trees produced by the pattern parser.
//!
//! A tree owns its children exclusively. Leaves carry the byte or class they
//! match plus the position assigned by [`SyntaxNode::number_leaves`]; all later
//! stages refer to leaves by that position only.

use crate::positions::Position;
use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::{fmt, mem};

/// Named byte classes reachable through `\w`, `\s`, `\d`, their negations and
/// `.`. `Never` is reserved for the end marker.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CharPredicate {
    Word,
    NotWord,
    Space,
    NotSpace,
    Digit,
    NotDigit,
    Any,
    Never,
}

impl CharPredicate {
    /// Class named by the byte following a backslash, if any.
    pub const fn from_escape(byte: u8) -> Option<Self> {
        match byte {
            b'w' => Some(Self::Word),
            b'W' => Some(Self::NotWord),
            b's' => Some(Self::Space),
            b'S' => Some(Self::NotSpace),
            b'd' => Some(Self::Digit),
            b'D' => Some(Self::NotDigit),
            _ => None,
        }
    }

    pub const fn matches(self, byte: u8) -> bool {
        match self {
            Self::Word => is_word(byte),
            Self::NotWord => matches!(byte, 0x21..=0x40 | 0x5B..=0x60 | 0x7B..=0x7E),
            Self::Space => matches!(byte, b' ' | b'\t' | b'\n'),
            Self::NotSpace => matches!(byte, 0x21..=0x7E),
            Self::Digit => is_digit(byte),
            Self::NotDigit => matches!(byte, 0x21..=0x2F | 0x3A..=0x7E),
            Self::Any => true,
            Self::Never => false,
        }
    }
}

const fn is_word(byte: u8) -> bool {
    matches!(byte, b'A'..=b'Z' | b'a'..=b'z')
}

const fn is_digit(byte: u8) -> bool {
    matches!(byte, b'0'..=b'9')
}

/// A leaf of the syntax tree.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// The literal byte, or the escape letter for class leaves.
    pub byte: u8,
    pub predicate: Option<CharPredicate>,
    pub position: Position,
}

impl Symbol {
    pub const fn literal(byte: u8) -> Self {
        Self {
            byte,
            predicate: None,
            position: 0,
        }
    }

    pub const fn class(byte: u8, predicate: CharPredicate) -> Self {
        Self {
            byte,
            predicate: Some(predicate),
            position: 0,
        }
    }

    pub const fn end_marker(position: Position) -> Self {
        Self {
            byte: 0,
            predicate: Some(CharPredicate::Never),
            position,
        }
    }

    pub const fn matches(&self, byte: u8) -> bool {
        match self.predicate {
            Some(predicate) => predicate.matches(byte),
            None => self.byte == byte,
        }
    }

    /// Whether the leaf matches exactly one literal byte.
    pub const fn is_exact(&self) -> bool {
        self.predicate.is_none()
    }
}

/// Patterns are parsed into chains as long as the input, so every walk over a
/// tree, `Drop` included, uses an explicit stack.
pub enum SyntaxNode {
    Symbol(Symbol),
    Alternation {
        left: Box<SyntaxNode>,
        right: Box<SyntaxNode>,
    },
    Concatenation {
        left: Box<SyntaxNode>,
        right: Box<SyntaxNode>,
    },
    Star {
        inner: Box<SyntaxNode>,
    },
}

impl SyntaxNode {
    pub fn alternation(left: Self, right: Self) -> Self {
        Self::Alternation {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn concatenation(left: Self, right: Self) -> Self {
        Self::Concatenation {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn star(inner: Self) -> Self {
        Self::Star {
            inner: Box::new(inner),
        }
    }

    /// Assign positions to the leaves from left to right, continuing from
    /// `leaves.len()`, and record a copy of every numbered leaf.
    pub fn number_leaves(&mut self, leaves: &mut Vec<Symbol>) {
        let mut stack: Vec<&mut SyntaxNode> = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Self::Symbol(symbol) => {
                    symbol.position = leaves.len();
                    leaves.push(*symbol);
                }
                Self::Alternation { left, right } | Self::Concatenation { left, right } => {
                    stack.push(right);
                    stack.push(left);
                }
                Self::Star { inner } => stack.push(inner),
            }
        }
    }

    /// Visit every leaf from left to right.
    pub fn for_each_leaf<F: FnMut(&Symbol)>(&self, f: &mut F) {
        let mut stack: Vec<&SyntaxNode> = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Self::Symbol(symbol) => f(symbol),
                Self::Alternation { left, right } | Self::Concatenation { left, right } => {
                    stack.push(right);
                    stack.push(left);
                }
                Self::Star { inner } => stack.push(inner),
            }
        }
    }

    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        self.for_each_leaf(&mut |_| count += 1);
        count
    }

    /// Move the children out into `into`, leaving placeholder leaves behind.
    fn detach_children(&mut self, into: &mut Vec<SyntaxNode>) {
        let placeholder = || SyntaxNode::Symbol(Symbol::end_marker(0));
        match self {
            Self::Symbol(_) => {}
            Self::Alternation { left, right } | Self::Concatenation { left, right } => {
                into.push(mem::replace(&mut **left, placeholder()));
                into.push(mem::replace(&mut **right, placeholder()));
            }
            Self::Star { inner } => into.push(mem::replace(&mut **inner, placeholder())),
        }
    }
}

impl Drop for SyntaxNode {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        self.detach_children(&mut stack);
        while let Some(mut node) = stack.pop() {
            node.detach_children(&mut stack);
        }
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.predicate {
            Some(CharPredicate::Any) => f.write_str("."),
            Some(CharPredicate::Never) => f.write_str("#"),
            Some(_) => write!(f, "\\{}", self.byte as char),
            None if self.byte.is_ascii_graphic() => write!(f, "'{}'", self.byte as char),
            None => write!(f, "'\\x{:02X}'", self.byte),
        }
    }
}

enum Piece<'a> {
    Node(&'a SyntaxNode),
    Text(&'static str),
}

impl fmt::Debug for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![Piece::Node(self)];
        while let Some(piece) = stack.pop() {
            let node = match piece {
                Piece::Text(text) => {
                    f.write_str(text)?;
                    continue;
                }
                Piece::Node(node) => node,
            };
            match node {
                SyntaxNode::Symbol(symbol) => write!(f, "{:?}", symbol)?,
                SyntaxNode::Alternation { left, right } => {
                    f.write_str("alt(")?;
                    stack.extend([
                        Piece::Text(")"),
                        Piece::Node(right),
                        Piece::Text(" | "),
                        Piece::Node(left),
                    ]);
                }
                SyntaxNode::Concatenation { left, right } => {
                    f.write_str("cat(")?;
                    stack.extend([
                        Piece::Text(")"),
                        Piece::Node(right),
                        Piece::Text(", "),
                        Piece::Node(left),
                    ]);
                }
                SyntaxNode::Star { inner } => {
                    f.write_str("star(")?;
                    stack.extend([Piece::Text(")"), Piece::Node(inner)]);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negated_classes_cover_printable_ascii_only() {
        assert!(CharPredicate::NotDigit.matches(b'a'));
        assert!(!CharPredicate::NotDigit.matches(b'5'));
        assert!(!CharPredicate::NotDigit.matches(b' '));
        assert!(!CharPredicate::NotWord.matches(0x80));
        assert!(CharPredicate::NotWord.matches(b'_'));
        assert!(CharPredicate::Any.matches(0xFF));
        assert!(!CharPredicate::Never.matches(0));
    }

    #[test]
    fn number_leaves_runs_left_to_right() {
        let mut tree = SyntaxNode::concatenation(
            SyntaxNode::star(SyntaxNode::Symbol(Symbol::literal(b'a'))),
            SyntaxNode::alternation(
                SyntaxNode::Symbol(Symbol::literal(b'b')),
                SyntaxNode::Symbol(Symbol::class(b'd', CharPredicate::Digit)),
            ),
        );
        let mut leaves = Vec::new();
        tree.number_leaves(&mut leaves);

        let positions: Vec<Position> = leaves.iter().map(|leaf| leaf.position).collect();
        assert_eq!(positions, [0, 1, 2]);
        assert_eq!(leaves[2].predicate, Some(CharPredicate::Digit));
        assert_eq!(tree.leaf_count(), 3);
    }

    #[test]
    fn long_chains_walk_and_drop_without_recursion() {
        let mut tree = SyntaxNode::Symbol(Symbol::literal(b'a'));
        for _ in 0..200_000 {
            tree = SyntaxNode::concatenation(tree, SyntaxNode::Symbol(Symbol::literal(b'b')));
        }
        let mut leaves = Vec::new();
        tree.number_leaves(&mut leaves);
        assert_eq!(leaves.len(), 200_001);
        assert_eq!(leaves[200_000].position, 200_000);
        assert_eq!(tree.leaf_count(), 200_001);
        assert!(format!("{tree:?}").starts_with("cat(cat(cat("));
        drop(tree);
    }
}
