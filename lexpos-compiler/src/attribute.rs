//! `nullable`/`firstpos`/`lastpos`/`followpos` evaluation and end-marker
//! distribution over a numbered syntax tree.

use crate::error::CompileError;
use crate::positions::{Position, PositionSeq};
use crate::syntax::SyntaxNode;
use alloc::vec::Vec;
use rustc_hash::FxHashMap;

/// Most patterns one automaton can hold; every one needs its own `ActionId`.
pub const MAX_PATTERNS: usize = u16::MAX as usize + 1;

/// Index of a pattern in the compiled pattern list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(pub u16);

impl ActionId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Attributes of a subtree. Only `followpos` outlives the walk.
#[derive(Clone, Debug)]
pub struct Attributes {
    pub nullable: bool,
    pub firstpos: PositionSeq,
    pub lastpos: PositionSeq,
}

/// Result of attributing a whole tree.
#[derive(Clone, Debug)]
pub struct Attribution {
    pub root: Attributes,
    /// `followpos[p]` lists every position that may follow `p`, in the order
    /// the contributions were made. Duplicates are kept.
    pub followpos: Vec<PositionSeq>,
}

/// Attribute `tree`, whose leaves must already be numbered `[0, leaf_count)`.
#[tracing::instrument(level = "debug", skip_all, fields(leaves = leaf_count))]
pub fn evaluate(tree: &SyntaxNode, leaf_count: usize) -> Result<Attribution, CompileError> {
    let mut evaluator = Evaluator {
        followpos: Vec::new(),
    };
    let root = evaluator.visit(tree)?;
    evaluator.ensure_slot(leaf_count)?;
    tracing::debug!(
        nullable = root.nullable,
        firstpos = ?root.firstpos,
        lastpos = ?root.lastpos,
        "attribution complete"
    );
    Ok(Attribution {
        root,
        followpos: evaluator.followpos,
    })
}

struct Evaluator {
    followpos: Vec<PositionSeq>,
}

enum Task<'a> {
    Enter(&'a SyntaxNode),
    Exit(&'a SyntaxNode),
}

impl Evaluator {
    /// Post-order walk; children's attributes wait on `done` until their
    /// parent's `Exit` combines them.
    fn visit(&mut self, tree: &SyntaxNode) -> Result<Attributes, CompileError> {
        let mut tasks = alloc::vec![Task::Enter(tree)];
        let mut done: Vec<Attributes> = Vec::new();

        while let Some(task) = tasks.pop() {
            match task {
                Task::Enter(node) => match node {
                    SyntaxNode::Symbol(symbol) => {
                        self.ensure_slot(symbol.position + 1)?;
                        done.try_reserve(1)?;
                        done.push(Attributes {
                            nullable: false,
                            firstpos: PositionSeq::singleton(symbol.position),
                            lastpos: PositionSeq::singleton(symbol.position),
                        });
                    }
                    SyntaxNode::Concatenation { left, right }
                    | SyntaxNode::Alternation { left, right } => {
                        tasks.try_reserve(3)?;
                        tasks.push(Task::Exit(node));
                        tasks.push(Task::Enter(right));
                        tasks.push(Task::Enter(left));
                    }
                    SyntaxNode::Star { inner } => {
                        tasks.try_reserve(2)?;
                        tasks.push(Task::Exit(node));
                        tasks.push(Task::Enter(inner));
                    }
                },
                Task::Exit(node) => {
                    let combined = self.combine(node, &mut done)?;
                    done.push(combined);
                }
            }
        }

        done.pop().ok_or(CompileError::EmptyAutomaton)
    }

    /// Fold the attributes of `node`'s children, which sit on top of `done`.
    fn combine(
        &mut self,
        node: &SyntaxNode,
        done: &mut Vec<Attributes>,
    ) -> Result<Attributes, CompileError> {
        let mut operand = || done.pop().ok_or(CompileError::EmptyAutomaton);
        match node {
            SyntaxNode::Symbol(_) => operand(),
            SyntaxNode::Concatenation { .. } => {
                let right = operand()?;
                let left = operand()?;
                self.link(&left.lastpos, &right.firstpos);

                let firstpos = if left.nullable {
                    left.firstpos.union(right.firstpos)
                } else {
                    left.firstpos
                };
                let lastpos = if right.nullable {
                    right.lastpos.union(left.lastpos)
                } else {
                    right.lastpos
                };
                Ok(Attributes {
                    nullable: left.nullable && right.nullable,
                    firstpos,
                    lastpos,
                })
            }
            SyntaxNode::Alternation { .. } => {
                let right = operand()?;
                let left = operand()?;
                Ok(Attributes {
                    nullable: left.nullable || right.nullable,
                    firstpos: left.firstpos.union(right.firstpos),
                    lastpos: left.lastpos.union(right.lastpos),
                })
            }
            SyntaxNode::Star { .. } => {
                let inner = operand()?;
                self.link(&inner.lastpos, &inner.firstpos);
                Ok(Attributes {
                    nullable: true,
                    ..inner
                })
            }
        }
    }

    /// Every position in `from` may be followed by every position in `to`.
    fn link(&mut self, from: &PositionSeq, to: &PositionSeq) {
        for &position in from {
            self.followpos[position].extend_from(to);
        }
    }

    fn ensure_slot(&mut self, len: usize) -> Result<(), CompileError> {
        if self.followpos.len() < len {
            // `try_reserve` grows geometrically on its own.
            self.followpos.try_reserve(len - self.followpos.len())?;
            self.followpos.resize_with(len, PositionSeq::new);
        }
        Ok(())
    }
}

/// Append end markers to the `followpos` of every position in `lastpos`.
///
/// Markers are numbered from `leaf_count`; consecutive positions owned by the
/// same action share a marker and a change of action opens the next one.
/// Returns the owning action of each marker, indexed by `marker - leaf_count`.
pub fn distribute_end_markers(
    followpos: &mut [PositionSeq],
    lastpos: &PositionSeq,
    leaf_count: usize,
    owners: &FxHashMap<Position, ActionId>,
) -> Result<Vec<ActionId>, CompileError> {
    let mut marker_owners: Vec<ActionId> = Vec::new();
    let mut marker = leaf_count;
    let mut previous: Option<ActionId> = None;

    for &position in lastpos {
        let action = *owners
            .get(&position)
            .ok_or(CompileError::Association { position })?;
        match previous {
            None => {
                marker_owners.try_reserve(1)?;
                marker_owners.push(action);
            }
            Some(prev) if prev != action => {
                marker += 1;
                marker_owners.try_reserve(1)?;
                marker_owners.push(action);
            }
            Some(_) => {}
        }
        followpos
            .get_mut(position)
            .ok_or(CompileError::Association { position })?
            .append(marker);
        previous = Some(action);
    }

    tracing::debug!(markers = marker_owners.len(), "end markers distributed");
    Ok(marker_owners)
}
