use crate::attribute::{ActionId, Attribution, MAX_PATTERNS, distribute_end_markers, evaluate};
use crate::dfa::{Dfa, build};
use crate::error::CompileError;
use crate::parser::parse;
use crate::positions::Position;
use crate::syntax::{Symbol, SyntaxNode};
use alloc::vec::Vec;
use rustc_hash::FxHashMap;

/// Everything computed ahead of subset construction.
#[derive(Debug)]
pub struct Compilation {
    /// All patterns joined as `alt(p0 | alt(p1 | ...))`.
    pub tree: SyntaxNode,
    /// `leaves[p]` is the leaf numbered `p`.
    pub leaves: Vec<Symbol>,
    pub owners: FxHashMap<Position, ActionId>,
    /// `followpos` here already carries the end markers.
    pub attribution: Attribution,
    /// Owning action of each end marker, indexed by `marker - leaves.len()`.
    pub marker_owners: Vec<ActionId>,
}

impl Compilation {
    pub fn build(&self) -> Result<Dfa, CompileError> {
        build(
            &self.attribution.followpos,
            &self.attribution.root.firstpos,
            &self.leaves,
            &self.marker_owners,
        )
    }
}

/// Compile `patterns` into one automaton. Pattern `i` becomes `ActionId(i)`.
pub fn compile<P: AsRef<[u8]>>(patterns: &[P]) -> Result<Dfa, CompileError> {
    prepare(patterns)?.build()
}

/// Parse, number and attribute `patterns` without building the automaton.
#[tracing::instrument(level = "debug", skip_all, fields(patterns = patterns.len()))]
pub fn prepare<P: AsRef<[u8]>>(patterns: &[P]) -> Result<Compilation, CompileError> {
    if patterns.is_empty() {
        return Err(CompileError::EmptyAutomaton);
    }
    if patterns.len() > MAX_PATTERNS {
        return Err(CompileError::TooManyPatterns {
            count: patterns.len(),
        });
    }

    let mut leaves: Vec<Symbol> = Vec::new();
    let mut owners: FxHashMap<Position, ActionId> = FxHashMap::default();
    let mut trees: Vec<SyntaxNode> = Vec::new();
    trees.try_reserve(patterns.len())?;

    for (idx, pattern) in patterns.iter().enumerate() {
        let (mut tree, _) = parse(pattern.as_ref())
            .map_err(|source| CompileError::Syntax { pattern: idx, source })?;
        let first = leaves.len();
        tree.number_leaves(&mut leaves);

        let action = ActionId(idx as u16);
        owners.try_reserve(leaves.len() - first)?;
        tree.for_each_leaf(&mut |leaf| {
            owners.insert(leaf.position, action);
        });
        trees.push(tree);
    }

    let leaf_count = leaves.len();
    tracing::debug!(leaves = leaf_count, "patterns parsed");

    let mut rest = trees.into_iter().rev();
    let mut tree = rest.next().ok_or(CompileError::EmptyAutomaton)?;
    for earlier in rest {
        tree = SyntaxNode::alternation(earlier, tree);
    }

    let mut attribution = evaluate(&tree, leaf_count)?;
    let marker_owners = distribute_end_markers(
        &mut attribution.followpos,
        &attribution.root.lastpos,
        leaf_count,
        &owners,
    )?;

    Ok(Compilation {
        tree,
        leaves,
        owners,
        attribution,
        marker_owners,
    })
}
