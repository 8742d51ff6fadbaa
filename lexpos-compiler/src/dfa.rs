use crate::attribute::ActionId;
use crate::error::CompileError;
use crate::positions::{Position, PositionSeq};
use crate::syntax::Symbol;
use alloc::vec::Vec;
use rustc_hash::FxHashMap;

pub type StateId = u16;

/// Transition target meaning "no transition on this byte".
pub const REJECT: StateId = StateId::MAX;

/// Largest number of states a [`Dfa`] may hold; `REJECT` stays reserved.
pub const MAX_STATES: usize = REJECT as usize;

const END_MARKER: Symbol = Symbol::end_marker(0);

/// Dense deterministic automaton over the 256 byte values.
#[derive(Clone, PartialEq, Eq)]
pub struct Dfa {
    transitions: Vec<[StateId; 256]>,
    accepting: Vec<Option<ActionId>>,
}

impl Dfa {
    pub const fn start(&self) -> StateId {
        0
    }

    pub fn num_states(&self) -> usize {
        self.transitions.len()
    }

    /// Raw transition target, `REJECT` included.
    pub fn target(&self, state: StateId, byte: u8) -> StateId {
        self.transitions
            .get(state as usize)
            .map_or(REJECT, |row| row[byte as usize])
    }

    pub fn next(&self, state: StateId, byte: u8) -> Option<StateId> {
        match self.target(state, byte) {
            REJECT => None,
            target => Some(target),
        }
    }

    pub fn accepting(&self, state: StateId) -> Option<ActionId> {
        self.accepting.get(state as usize).copied().flatten()
    }

    pub fn rows(&self) -> &[[StateId; 256]] {
        &self.transitions
    }

    pub fn accepting_states(&self) -> &[Option<ActionId>] {
        &self.accepting
    }

    /// Run the whole of `input` and report the action of the final state.
    pub fn run(&self, input: &[u8]) -> Option<ActionId> {
        let mut state = self.start();
        for &byte in input {
            state = self.next(state, byte)?;
        }
        self.accepting(state)
    }

    /// Longest prefix of `input` that ends in an accepting state.
    pub fn longest_match(&self, input: &[u8]) -> Option<(ActionId, usize)> {
        let mut state = self.start();
        let mut best = self.accepting(state).map(|action| (action, 0));
        for (idx, &byte) in input.iter().enumerate() {
            match self.next(state, byte) {
                Some(next) => state = next,
                None => break,
            }
            if let Some(action) = self.accepting(state) {
                best = Some((action, idx + 1));
            }
        }
        best
    }
}

impl core::fmt::Debug for Dfa {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (state, row) in self.transitions.iter().enumerate() {
            write!(f, "{state}")?;
            if let Some(action) = self.accepting[state] {
                write!(f, " [accept {}]", action.0)?;
            }
            f.write_str(":")?;
            for (byte, &target) in row.iter().enumerate() {
                if target != REJECT {
                    write!(f, " {}->{}", (byte as u8).escape_ascii(), target)?;
                }
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

/// Build the automaton from the attribution of an end-marked tree.
///
/// `leaves[p]` is the leaf numbered `p`; positions at or past `leaves.len()`
/// are end markers whose owners are `marker_owners[p - leaves.len()]`.
#[tracing::instrument(level = "debug", skip_all, fields(leaves = leaves.len()))]
pub fn build(
    followpos: &[PositionSeq],
    firstpos: &PositionSeq,
    leaves: &[Symbol],
    marker_owners: &[ActionId],
) -> Result<Dfa, CompileError> {
    if firstpos.is_empty() {
        return Err(CompileError::EmptyAutomaton);
    }

    let builder = Builder {
        followpos,
        leaves,
        marker_owners,
    };

    let mut state_sets: Vec<PositionSeq> = Vec::new();
    let mut state_index: FxHashMap<PositionSeq, StateId> = FxHashMap::default();
    let mut dfa = Dfa {
        transitions: Vec::new(),
        accepting: Vec::new(),
    };

    builder.add_state(&mut dfa, &mut state_sets, &mut state_index, firstpos.clone(), None)?;

    let mut index = 0;
    while index < state_sets.len() {
        let mut row = [REJECT; 256];
        for byte in 0..=255u8 {
            let (next, action) = builder.step(&state_sets[index], byte)?;
            if next.is_empty() {
                continue;
            }
            row[byte as usize] = match state_index.get(&next) {
                Some(&existing) => existing,
                None => builder.add_state(
                    &mut dfa,
                    &mut state_sets,
                    &mut state_index,
                    next,
                    action,
                )?,
            };
        }
        dfa.transitions[index] = row;
        index += 1;
    }

    tracing::debug!(states = dfa.num_states(), "automaton built");
    Ok(dfa)
}

struct Builder<'a> {
    followpos: &'a [PositionSeq],
    leaves: &'a [Symbol],
    marker_owners: &'a [ActionId],
}

impl Builder<'_> {
    fn leaf(&self, position: Position) -> &Symbol {
        self.leaves.get(position).unwrap_or(&END_MARKER)
    }

    fn is_marker(&self, position: Position) -> bool {
        position >= self.leaves.len()
    }

    /// Successor sequence of `state` on `byte`, and the action it accepts.
    ///
    /// The action comes from the first matching position until one is chosen.
    /// After that only an exact-byte match may re-decide, and only while the
    /// running candidate came from a class match.
    fn step(
        &self,
        state: &PositionSeq,
        byte: u8,
    ) -> Result<(PositionSeq, Option<ActionId>), CompileError> {
        let mut next = PositionSeq::new();
        let mut action: Option<ActionId> = None;
        let mut from_class = false;

        for &position in state {
            let leaf = self.leaf(position);
            if !leaf.matches(byte) {
                continue;
            }
            let follow = &self.followpos[position];
            if action.is_none() || (from_class && leaf.is_exact()) {
                from_class = !leaf.is_exact();
                if let Some(owner) = self.first_marker_owner(follow)? {
                    action = Some(owner);
                }
            }
            next.merge_distinct(follow);
        }

        Ok((next, action))
    }

    fn first_marker_owner(&self, follow: &PositionSeq) -> Result<Option<ActionId>, CompileError> {
        let marker = match follow.iter().copied().find(|&pos| self.is_marker(pos)) {
            Some(marker) => marker,
            None => return Ok(None),
        };
        self.marker_owners
            .get(marker - self.leaves.len())
            .copied()
            .map(Some)
            .ok_or(CompileError::Association { position: marker })
    }

    fn add_state(
        &self,
        dfa: &mut Dfa,
        state_sets: &mut Vec<PositionSeq>,
        state_index: &mut FxHashMap<PositionSeq, StateId>,
        positions: PositionSeq,
        action: Option<ActionId>,
    ) -> Result<StateId, CompileError> {
        if state_sets.len() >= MAX_STATES {
            return Err(CompileError::TooManyStates);
        }
        let id = state_sets.len() as StateId;
        tracing::trace!(id, ?positions, ?action, "new state");

        state_sets.try_reserve(1)?;
        dfa.transitions.try_reserve(1)?;
        dfa.accepting.try_reserve(1)?;
        state_index.try_reserve(1)?;

        state_index.insert(positions.clone(), id);
        state_sets.push(positions);
        dfa.transitions.push([REJECT; 256]);
        dfa.accepting.push(action);
        Ok(id)
    }
}
