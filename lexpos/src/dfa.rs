pub(crate) const INVALID_TARGET: u16 = u16::MAX;

/// Dense transition table sized at compile time.
///
/// Row `s` holds one target per input byte; `INVALID_TARGET` marks a dead
/// transition. State 0 is the start state.
#[derive(Clone)]
pub struct PackedDfa<const MAX_STATES: usize> {
    states_len: usize,
    transitions: [[u16; 256]; MAX_STATES],
    accepting: [Option<u16>; MAX_STATES],
}

impl<const MAX_STATES: usize> PackedDfa<MAX_STATES> {
    pub(crate) const fn start_state(&self) -> u16 {
        0
    }

    pub const fn states_len(&self) -> usize {
        self.states_len
    }

    pub(crate) fn next_state(&self, state: u16, byte: u8) -> Option<u16> {
        let idx = state as usize;
        if idx >= self.states_len {
            return None;
        }
        match self.transitions[idx][byte as usize] {
            INVALID_TARGET => None,
            target => Some(target),
        }
    }

    pub(crate) fn accept_token(&self, state: u16) -> Option<u16> {
        let idx = state as usize;
        if idx >= self.states_len {
            None
        } else {
            self.accepting[idx]
        }
    }

    pub const fn from_parts(
        transitions: [[u16; 256]; MAX_STATES],
        accepting: [Option<u16>; MAX_STATES],
        states_len: usize,
    ) -> Self {
        Self {
            states_len,
            transitions,
            accepting,
        }
    }
}
