use crate::dfa::PackedDfa;
use crate::lexer::TokenInfo;

#[derive(Debug, Copy, Clone)]
pub struct TokenSpec<'a, T> {
    pub pattern: &'a str,
    pub token: T,
    pub skip: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    TooManyTokens,
    StateOverflow,
    #[cfg(feature = "alloc")]
    Build(lexpos_compiler::CompileError),
}

pub struct CompiledLexer<T, const TOKENS: usize, const STATES: usize> {
    pub(crate) dfa: PackedDfa<STATES>,
    pub(crate) token_info: [TokenInfo<T>; TOKENS],
}

impl<T, const TOKENS: usize, const STATES: usize> CompiledLexer<T, TOKENS, STATES>
where
    T: Copy + Default,
{
    pub fn token(&self, id: u16) -> Option<T> {
        self.token_info
            .get(id as usize)
            .and_then(|info| if info.skip { None } else { Some(info.token) })
    }

    pub fn token_entry(&self, id: u16) -> Option<&TokenInfo<T>> {
        self.token_info.get(id as usize)
    }

    pub fn lexer(&self) -> crate::lexer::Lexer<'_, T, TOKENS, STATES> {
        crate::lexer::Lexer::new(self)
    }

    pub fn dfa(&self) -> &PackedDfa<STATES> {
        &self.dfa
    }

    pub const fn from_parts(dfa: PackedDfa<STATES>, token_info: [TokenInfo<T>; TOKENS]) -> Self {
        Self { dfa, token_info }
    }
}

/// Build a lexer from the supplied token specifications.
///
/// Spec `i` becomes token id `i`. When two specs accept the same text the
/// earlier one wins, except that a literal byte beats a class that matched
/// first.
///
/// * `TOKENS` – maximum number of token definitions.
/// * `STATES` – maximum number of DFA states; every state costs one dense
///   256-entry row.
///
/// The compilation itself happens on the host, usually from the derive macro.
/// The resulting [`CompiledLexer`] is plain data and can be embedded in
/// `no_std` targets.
#[cfg(feature = "alloc")]
pub use host::compile;

#[cfg(feature = "alloc")]
mod host {
    extern crate alloc;

    use super::*;
    use crate::dfa::INVALID_TARGET;
    use alloc::vec::Vec;
    use lexpos_compiler::{Dfa, REJECT};

    const _: () = assert!(INVALID_TARGET == REJECT);

    pub fn compile<'a, T, const TOKENS: usize, const STATES: usize>(
        specs: &[TokenSpec<'a, T>],
    ) -> Result<CompiledLexer<T, TOKENS, STATES>, CompileError>
    where
        T: Copy + Default,
    {
        if specs.len() > TOKENS {
            return Err(CompileError::TooManyTokens);
        }

        let mut patterns: Vec<&[u8]> = Vec::with_capacity(specs.len());
        let mut tokens: [TokenInfo<T>; TOKENS] = [TokenInfo::default(); TOKENS];

        for (index, spec) in specs.iter().enumerate() {
            patterns.push(spec.pattern.as_bytes());
            tokens[index] = TokenInfo {
                token: spec.token,
                skip: spec.skip,
            };
        }

        let dfa = lexpos_compiler::compile(&patterns).map_err(CompileError::Build)?;
        let packed = pack_dfa::<STATES>(&dfa)?;

        Ok(CompiledLexer {
            dfa: packed,
            token_info: tokens,
        })
    }

    fn pack_dfa<const MAX_STATES: usize>(dfa: &Dfa) -> Result<PackedDfa<MAX_STATES>, CompileError> {
        if dfa.num_states() > MAX_STATES {
            return Err(CompileError::StateOverflow);
        }

        let mut transitions = [[INVALID_TARGET; 256]; MAX_STATES];
        let mut accepting = [None; MAX_STATES];
        for (idx, row) in dfa.rows().iter().enumerate() {
            transitions[idx] = *row;
        }
        for (idx, action) in dfa.accepting_states().iter().enumerate() {
            accepting[idx] = action.map(|action| action.0);
        }

        Ok(PackedDfa::from_parts(
            transitions,
            accepting,
            dfa.num_states(),
        ))
    }
}
