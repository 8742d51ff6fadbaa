use crate::compile::CompiledLexer;

#[derive(Copy, Clone, Debug, Default)]
pub struct TokenInfo<T> {
    pub token: T,
    pub skip: bool,
}

/// A finished token. Skipped tokens are reported too, flagged by `skip`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Match<T> {
    pub token_id: u16,
    pub token: T,
    pub length: usize,
    pub skip: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LexerError {
    NoMatch,
    UnexpectedEnd { span: usize },
}

/// Result of feeding a byte into the streaming lexer.
///
/// `length` on `Emit` and `Skip` is the length of the longest accepted
/// prefix, which may be shorter than the bytes fed so far. The caller resumes
/// at `start + length`, including the byte that triggered the result.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Advance<T> {
    Progress,
    Emit {
        token: T,
        token_id: u16,
        length: usize,
    },
    Skip {
        length: usize,
        token_id: u16,
    },
    Reject {
        span: usize,
    },
}

/// Streaming DFA interpreter with longest-match semantics.
pub struct Lexer<'a, T, const TOKENS: usize, const STATES: usize>
where
    T: Copy + Default,
{
    compiled: &'a CompiledLexer<T, TOKENS, STATES>,
    state: u16,
    progress_len: usize,
    last_accept: Option<Accept>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Accept {
    token_id: u16,
    length: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Checkpoint {
    pub(crate) state: u16,
    pub(crate) progress_len: usize,
    pub(crate) last_accept: Option<Accept>,
}

impl Checkpoint {
    pub const fn start(state: u16) -> Self {
        Self {
            state,
            progress_len: 0,
            last_accept: None,
        }
    }

    pub const fn state(&self) -> u16 {
        self.state
    }

    /// Bytes consumed since the current token started.
    pub const fn progress(&self) -> usize {
        self.progress_len
    }
}

impl<'a, T, const TOKENS: usize, const STATES: usize> Lexer<'a, T, TOKENS, STATES>
where
    T: Copy + Default,
{
    pub fn new(compiled: &'a CompiledLexer<T, TOKENS, STATES>) -> Self {
        let start = Checkpoint::start(compiled.dfa.start_state());
        Self {
            compiled,
            state: start.state,
            progress_len: start.progress_len,
            last_accept: start.last_accept,
        }
    }

    pub fn reset(&mut self) {
        let start = Checkpoint::start(self.compiled.dfa.start_state());
        self.restore(start);
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            state: self.state,
            progress_len: self.progress_len,
            last_accept: self.last_accept,
        }
    }

    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.state = checkpoint.state;
        self.progress_len = checkpoint.progress_len;
        self.last_accept = checkpoint.last_accept;
    }

    /// Feed a single byte into the automaton.
    pub fn advance(&mut self, byte: u8) -> Advance<T> {
        match self.compiled.dfa.next_state(self.state, byte) {
            Some(next_state) => {
                self.state = next_state;
                self.progress_len += 1;
                if let Some(token_id) = self.compiled.dfa.accept_token(next_state) {
                    self.last_accept = Some(Accept {
                        token_id,
                        length: self.progress_len,
                    });
                }
                Advance::Progress
            }
            None => {
                let last_accept = self.last_accept.take();
                let span = self.progress_len;
                self.reset();
                let Some(accept) = last_accept else {
                    return Advance::Reject { span };
                };
                match self.compiled.token_entry(accept.token_id) {
                    Some(info) if info.skip => Advance::Skip {
                        length: accept.length,
                        token_id: accept.token_id,
                    },
                    Some(info) => Advance::Emit {
                        token: info.token,
                        token_id: accept.token_id,
                        length: accept.length,
                    },
                    None => Advance::Reject { span },
                }
            }
        }
    }

    /// Finalise lexing when the input stream has been exhausted.
    ///
    /// A returned match may be shorter than the pending input; the caller
    /// feeds the remainder again.
    pub fn finish(&mut self) -> Result<Option<Match<T>>, LexerError> {
        if let Some(accept) = self.last_accept.take() {
            self.reset();
            match self.compiled.token_entry(accept.token_id) {
                Some(info) => Ok(Some(Match {
                    token_id: accept.token_id,
                    token: info.token,
                    length: accept.length,
                    skip: info.skip,
                })),
                None => Err(LexerError::NoMatch),
            }
        } else if self.progress_len == 0 {
            Ok(None)
        } else {
            let span = self.progress_len;
            self.reset();
            Err(LexerError::UnexpectedEnd { span })
        }
    }
}
