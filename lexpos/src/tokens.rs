use crate::compile::CompiledLexer;
use crate::lexer::{Advance, Lexer, LexerError, Match};
use heapless::Vec;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TokenRecord<T> {
    pub id: u16,
    pub token: T,
    pub start: usize,
    pub end: usize,
    pub skipped: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScanError {
    TokenOverflow,
    /// No token starts at `offset`; the automaton died after `span` bytes.
    Reject { offset: usize, span: usize },
    /// Input ended inside a token that had not yet accepted.
    UnexpectedEnd { offset: usize, span: usize },
    UnknownToken(u16),
}

/// Fixed-capacity token list filled by [`TokenBuffer::scan`].
#[derive(Debug)]
pub struct TokenBuffer<T, const MAX_TOKENS: usize> {
    tokens: Vec<TokenRecord<T>, MAX_TOKENS>,
}

impl<T, const MAX_TOKENS: usize> TokenBuffer<T, MAX_TOKENS>
where
    T: Copy + Default,
{
    pub const fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    pub fn tokens(&self) -> &[TokenRecord<T>] {
        self.tokens.as_slice()
    }

    /// Tokens that were not marked `skip`.
    pub fn significant(&self) -> impl Iterator<Item = &TokenRecord<T>> {
        self.tokens.iter().filter(|record| !record.skipped)
    }

    /// Tokenise the whole of `input`, replacing any previous contents.
    ///
    /// Each token is the longest accepted prefix of the remaining input; after
    /// a token ends the scan restarts right behind it.
    pub fn scan<const TOKENS: usize, const STATES: usize>(
        &mut self,
        compiled: &CompiledLexer<T, TOKENS, STATES>,
        input: &[u8],
    ) -> Result<(), ScanError> {
        self.tokens.clear();
        let mut lexer = compiled.lexer();
        run_lexer(compiled, &mut lexer, input, &mut self.tokens)
    }
}

impl<T, const MAX_TOKENS: usize> Default for TokenBuffer<T, MAX_TOKENS>
where
    T: Copy + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

fn run_lexer<T, const TOKENS: usize, const STATES: usize, const MAX_TOKENS: usize>(
    compiled: &CompiledLexer<T, TOKENS, STATES>,
    lexer: &mut Lexer<'_, T, TOKENS, STATES>,
    input: &[u8],
    records: &mut Vec<TokenRecord<T>, MAX_TOKENS>,
) -> Result<(), ScanError>
where
    T: Copy + Default,
{
    let mut token_start = 0;
    let mut offset = 0;

    loop {
        if let Some(&byte) = input.get(offset) {
            match lexer.advance(byte) {
                Advance::Progress => offset += 1,
                Advance::Emit {
                    token,
                    token_id,
                    length,
                } => {
                    push_record(records, token_id, token, token_start, length, false)?;
                    token_start += length;
                    offset = token_start;
                }
                Advance::Skip { length, token_id } => {
                    let info = compiled
                        .token_entry(token_id)
                        .ok_or(ScanError::UnknownToken(token_id))?;
                    push_record(records, token_id, info.token, token_start, length, true)?;
                    token_start += length;
                    offset = token_start;
                }
                Advance::Reject { span } => {
                    return Err(ScanError::Reject {
                        offset: token_start,
                        span,
                    });
                }
            }
            continue;
        }

        match lexer.finish() {
            Ok(Some(Match {
                token_id,
                token,
                length,
                skip,
            })) => {
                push_record(records, token_id, token, token_start, length, skip)?;
                token_start += length;
                offset = token_start;
                if token_start == input.len() {
                    return Ok(());
                }
            }
            Ok(None) => return Ok(()),
            Err(LexerError::UnexpectedEnd { span }) => {
                return Err(ScanError::UnexpectedEnd {
                    offset: token_start,
                    span,
                });
            }
            Err(LexerError::NoMatch) => {
                return Err(ScanError::Reject {
                    offset: token_start,
                    span: 0,
                });
            }
        }
    }
}

fn push_record<T, const MAX_TOKENS: usize>(
    records: &mut Vec<TokenRecord<T>, MAX_TOKENS>,
    id: u16,
    token: T,
    start: usize,
    length: usize,
    skipped: bool,
) -> Result<(), ScanError> {
    records
        .push(TokenRecord {
            id,
            token,
            start,
            end: start + length,
            skipped,
        })
        .map_err(|_| ScanError::TokenOverflow)
}
