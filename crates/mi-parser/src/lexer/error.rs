use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexerError {
    #[error("Unterminated string starting at offset {0}")]
    UnterminatedString(usize),
    #[error("Offset {0} is not a token boundary")]
    InvalidOffset(usize),
}
