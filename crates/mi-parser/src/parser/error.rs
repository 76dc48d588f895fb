use thiserror::Error;

use crate::lexer::error::LexerError;
use crate::lexer::token::Token;
use crate::value::Value;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error(transparent)]
    Lexer(#[from] LexerError),
    #[error("Unexpected token `{0}`")]
    UnexpectedToken(Token),
    #[error("Missing value for the name at offset {0}")]
    MissingValue(usize),
    #[error("Trailing comma at offset {0}")]
    TrailingComma(usize),
    #[error("Mismatched closing bracket `{0}`")]
    MismatchedClose(Token),
    #[error("Unexpected end of input, expected a closing `{0}`")]
    UnexpectedEof(char),
    #[error("Unexpected text after the record class at offset {0}")]
    UnexpectedText(usize),
}

/// A failed parse together with everything that was completed before the error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{error}")]
pub struct ParseFailure {
    #[source]
    pub error: ParseError,
    pub partial: Value,
}
