//! `mi-parser` parses the output of GDB's Machine Interface.
//!
//! ## Examples
//!
//! ```rust
//! use mi_parser::{CorrelationId, RecordKind, ResultClass, parse_record};
//!
//! let (id, rest) = CorrelationId::decode(r#"30000000000^done,bkpt={number="2"}"#).unwrap();
//! assert_eq!(id, CorrelationId::new(3, 0));
//!
//! let record = parse_record(rest);
//! assert_eq!(record.kind(), RecordKind::Result);
//! assert_eq!(record.class(), ResultClass::Done);
//! assert_eq!(record.body().lookup_str("bkpt.number"), Some("2"));
//! ```
mod correlation;
mod lexer;
mod parser;
mod record;
mod value;

pub use correlation::{CorrelationError, CorrelationId, DIRECT_OWNER, MAX_SEQUENCE, SEQUENCE_WIDTH};
pub use lexer::error::LexerError;
pub use lexer::token::{Token, TokenKind};
pub use lexer::{Lexer, next_token};
pub use parser::error::{ParseError, ParseFailure};
pub use parser::{parse_value, parse_value_sequence};
pub use record::{Record, RecordKind, ResultClass, parse_record};
pub use value::{Field, Value, ValueError, ValueKind};
