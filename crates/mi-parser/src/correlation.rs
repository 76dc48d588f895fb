use std::fmt::{self, Display, Formatter};

use serde::Serialize;
use thiserror::Error;

/// Width of the zero-padded sequence part of an encoded id.
pub const SEQUENCE_WIDTH: usize = 10;

/// Largest sequence that fits in [`SEQUENCE_WIDTH`] digits.
pub const MAX_SEQUENCE: i64 = 9_999_999_999;

/// Owner used for commands issued outside any action.
pub const DIRECT_OWNER: i32 = 0;

const RECORD_SIGILS: [char; 4] = ['^', '*', '+', '='];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CorrelationError {
    #[error("Line is not a correlated record")]
    NotCorrelated,
    #[error("Ambiguous {0}-digit correlation prefix")]
    Ambiguous(usize),
    #[error("Correlation owner `{0}` is out of range")]
    OwnerOutOfRange(String),
}

/// Identifies the action (`owner`) and the command within it (`sequence`) a
/// response belongs to.
///
/// Encoded as the decimal owner immediately followed by the sequence zero-padded
/// to ten digits, so the decoder can always split from the right no matter how
/// many digits the owner has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CorrelationId {
    pub owner: i32,
    pub sequence: i64,
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::NONE
    }
}

impl CorrelationId {
    /// Id of a line that carried no numeric prefix.
    pub const NONE: CorrelationId = CorrelationId {
        owner: -1,
        sequence: -1,
    };

    pub fn new(owner: i32, sequence: i64) -> Self {
        Self { owner, sequence }
    }

    pub fn direct(sequence: i64) -> Self {
        Self::new(DIRECT_OWNER, sequence)
    }

    #[inline(always)]
    pub fn has_owner(&self) -> bool {
        self.owner >= 0
    }

    pub fn encode(&self) -> String {
        format!("{}{:0width$}", self.owner, self.sequence, width = SEQUENCE_WIDTH)
    }

    /// Splits the correlation prefix off `line`.
    ///
    /// A line without leading digits is accepted only if it starts with a record
    /// sigil, and then carries [`CorrelationId::NONE`]. One to ten leading digits
    /// cannot be split into owner and sequence and are rejected.
    pub fn decode(line: &str) -> Result<(CorrelationId, &str), CorrelationError> {
        let digits = line.bytes().take_while(|b| b.is_ascii_digit()).count();

        match digits {
            0 if line.starts_with(RECORD_SIGILS) => Ok((CorrelationId::NONE, line)),
            0 => Err(CorrelationError::NotCorrelated),
            n if n <= SEQUENCE_WIDTH => Err(CorrelationError::Ambiguous(n)),
            n => {
                let split = n - SEQUENCE_WIDTH;
                let owner = &line[..split];
                let owner = owner
                    .parse::<i32>()
                    .map_err(|_| CorrelationError::OwnerOutOfRange(owner.to_string()))?;
                let sequence = line[split..n]
                    .parse::<i64>()
                    .map_err(|_| CorrelationError::NotCorrelated)?;

                Ok((CorrelationId::new(owner, sequence), &line[n..]))
            }
        }
    }
}

impl Display for CorrelationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.has_owner() {
            write!(f, "{}", self.encode())
        } else {
            write!(f, "<none>")
        }
    }
}
