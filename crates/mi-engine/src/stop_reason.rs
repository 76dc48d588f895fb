use std::fmt::{self, Display, Formatter};

use mi_parser::Value;

/// Why the inferior stopped, from the `reason` of a `*stopped` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    BreakpointHit,
    ExitedSignalled,
    Exited,
    ExitedNormally,
    SignalReceived,
    LocationReached,
    EndSteppingRange,
    Unknown,
}

impl StopReason {
    /// Accepts a record body carrying a `reason` field, or the bare reason scalar.
    pub fn parse(value: &Value) -> Self {
        let reason = match value {
            Value::Tuple(_) => value.lookup_str("reason"),
            Value::Scalar(s) => Some(s.as_str()),
            Value::Array(_) => None,
        };

        reason.map(Self::from_reason).unwrap_or(StopReason::Unknown)
    }

    pub fn from_reason(reason: &str) -> Self {
        match reason {
            "breakpoint-hit" | "watchpoint-scope" => StopReason::BreakpointHit,
            "exited-signalled" => StopReason::ExitedSignalled,
            "exited" => StopReason::Exited,
            "exited-normally" => StopReason::ExitedNormally,
            "signal-received" => StopReason::SignalReceived,
            "location-reached" => StopReason::LocationReached,
            "end-stepping-range" => StopReason::EndSteppingRange,
            _ => StopReason::Unknown,
        }
    }

    /// The inferior is gone after stopping for this reason.
    pub fn is_exit(&self) -> bool {
        matches!(
            self,
            StopReason::Exited | StopReason::ExitedNormally | StopReason::ExitedSignalled
        )
    }
}

impl Display for StopReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::BreakpointHit => "breakpoint-hit",
            StopReason::ExitedSignalled => "exited-signalled",
            StopReason::Exited => "exited",
            StopReason::ExitedNormally => "exited-normally",
            StopReason::SignalReceived => "signal-received",
            StopReason::LocationReached => "location-reached",
            StopReason::EndSteppingRange => "end-stepping-range",
            StopReason::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}
