use std::fmt::{self, Display, Formatter};

use serde::Serialize;
use smol_str::SmolStr;

use crate::parser::error::ParseError;
use crate::parser::parse_value_sequence;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordKind {
    Result,
    ExecAsync,
    StatusAsync,
    NotifyAsync,
    Malformed,
}

impl RecordKind {
    pub fn from_sigil(c: char) -> Self {
        match c {
            '^' => RecordKind::Result,
            '*' => RecordKind::ExecAsync,
            '+' => RecordKind::StatusAsync,
            '=' => RecordKind::NotifyAsync,
            _ => RecordKind::Malformed,
        }
    }

    pub fn sigil(&self) -> Option<char> {
        match self {
            RecordKind::Result => Some('^'),
            RecordKind::ExecAsync => Some('*'),
            RecordKind::StatusAsync => Some('+'),
            RecordKind::NotifyAsync => Some('='),
            RecordKind::Malformed => None,
        }
    }

    /// Out-of-band records are never correlated to a command.
    #[inline(always)]
    pub fn is_out_of_band(&self) -> bool {
        matches!(
            self,
            RecordKind::ExecAsync | RecordKind::StatusAsync | RecordKind::NotifyAsync
        )
    }
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Result => write!(f, "result"),
            RecordKind::ExecAsync => write!(f, "exec-async-output"),
            RecordKind::StatusAsync => write!(f, "status-async-output"),
            RecordKind::NotifyAsync => write!(f, "notify-async-output"),
            RecordKind::Malformed => write!(f, "malformed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResultClass {
    Done,
    Running,
    Connected,
    Error,
    Exit,
    Stopped,
    Unknown,
}

impl ResultClass {
    const KEYWORDS: [ResultClass; 6] = [
        ResultClass::Done,
        ResultClass::Stopped,
        ResultClass::Running,
        ResultClass::Connected,
        ResultClass::Error,
        ResultClass::Exit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResultClass::Done => "done",
            ResultClass::Running => "running",
            ResultClass::Connected => "connected",
            ResultClass::Error => "error",
            ResultClass::Exit => "exit",
            ResultClass::Stopped => "stopped",
            ResultClass::Unknown => "unknown",
        }
    }

    fn strip_keyword(input: &str) -> Option<(ResultClass, &str)> {
        Self::KEYWORDS
            .iter()
            .find_map(|class| input.strip_prefix(class.as_str()).map(|rest| (*class, rest)))
    }
}

impl Display for ResultClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One classified line of debugger output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    kind: RecordKind,
    class: ResultClass,
    #[serde(skip_serializing_if = "SmolStr::is_empty")]
    notify_tag: SmolStr,
    body: Value,
    parse_ok: bool,
    #[serde(skip)]
    error: Option<ParseError>,
}

impl Record {
    fn malformed() -> Self {
        Self {
            kind: RecordKind::Malformed,
            class: ResultClass::Unknown,
            notify_tag: SmolStr::default(),
            body: Value::default(),
            parse_ok: false,
            error: None,
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn class(&self) -> ResultClass {
        self.class
    }

    /// Tag of a notify (`=breakpoint-modified`) or status (`+download`) record.
    pub fn notify_tag(&self) -> &str {
        &self.notify_tag
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn parse_ok(&self) -> bool {
        self.parse_ok
    }

    pub fn parse_error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    pub fn is_error(&self) -> bool {
        self.kind == RecordKind::Result && self.class == ResultClass::Error
    }

    /// The `msg` of an `^error` record.
    pub fn error_message(&self) -> Option<&str> {
        if self.is_error() {
            self.body.lookup_str("msg")
        } else {
            None
        }
    }

    pub fn debug_string(&self) -> String {
        format!(
            "type: {}, class: {}, results: {}",
            self.kind,
            self.class,
            self.body.to_results_string()
        )
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Some(sigil) = self.kind.sigil() else {
            return write!(f, "<malformed>");
        };

        match self.kind {
            RecordKind::Result | RecordKind::ExecAsync => write!(f, "{}{}", sigil, self.class)?,
            _ => write!(f, "{}{}", sigil, self.notify_tag)?,
        }

        if !self.body.is_empty() {
            write!(f, ",{}", self.body.to_results_string())?;
        }

        Ok(())
    }
}

/// Classifies and parses one line of output whose correlation prefix has already
/// been stripped.
///
/// This never fails: lines that are not MI records come back as
/// [`RecordKind::Malformed`], and a broken body yields `parse_ok() == false` with
/// whatever part of the tree was parsed.
pub fn parse_record(line: &str) -> Record {
    let Some(sigil) = line.chars().next() else {
        return Record::malformed();
    };
    let kind = RecordKind::from_sigil(sigil);
    let rest = &line[sigil.len_utf8()..];

    let (class, notify_tag, after) = match kind {
        RecordKind::Malformed => return Record::malformed(),
        RecordKind::Result | RecordKind::ExecAsync => match ResultClass::strip_keyword(rest) {
            Some((class, after)) => (class, SmolStr::default(), after),
            None => return Record::malformed(),
        },
        RecordKind::StatusAsync | RecordKind::NotifyAsync => {
            let tag = rest.split(',').next().unwrap_or_default();
            if tag.is_empty() {
                return Record::malformed();
            }
            (ResultClass::Unknown, SmolStr::new(tag), &rest[tag.len()..])
        }
    };

    let offset = line.len() - after.len();
    let (body, error) = if after.is_empty() {
        (Value::default(), None)
    } else if after.starts_with(',') {
        match parse_value_sequence(line, offset + 1, false) {
            Ok((body, _)) => (body, None),
            Err(failure) => (failure.partial, Some(failure.error)),
        }
    } else {
        (Value::default(), Some(ParseError::UnexpectedText(offset)))
    };

    Record {
        kind,
        class,
        notify_tag,
        body,
        parse_ok: error.is_none(),
        error,
    }
}
