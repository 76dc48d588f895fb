use mi_parser::{CorrelationId, Record, RecordKind, parse_record};
use tracing::{debug, warn};

use crate::queue::ActionQueue;

/// What happened to one line of debugger output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Delivered to the action with this id.
    Resumed(i32),
    /// Handed to the notification sink.
    Notified,
    /// A result whose owner is not in the queue.
    Unmatched(CorrelationId),
    /// The correlation prefix could not be decoded.
    Undecodable,
    Malformed,
}

/// Decodes, parses and routes one line of debugger output.
pub fn dispatch<F>(line: &str, queue: &mut ActionQueue, on_notify: F) -> Dispatch
where
    F: FnMut(&Record),
{
    match CorrelationId::decode(line) {
        Ok((id, rest)) => route(id, &parse_record(rest), queue, on_notify),
        Err(e) => {
            debug!(line = %line, error = %e, "Discarding undecodable line");
            Dispatch::Undecodable
        }
    }
}

/// Routes a record whose correlation prefix is already decoded.
///
/// Results go to the owning action, even when their body failed to parse.
/// Asynchronous records go to `on_notify` whatever id they carry.
pub fn route<F>(id: CorrelationId, record: &Record, queue: &mut ActionQueue, mut on_notify: F) -> Dispatch
where
    F: FnMut(&Record),
{
    if let Some(error) = record.parse_error() {
        warn!(id = %id, record = %record.debug_string(), error = %error, "Malformed response");
    }

    match record.kind() {
        RecordKind::Result => match queue.find(id.owner) {
            Some(action) => {
                action.resume(id, record);
                Dispatch::Resumed(id.owner)
            }
            None => {
                warn!(id = %id, record = %record.debug_string(), "No action for response");
                Dispatch::Unmatched(id)
            }
        },
        RecordKind::ExecAsync | RecordKind::StatusAsync | RecordKind::NotifyAsync => {
            on_notify(record);
            Dispatch::Notified
        }
        RecordKind::Malformed => {
            debug!(id = %id, "Discarding malformed record");
            Dispatch::Malformed
        }
    }
}
