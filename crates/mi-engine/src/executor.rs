use std::collections::VecDeque;

use mi_parser::{CorrelationId, MAX_SEQUENCE, Record, parse_record};
use tracing::{debug, trace, warn};

use crate::error::EngineError;
use crate::transport::Transport;

/// Sends prefixed commands and buffers correlated output until it is dispatched.
pub struct CommandExecutor<T: Transport> {
    transport: T,
    last_direct: i64,
    results: VecDeque<(CorrelationId, String)>,
    history: VecDeque<String>,
    history_capacity: usize,
}

impl<T: Transport> CommandExecutor<T> {
    pub fn new(transport: T, history_capacity: usize) -> Self {
        Self {
            transport,
            last_direct: 0,
            results: VecDeque::new(),
            history: VecDeque::with_capacity(history_capacity),
            history_capacity,
        }
    }

    /// Sends a command that belongs to no action.
    pub fn execute(&mut self, command: &str) -> Result<CorrelationId, EngineError> {
        let id = CorrelationId::direct(self.last_direct);
        self.last_direct = if self.last_direct == MAX_SEQUENCE {
            warn!("Direct command sequence exhausted, restarting at 0");
            0
        } else {
            self.last_direct + 1
        };
        self.execute_with_id(id, command)?;
        Ok(id)
    }

    pub fn execute_with_id(&mut self, id: CorrelationId, command: &str) -> Result<(), EngineError> {
        let line = format!("{}{}", id.encode(), command);
        debug!(line = %line, "cmd==>");

        self.transport.send_line(&line).map_err(EngineError::Transport)?;

        if self.history_capacity > 0 {
            if self.history.len() == self.history_capacity {
                self.history.pop_front();
            }
            self.history.push_back(line);
        }
        Ok(())
    }

    /// Buffers one line of debugger output. Returns `false` for lines that do
    /// not carry a record (console streams, the prompt, ambiguous prefixes).
    pub fn process_output(&mut self, line: &str) -> bool {
        match CorrelationId::decode(line) {
            Ok((id, rest)) => {
                trace!(id = %id, line = %rest, "output<==");
                self.results.push_back((id, rest.to_string()));
                true
            }
            Err(e) => {
                if line.starts_with('&') {
                    trace!(line = %line, "Log stream output");
                } else {
                    debug!(line = %line, error = %e, "Unparsable output");
                }
                false
            }
        }
    }

    pub fn has_output(&self) -> bool {
        !self.results.is_empty()
    }

    /// Parses the oldest buffered line.
    pub fn take_result(&mut self) -> Option<(CorrelationId, Record)> {
        let (id, line) = self.results.pop_front()?;
        let record = parse_record(&line);

        if !record.parse_ok() {
            warn!(id = %id, line = %line, "Response could not be fully parsed");
        }
        Some((id, record))
    }

    pub fn interrupt(&mut self) -> Result<(), EngineError> {
        debug!("Interrupting debugger");
        self.transport.interrupt().map_err(EngineError::Interrupt)
    }

    /// Drops buffered output and restarts direct command numbering.
    pub fn clear(&mut self) {
        self.results.clear();
        self.last_direct = 0;
    }

    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{ChannelTransport, Outbound, RecordingTransport};
    use mi_parser::{RecordKind, ResultClass};
    use rstest::rstest;

    fn executor(history: usize) -> CommandExecutor<RecordingTransport> {
        CommandExecutor::new(RecordingTransport::new(), history)
    }

    #[test]
    fn test_execute_numbers_direct_commands() {
        let mut executor = executor(8);

        assert_eq!(executor.execute("-gdb-set width 0").unwrap(), CorrelationId::new(0, 0));
        assert_eq!(executor.execute("-gdb-set height 0").unwrap(), CorrelationId::new(0, 1));
        assert_eq!(
            executor.transport().lines,
            vec!["00000000000-gdb-set width 0", "00000000001-gdb-set height 0"]
        );
    }

    #[test]
    fn test_direct_sequence_wraps() {
        let mut executor = executor(8);
        executor.last_direct = MAX_SEQUENCE;

        assert_eq!(
            executor.execute("-a").unwrap(),
            CorrelationId::direct(MAX_SEQUENCE)
        );
        assert_eq!(executor.execute("-b").unwrap(), CorrelationId::direct(0));
        assert_eq!(
            executor.transport().lines,
            vec!["09999999999-a", "00000000000-b"]
        );
    }

    #[test]
    fn test_interrupt_errors() {
        let (transport, rx) = ChannelTransport::new();
        let mut executor = CommandExecutor::new(transport, 0);

        executor.interrupt().unwrap();
        assert_eq!(rx.try_recv().unwrap(), Outbound::Interrupt);

        drop(rx);
        assert!(matches!(executor.interrupt(), Err(EngineError::Interrupt(_))));
        assert!(matches!(executor.execute("-a"), Err(EngineError::Transport(_))));
    }

    #[test]
    fn test_history_is_bounded() {
        let mut executor = executor(2);
        for command in ["-a", "-b", "-c"] {
            executor.execute(command).unwrap();
        }

        assert_eq!(
            executor.history().collect::<Vec<_>>(),
            vec!["00000000001-b", "00000000002-c"]
        );
        assert_eq!(executor.transport().lines.len(), 3);
    }

    #[test]
    fn test_no_history() {
        let mut executor = executor(0);
        executor.execute("-a").unwrap();
        assert_eq!(executor.history().count(), 0);
    }

    #[rstest]
    #[case("30000000000^done", true)]
    #[case("*stopped,reason=\"exited-normally\"", true)]
    #[case("=thread-exited,id=\"1\"", true)]
    #[case("~\"hello\\n\"", false)]
    #[case("&\"warning: no symbols\\n\"", false)]
    #[case("(gdb) ", false)]
    #[case("42^done", false)]
    fn test_process_output(#[case] line: &str, #[case] buffered: bool) {
        let mut executor = executor(0);
        assert_eq!(executor.process_output(line), buffered);
        assert_eq!(executor.has_output(), buffered);
    }

    #[test]
    fn test_take_result_in_order() {
        let mut executor = executor(0);
        executor.process_output("30000000000^done,bkpt={number=");
        executor.process_output("*running,thread-id=\"all\"");

        let (id, record) = executor.take_result().unwrap();
        assert_eq!(id, CorrelationId::new(3, 0));
        assert_eq!(record.class(), ResultClass::Done);
        assert!(!record.parse_ok());

        let (id, record) = executor.take_result().unwrap();
        assert_eq!(id, CorrelationId::NONE);
        assert_eq!(record.kind(), RecordKind::ExecAsync);

        assert!(executor.take_result().is_none());
    }

    #[test]
    fn test_clear() {
        let mut executor = executor(0);
        executor.execute("-a").unwrap();
        executor.process_output("00000000000^done");
        executor.clear();

        assert!(!executor.has_output());
        assert_eq!(executor.execute("-b").unwrap(), CorrelationId::new(0, 0));
    }

    #[test]
    fn test_interrupt() {
        let mut executor = executor(0);
        executor.interrupt().unwrap();
        assert_eq!(executor.transport().interrupts, 1);
    }
}
