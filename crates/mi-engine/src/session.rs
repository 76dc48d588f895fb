use mi_parser::{CorrelationId, Record, RecordKind, ResultClass};
use tracing::{debug, error};

use crate::action::Action;
use crate::config::EngineConfig;
use crate::dispatch::route;
use crate::error::EngineError;
use crate::executor::CommandExecutor;
use crate::queue::ActionQueue;
use crate::transport::Transport;

/// Glue between a host event loop, the command executor and the action queue.
///
/// The host calls [`Session::feed`] with debugger output as it arrives and
/// [`Session::poll`] from its timer or idle handler.
pub struct Session<T: Transport> {
    executor: CommandExecutor<T>,
    actions: ActionQueue,
    run_only_when_stopped: bool,
    stopped: bool,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T, config: &EngineConfig) -> Self {
        Self {
            executor: CommandExecutor::new(transport, config.command_history),
            actions: ActionQueue::new(),
            run_only_when_stopped: config.run_only_when_stopped,
            stopped: true,
        }
    }

    /// Queues `action` and starts it right away if the queue may advance.
    pub fn queue(&mut self, action: impl Action + 'static) -> Result<i32, EngineError> {
        let id = self.actions.insert(Box::new(action));
        self.advance()?;
        Ok(id)
    }

    pub fn execute(&mut self, command: &str) -> Result<CorrelationId, EngineError> {
        self.executor.execute(command)
    }

    /// Buffers every line of `text`, then runs the queue.
    pub fn feed(&mut self, text: &str) -> Result<(), EngineError> {
        for line in text.lines() {
            self.executor.process_output(line);
        }
        self.run_queue()
    }

    /// Dispatches all buffered output. Asynchronous records are passed to
    /// `on_notify` after the run state has been updated from them.
    pub fn poll<F>(&mut self, mut on_notify: F) -> Result<(), EngineError>
    where
        F: FnMut(&Record),
    {
        while let Some((id, record)) = self.executor.take_result() {
            self.track_run_state(&record);
            route(id, &record, &mut self.actions, &mut on_notify);
        }
        self.advance()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn interrupt(&mut self) -> Result<(), EngineError> {
        self.executor.interrupt()
    }

    /// Tears the session down: queued actions and unconsumed output are discarded.
    pub fn force_stop(&mut self) {
        debug!(actions = self.actions.len(), "Force stop");
        self.actions.clear();
        self.executor.clear();
        self.stopped = true;
    }

    pub fn actions(&self) -> &ActionQueue {
        &self.actions
    }

    pub fn executor(&self) -> &CommandExecutor<T> {
        &self.executor
    }

    pub fn transport(&self) -> &T {
        self.executor.transport()
    }

    pub fn transport_mut(&mut self) -> &mut T {
        self.executor.transport_mut()
    }

    fn track_run_state(&mut self, record: &Record) {
        if record.kind() != RecordKind::ExecAsync {
            return;
        }

        match record.class() {
            ResultClass::Running => self.stopped = false,
            ResultClass::Stopped => self.stopped = true,
            _ => {}
        }
    }

    fn advance(&mut self) -> Result<(), EngineError> {
        if self.run_only_when_stopped && !self.stopped {
            return Ok(());
        }
        self.run_queue()
    }

    fn run_queue(&mut self) -> Result<(), EngineError> {
        let executor = &mut self.executor;
        let mut failure = None;

        self.actions.run(|id, command| {
            if let Err(e) = executor.execute_with_id(id, command) {
                error!(id = %id, command = %command, error = %e, "Failed to send command");
                failure.get_or_insert(e);
            }
        });

        failure.map_or(Ok(()), Err)
    }
}
