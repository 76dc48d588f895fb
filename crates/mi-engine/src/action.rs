use std::collections::VecDeque;
use std::fmt;

use mi_parser::{CorrelationId, MAX_SEQUENCE, Record, ResultClass};
use tracing::warn;

/// A unit of debugger work that issues commands and reacts to their responses.
///
/// The queue calls [`Action::start`] once, then [`Action::resume`] for every
/// response correlated to this action, until the action calls
/// [`ActionContext::finish`].
pub trait Action {
    fn start(&mut self, ctx: &mut ActionContext);

    fn resume(&mut self, id: CorrelationId, record: &Record, ctx: &mut ActionContext);

    /// A barrier action is started only once every action queued before it has
    /// finished.
    fn barrier(&self) -> bool {
        false
    }
}

/// Per-action state owned by the queue.
#[derive(Debug)]
pub struct ActionContext {
    id: i32,
    started: bool,
    finished: bool,
    next_sequence: i64,
    pending: VecDeque<(CorrelationId, String)>,
}

impl ActionContext {
    pub(crate) fn new(id: i32) -> Self {
        Self {
            id,
            started: false,
            finished: false,
            next_sequence: 0,
            pending: VecDeque::new(),
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Queues `command` for transmission and returns the id its response will carry.
    ///
    /// Commands emitted after [`ActionContext::finish`] are dropped and
    /// [`CorrelationId::NONE`] is returned.
    pub fn emit(&mut self, command: impl Into<String>) -> CorrelationId {
        let command = command.into();
        if self.finished {
            warn!(action = self.id, command = %command, "Command emitted by a finished action was dropped");
            return CorrelationId::NONE;
        }

        let id = CorrelationId::new(self.id, self.next_sequence);
        self.next_sequence = if self.next_sequence == MAX_SEQUENCE {
            warn!(action = self.id, "Command sequence exhausted, restarting at 0");
            0
        } else {
            self.next_sequence + 1
        };
        self.pending.push_back((id, command));
        id
    }

    pub fn finish(&mut self) {
        self.finished = true;
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn mark_started(&mut self) {
        self.started = true;
    }

    pub(crate) fn drain_pending(&mut self) -> impl Iterator<Item = (CorrelationId, String)> + '_ {
        self.pending.drain(..)
    }
}

type RecordCallback = Box<dyn FnMut(&Record)>;

/// Sends one command and finishes on its response.
pub struct SimpleAction {
    command: String,
    on_response: Option<RecordCallback>,
}

impl SimpleAction {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            on_response: None,
        }
    }

    pub fn with_callback(mut self, on_response: impl FnMut(&Record) + 'static) -> Self {
        self.on_response = Some(Box::new(on_response));
        self
    }
}

impl fmt::Debug for SimpleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleAction")
            .field("command", &self.command)
            .finish_non_exhaustive()
    }
}

impl Action for SimpleAction {
    fn start(&mut self, ctx: &mut ActionContext) {
        ctx.emit(self.command.as_str());
    }

    fn resume(&mut self, _id: CorrelationId, record: &Record, ctx: &mut ActionContext) {
        if let Some(on_response) = self.on_response.as_mut() {
            on_response(record);
        }
        ctx.finish();
    }
}

/// Separates the actions queued before it from those queued after it.
#[derive(Debug, Default)]
pub struct BarrierAction;

impl Action for BarrierAction {
    fn start(&mut self, ctx: &mut ActionContext) {
        ctx.finish();
    }

    fn resume(&mut self, _id: CorrelationId, _record: &Record, _ctx: &mut ActionContext) {}

    fn barrier(&self) -> bool {
        true
    }
}

/// Issues a run-control command (`-exec-continue`, `-exec-next`, ...) once all
/// earlier work is done.
///
/// The callback receives `true` when the debugger answered `^running`.
pub struct RunAction<F: FnMut(bool)> {
    command: String,
    on_response: F,
}

impl<F: FnMut(bool)> RunAction<F> {
    pub fn new(command: impl Into<String>, on_response: F) -> Self {
        Self {
            command: command.into(),
            on_response,
        }
    }
}

impl<F: FnMut(bool)> Action for RunAction<F> {
    fn start(&mut self, ctx: &mut ActionContext) {
        ctx.emit(self.command.as_str());
    }

    fn resume(&mut self, _id: CorrelationId, record: &Record, ctx: &mut ActionContext) {
        (self.on_response)(record.class() == ResultClass::Running);
        ctx.finish();
    }

    fn barrier(&self) -> bool {
        true
    }
}
