use mi_parser::{CorrelationId, Record};
use tracing::{debug, trace, warn};

use crate::action::{Action, ActionContext};

/// An action together with the state the queue keeps for it.
pub struct QueuedAction {
    ctx: ActionContext,
    action: Box<dyn Action>,
}

impl QueuedAction {
    pub fn id(&self) -> i32 {
        self.ctx.id()
    }

    pub fn is_barrier(&self) -> bool {
        self.action.barrier()
    }

    pub fn is_started(&self) -> bool {
        self.ctx.is_started()
    }

    pub fn is_finished(&self) -> bool {
        self.ctx.is_finished()
    }

    /// Delivers one correlated response. Responses reaching a finished action
    /// are ignored.
    pub fn resume(&mut self, id: CorrelationId, record: &Record) {
        if self.ctx.is_finished() {
            debug!(action = self.id(), id = %id, "Response for a finished action ignored");
            return;
        }
        self.action.resume(id, record, &mut self.ctx);
    }

    fn start(&mut self) {
        debug!(action = self.id(), barrier = self.is_barrier(), "Starting action");
        self.ctx.mark_started();
        self.action.start(&mut self.ctx);
    }
}

/// Ordered set of live actions.
#[derive(Default)]
pub struct ActionQueue {
    actions: Vec<QueuedAction>,
    last_id: i32,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `action` and returns its id. Ids start at 1 and restart at 1
    /// once `i32::MAX` has been handed out.
    pub fn insert(&mut self, action: Box<dyn Action>) -> i32 {
        self.last_id = self.last_id.checked_add(1).unwrap_or_else(|| {
            warn!("Action ids exhausted, restarting at 1");
            1
        });
        let id = self.last_id;
        self.actions.push(QueuedAction {
            ctx: ActionContext::new(id),
            action,
        });
        trace!(action = id, "Queued action");
        id
    }

    pub fn find(&mut self, id: i32) -> Option<&mut QueuedAction> {
        self.actions.iter_mut().find(|a| a.id() == id)
    }

    /// Starts every action that may start, hands its pending commands to
    /// `transmit` in emission order and evicts finished actions.
    ///
    /// The walk stops at the first barrier that is not at the front of the queue.
    pub fn run<F>(&mut self, mut transmit: F)
    where
        F: FnMut(CorrelationId, &str),
    {
        let mut first = true;
        let mut index = 0;

        while index < self.actions.len() {
            let entry = &mut self.actions[index];

            if entry.is_barrier() && !first {
                break;
            }

            if !entry.is_started() {
                entry.start();
            }

            for (id, command) in entry.ctx.drain_pending() {
                transmit(id, &command);
            }

            first = false;

            if entry.is_finished() {
                debug!(action = entry.id(), "Action finished");
                self.actions.remove(index);
                if index == 0 {
                    first = true;
                }
            } else {
                index += 1;
            }
        }
    }

    /// Drops every action without running it.
    pub fn clear(&mut self) {
        if !self.actions.is_empty() {
            debug!(count = self.actions.len(), "Discarding queued actions");
        }
        self.actions.clear();
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.actions.iter().map(|a| a.id())
    }
}
