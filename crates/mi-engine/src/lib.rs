//! `mi-engine` drives a GDB/MI debugger: it schedules [`Action`]s, tags the
//! commands they emit with a [`mi_parser::CorrelationId`] and routes every
//! response back to the action that asked for it.
//!
//! ## Examples
//!
//! ```rust
//! use mi_engine::{EngineConfig, RecordingTransport, Session, SimpleAction};
//!
//! let mut session = Session::new(RecordingTransport::new(), &EngineConfig::default());
//! session.queue(SimpleAction::new("-break-insert main.cpp:10")).unwrap();
//! assert_eq!(session.transport().lines, vec!["10000000000-break-insert main.cpp:10"]);
//!
//! session.feed("10000000000^done,bkpt={number=\"1\"}\n(gdb) \n").unwrap();
//! session.poll(|_| {}).unwrap();
//! assert!(session.actions().is_empty());
//! ```
pub mod action;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod escape;
pub mod executor;
pub mod log;
pub mod queue;
pub mod session;
pub mod stop_reason;
pub mod transport;

pub use action::{Action, ActionContext, BarrierAction, RunAction, SimpleAction};
pub use config::EngineConfig;
pub use dispatch::{Dispatch, dispatch, route};
pub use error::EngineError;
pub use escape::escape_path;
pub use executor::CommandExecutor;
pub use queue::{ActionQueue, QueuedAction};
pub use session::Session;
pub use stop_reason::StopReason;
pub use transport::{ChannelTransport, Outbound, RecordingTransport, Transport};
