use std::io;

use crossbeam_channel::{Receiver, Sender};

/// Outbound side of the debugger connection. Lines are sent without a newline.
pub trait Transport {
    fn send_line(&mut self, line: &str) -> io::Result<()>;

    /// Asks the debugger to interrupt the inferior, out of band.
    fn interrupt(&mut self) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "transport cannot interrupt the debugger",
        ))
    }
}

/// What a [`ChannelTransport`] hands to the owner of the debugger process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// A command line to write to the debugger's stdin.
    Line(String),
    /// Interrupt the inferior (SIGINT to the debugger's process group).
    Interrupt,
}

/// Hands every line and interrupt to a channel; the receiving end owns the
/// actual process.
#[derive(Clone)]
pub struct ChannelTransport {
    sender: Sender<Outbound>,
}

impl ChannelTransport {
    pub fn new() -> (Self, Receiver<Outbound>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { sender: tx }, rx)
    }

    fn send(&self, message: Outbound) -> io::Result<()> {
        self.sender
            .send(message)
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "debugger channel is closed"))
    }
}

impl Transport for ChannelTransport {
    fn send_line(&mut self, line: &str) -> io::Result<()> {
        self.send(Outbound::Line(line.to_string()))
    }

    fn interrupt(&mut self) -> io::Result<()> {
        self.send(Outbound::Interrupt)
    }
}

/// Keeps every sent line in memory. Used to drive an engine without a debugger.
#[derive(Debug, Default, Clone)]
pub struct RecordingTransport {
    pub lines: Vec<String>,
    pub interrupts: usize,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns the lines sent so far.
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }
}

impl Transport for RecordingTransport {
    fn send_line(&mut self, line: &str) -> io::Result<()> {
        self.lines.push(line.to_string());
        Ok(())
    }

    fn interrupt(&mut self) -> io::Result<()> {
        self.interrupts += 1;
        Ok(())
    }
}
