use std::io::{self, Write};

use crossbeam_channel::{Receiver, Sender};
use tracing_subscriber::fmt::MakeWriter;

/// Forwards formatted diagnostics to a host over a channel.
///
/// Plug it into a subscriber with `tracing_subscriber::fmt().with_writer(writer)`
/// and read one formatted event per message from the returned receiver.
#[derive(Clone)]
pub struct DiagnosticWriter {
    sender: Sender<String>,
}

impl DiagnosticWriter {
    pub fn new() -> (Self, Receiver<String>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { sender: tx }, rx)
    }
}

impl Write for DiagnosticWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let message = String::from_utf8_lossy(buf);
        // A host that dropped its receiver no longer wants diagnostics.
        let _ = self.sender.send(message.into_owned());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for DiagnosticWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
