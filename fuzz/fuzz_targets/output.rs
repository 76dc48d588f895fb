#![no_main]

use arbitrary::Arbitrary;
use itertools::Itertools;
use libfuzzer_sys::fuzz_target;
use mi_engine::{BarrierAction, EngineConfig, RecordingTransport, Session, SimpleAction};

#[derive(Debug, Clone, Arbitrary)]
enum Piece {
    Prefix(u8, u32),
    Sigil(u8),
    Class(u8),
    Name(String),
    Quoted(String),
    Punct(u8),
    Raw(String),
}

#[derive(Debug, Clone, Arbitrary)]
struct ArbitraryOutput {
    lines: Vec<Vec<Piece>>,
    barriers: Vec<bool>,
}

impl ArbitraryOutput {
    fn to_text(&self) -> String {
        self.lines
            .iter()
            .map(|pieces| pieces.iter().map(Piece::render).join(""))
            .join("\n")
    }
}

impl Piece {
    fn render(&self) -> String {
        match self {
            Piece::Prefix(owner, sequence) => format!("{}{:010}", owner % 8, sequence),
            Piece::Sigil(n) => ["^", "*", "+", "=", "~", "&"][*n as usize % 6].to_string(),
            Piece::Class(n) => ["done", "running", "stopped", "error", "exit", "connected"][*n as usize % 6].to_string(),
            Piece::Name(name) => name.clone(),
            Piece::Quoted(text) => format!("\"{}\"", text),
            Piece::Punct(n) => ["=", ",", "{", "}", "[", "]", "\\"][*n as usize % 7].to_string(),
            Piece::Raw(raw) => raw.clone(),
        }
    }
}

fuzz_target!(|output: ArbitraryOutput| {
    let text = output.to_text();

    for line in text.lines() {
        if let Ok((_, rest)) = mi_parser::CorrelationId::decode(line) {
            let record = mi_parser::parse_record(rest);
            let _ = record.to_string();
        }
    }

    let mut session = Session::new(RecordingTransport::new(), &EngineConfig::default());
    for barrier in &output.barriers {
        let queued = if *barrier {
            session.queue(BarrierAction)
        } else {
            session.queue(SimpleAction::new("-data-evaluate-expression x"))
        };
        assert!(queued.is_ok());
    }

    assert!(session.feed(&text).is_ok());
    assert!(session.poll(|_| {}).is_ok());
});
