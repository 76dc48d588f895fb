use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Failed to write to the debugger: {0}")]
    Transport(#[source] io::Error),
    #[error("Failed to interrupt the debugger: {0}")]
    Interrupt(#[source] io::Error),
    #[error("Failed to read config file '{}': {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid config: {0}")]
    Config(#[from] toml::de::Error),
}
