use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// `EnvFilter` directive used when `MI_LOG` is unset.
    pub log_filter: String,
    /// Number of sent commands kept by the executor.
    pub command_history: usize,
    /// Advance the action queue on poll only while the inferior is stopped.
    pub run_only_when_stopped: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            command_history: 256,
            run_only_when_stopped: true,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, EngineError> {
        Ok(toml::from_str(input)?)
    }

    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let input = fs::read_to_string(path).map_err(|source| EngineError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[rstest]
    #[case("", EngineConfig::default())]
    #[case(
        "log_filter = \"mi_engine=trace\"",
        EngineConfig { log_filter: "mi_engine=trace".to_string(), ..EngineConfig::default() }
    )]
    #[case(
        "command_history = 8\nrun_only_when_stopped = false",
        EngineConfig { command_history: 8, run_only_when_stopped: false, ..EngineConfig::default() }
    )]
    fn test_from_toml_str(#[case] input: &str, #[case] expected: EngineConfig) {
        assert_eq!(EngineConfig::from_toml_str(input).unwrap(), expected);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            EngineConfig::from_toml_str("command_history = \"many\""),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn test_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "command_history = 4").unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.command_history, 4);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            EngineConfig::load(&dir.path().join("missing.toml")),
            Err(EngineError::ConfigRead { .. })
        ));
    }
}
