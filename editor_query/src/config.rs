//! Configuration file handling.
//!
//! ```toml
//! [editor]
//! show_line_numbers = true
//!
//! [interpreter]
//! command = "java"
//! args = ["-jar", "real-0.8-SNAPSHOT-with-deps.jar"]
//! query_timeout_ms = 4000
//! ```

use crate::error::Result;
use ra_editor_core::EditorSettings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How to launch and talk to the interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Command to start the interpreter.
    pub command: String,
    /// Arguments to the command.
    pub args: Vec<String>,
    /// Working directory.
    pub working_dir: Option<PathBuf>,
    /// Extra environment variables, set only where not already defined.
    pub env: BTreeMap<String, String>,
    /// The interpreter's prompt.
    pub prompt: String,
    /// Sliding timeout per query, reset on every output line.
    pub query_timeout_ms: u64,
    /// How long to wait for the first prompt after start.
    pub startup_timeout_ms: u64,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        let env = [("NO_COLOR", "1"), ("TERM", "xterm")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            command: "java".to_string(),
            args: vec![
                "-jar".to_string(),
                "real-0.8-SNAPSHOT-with-deps.jar".to_string(),
            ],
            working_dir: None,
            env,
            prompt: ">>>".to_string(),
            query_timeout_ms: 4_000,
            startup_timeout_ms: 1_000,
        }
    }
}

impl InterpreterConfig {
    /// Creates a configuration for an arbitrary interpreter command.
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            ..Default::default()
        }
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    pub fn startup_timeout(&self) -> Duration {
        Duration::from_millis(self.startup_timeout_ms)
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub editor: EditorSettings,
    pub interpreter: InterpreterConfig,
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
