use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the interpreter side channel.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("failed to start interpreter '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("interpreter {0} is not piped")]
    MissingPipe(&'static str),

    #[error("interpreter I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("query client channel closed")]
    ChannelClosed,

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid database file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid output pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, QueryError>;
