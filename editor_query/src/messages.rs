//! Message types for query client-UI communication.
//!
//! These messages are sent over channels between the UI thread and the
//! interpreter thread.

use crate::types::{LoadedDatabase, TableInfo};
use ra_editor_core::EvalMode;
use std::path::PathBuf;

/// Request ID for correlating responses.
pub type RequestId = u64;

/// Requests sent from the UI to the query client.
#[derive(Debug, Clone)]
pub enum QueryRequest {
    /// Execute an expression or dot-command.
    Execute { id: RequestId, expression: String },
    /// Run a command whose output is only logged.
    Command { command: String },
    /// Switch the evaluation mode.
    SetEvalMode { mode: EvalMode },
    /// List the loaded tables.
    ListTables { id: RequestId },
    /// Replace the loaded tables with a database file.
    LoadDatabase { id: RequestId, path: PathBuf },
    /// Add a table from a CSV file.
    AddTableFromCsv {
        id: RequestId,
        name: String,
        attributes: Vec<String>,
        path: PathBuf,
    },
    /// Stop the interpreter.
    Shutdown,
}

/// Responses from the query client to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResponse {
    /// Output of an executed request.
    Output { id: RequestId, text: String },
    /// Parsed `.tables` output.
    Tables {
        id: RequestId,
        tables: Vec<TableInfo>,
    },
    /// A database file was loaded.
    DatabaseLoaded {
        id: RequestId,
        database: LoadedDatabase,
    },
    /// The request failed.
    Error { id: RequestId, message: String },
}

impl QueryResponse {
    pub fn id(&self) -> RequestId {
        match self {
            QueryResponse::Output { id, .. }
            | QueryResponse::Tables { id, .. }
            | QueryResponse::DatabaseLoaded { id, .. }
            | QueryResponse::Error { id, .. } => *id,
        }
    }
}

/// Notifications not correlated with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryNotification {
    /// The interpreter printed its first prompt.
    Ready,
    /// The interpreter did not start.
    StartFailed { message: String },
    /// The evaluation mode command was sent.
    EvalModeChanged { mode: EvalMode },
    /// The interpreter has exited.
    Exited { code: Option<i32> },
}
