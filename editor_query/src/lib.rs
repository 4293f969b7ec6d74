//! Query side channel - Runs editor text through the relational algebra
//! interpreter.
//!
//! The interpreter runs as a child process on a separate thread with its own
//! tokio runtime, communicating with the UI via channels. Request
//! preparation, output filtering and `.tables` parsing are plain functions
//! usable without a process.

pub mod client;
pub mod config;
pub mod error;
pub mod messages;
pub mod protocol;
pub mod transport;
pub mod types;

pub use client::{QueryClient, QueryHandle};
pub use config::{Config, InterpreterConfig};
pub use error::{QueryError, Result};
pub use messages::{QueryNotification, QueryRequest, QueryResponse, RequestId};
pub use protocol::{prepare_expression, OutputFilter, NO_OUTPUT};
pub use transport::Interpreter;
pub use types::{parse_tables, tables_from_database_json, LoadedDatabase, QueryBody, TableInfo};
