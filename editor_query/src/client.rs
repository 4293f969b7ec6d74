//! Query client - Manages the interpreter process and communication.
//!
//! The client runs on a separate tokio runtime thread and communicates
//! with the UI via channels.

use crate::config::InterpreterConfig;
use crate::error::{QueryError, Result};
use crate::messages::{QueryNotification, QueryRequest, QueryResponse, RequestId};
use crate::transport::Interpreter;
use crate::types::parse_tables;
use crossbeam_channel::{Receiver, Sender};
use ra_editor_core::{normalize_punctuation, CommandSink, EvalMode};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Handle for sending requests to the query client.
#[derive(Debug, Clone)]
pub struct QueryHandle {
    request_tx: Sender<QueryRequest>,
    next_id: Arc<AtomicU64>,
}

impl QueryHandle {
    /// Generates a new request ID.
    pub fn next_id(&self) -> RequestId {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Sends a request to the query client.
    pub fn send(&self, request: QueryRequest) -> Result<()> {
        self.request_tx
            .send(request)
            .map_err(|_| QueryError::ChannelClosed)
    }

    /// Executes editor text. Full-width punctuation is normalized first;
    /// blank text is not sent and returns None.
    pub fn execute(&self, text: &str) -> Option<RequestId> {
        let expression = normalize_punctuation(text);
        if expression.trim().is_empty() {
            return None;
        }
        let id = self.next_id();
        let _ = self.send(QueryRequest::Execute { id, expression });
        Some(id)
    }

    /// Switches the evaluation mode.
    pub fn set_eval_mode(&self, mode: EvalMode) {
        let _ = self.send(QueryRequest::SetEvalMode { mode });
    }

    /// Requests the table list.
    pub fn list_tables(&self) -> RequestId {
        let id = self.next_id();
        let _ = self.send(QueryRequest::ListTables { id });
        id
    }

    /// Loads a database file, replacing the current tables.
    pub fn load_database(&self, path: PathBuf) -> RequestId {
        let id = self.next_id();
        let _ = self.send(QueryRequest::LoadDatabase { id, path });
        id
    }

    /// Adds a table from a CSV file.
    pub fn add_table_from_csv(
        &self,
        name: impl Into<String>,
        attributes: Vec<String>,
        path: PathBuf,
    ) -> RequestId {
        let id = self.next_id();
        let _ = self.send(QueryRequest::AddTableFromCsv {
            id,
            name: name.into(),
            attributes,
            path,
        });
        id
    }

    /// Stops the interpreter.
    pub fn shutdown(&self) {
        let _ = self.send(QueryRequest::Shutdown);
    }
}

impl CommandSink for QueryHandle {
    type Error = QueryError;

    fn submit(&mut self, command: &str) -> Result<()> {
        self.send(QueryRequest::Command {
            command: command.to_string(),
        })
    }
}

/// The query client.
pub struct QueryClient {
    handle: QueryHandle,
    response_rx: Receiver<QueryResponse>,
    notification_rx: Receiver<QueryNotification>,
    /// Whether the interpreter thread is running.
    running: Arc<AtomicBool>,
}

impl QueryClient {
    /// Starts the interpreter on its own thread.
    pub fn start(config: InterpreterConfig) -> Result<Self> {
        let (request_tx, request_rx) = crossbeam_channel::unbounded();
        let (response_tx, response_rx) = crossbeam_channel::unbounded();
        let (notification_tx, notification_rx) = crossbeam_channel::unbounded();
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        thread::Builder::new()
            .name("ra-query".to_string())
            .spawn(move || {
                let rt = match tokio::runtime::Runtime::new() {
                    Ok(rt) => rt,
                    Err(e) => {
                        log::error!("Failed to create tokio runtime: {}", e);
                        running_clone.store(false, Ordering::SeqCst);
                        let _ = notification_tx.send(QueryNotification::StartFailed {
                            message: e.to_string(),
                        });
                        return;
                    }
                };
                rt.block_on(run_client(
                    config,
                    request_rx,
                    response_tx,
                    notification_tx,
                    running_clone,
                ));
            })?;

        Ok(Self {
            handle: QueryHandle {
                request_tx,
                next_id: Arc::new(AtomicU64::new(1)),
            },
            response_rx,
            notification_rx,
            running,
        })
    }

    /// Returns a handle for sending requests.
    pub fn handle(&self) -> QueryHandle {
        self.handle.clone()
    }

    /// Tries to receive a response (non-blocking).
    pub fn try_recv_response(&self) -> Option<QueryResponse> {
        self.response_rx.try_recv().ok()
    }

    /// Blocks until a response arrives. Returns None once the client thread
    /// is gone.
    pub fn recv_response(&self) -> Option<QueryResponse> {
        self.response_rx.recv().ok()
    }

    /// Waits up to `timeout` for a response.
    pub fn recv_response_timeout(&self, timeout: Duration) -> Option<QueryResponse> {
        self.response_rx.recv_timeout(timeout).ok()
    }

    /// Tries to receive a notification (non-blocking).
    pub fn try_recv_notification(&self) -> Option<QueryNotification> {
        self.notification_rx.try_recv().ok()
    }

    /// Waits up to `timeout` for a notification.
    pub fn recv_notification_timeout(&self, timeout: Duration) -> Option<QueryNotification> {
        self.notification_rx.recv_timeout(timeout).ok()
    }

    /// Returns whether the interpreter thread is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Shuts down the client.
    pub fn shutdown(&self) {
        self.handle.shutdown();
        self.running.store(false, Ordering::SeqCst);
    }
}

impl Drop for QueryClient {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Runs the client loop.
async fn run_client(
    config: InterpreterConfig,
    request_rx: Receiver<QueryRequest>,
    response_tx: Sender<QueryResponse>,
    notification_tx: Sender<QueryNotification>,
    running: Arc<AtomicBool>,
) {
    let startup = config.startup_timeout();
    let mut interpreter = match Interpreter::spawn(config) {
        Ok(interpreter) => interpreter,
        Err(e) => {
            log::error!("{}", e);
            running.store(false, Ordering::SeqCst);
            let _ = notification_tx.send(QueryNotification::StartFailed {
                message: e.to_string(),
            });
            let _ = notification_tx.send(QueryNotification::Exited { code: None });
            return;
        }
    };

    if !interpreter.wait_for_prompt(startup).await {
        log::warn!("No prompt within {} ms of start", startup.as_millis());
    }
    let _ = notification_tx.send(QueryNotification::Ready);

    while running.load(Ordering::SeqCst) {
        let rx = request_rx.clone();
        let request = match tokio::task::spawn_blocking(move || rx.recv()).await {
            Ok(Ok(request)) => request,
            // Every sender is gone.
            Ok(Err(_)) | Err(_) => break,
        };
        if matches!(request, QueryRequest::Shutdown) {
            break;
        }
        process_request(&mut interpreter, request, &response_tx, &notification_tx).await;
    }

    running.store(false, Ordering::SeqCst);
    let code = interpreter.shutdown().await;
    let _ = notification_tx.send(QueryNotification::Exited { code });
    log::info!("Query client shut down");
}

/// Processes a request from the UI.
async fn process_request(
    interpreter: &mut Interpreter,
    request: QueryRequest,
    response_tx: &Sender<QueryResponse>,
    notification_tx: &Sender<QueryNotification>,
) {
    match request {
        QueryRequest::Execute { id, expression } => {
            let result = interpreter
                .send_query(&expression)
                .await
                .map(|text| QueryResponse::Output { id, text });
            respond(response_tx, id, result);
        }
        QueryRequest::Command { command } => match interpreter.send_query(&command).await {
            Ok(output) => log::debug!("{} -> {}", command, output),
            Err(e) => log::warn!("{} failed: {}", command, e),
        },
        QueryRequest::SetEvalMode { mode } => {
            match interpreter.send_query(&mode.command()).await {
                Ok(_) => {
                    let _ = notification_tx.send(QueryNotification::EvalModeChanged { mode });
                }
                Err(e) => log::warn!("Failed to set eval mode {}: {}", mode, e),
            }
        }
        QueryRequest::ListTables { id } => {
            let result = interpreter
                .send_query(".tables")
                .await
                .map(|output| QueryResponse::Tables {
                    id,
                    tables: parse_tables(&output),
                });
            respond(response_tx, id, result);
        }
        QueryRequest::LoadDatabase { id, path } => {
            let result = interpreter
                .load_database(&path)
                .await
                .map(|database| QueryResponse::DatabaseLoaded { id, database });
            respond(response_tx, id, result);
        }
        QueryRequest::AddTableFromCsv {
            id,
            name,
            attributes,
            path,
        } => {
            let result = interpreter
                .add_table_from_csv(&name, &attributes, &path)
                .await
                .map(|text| QueryResponse::Output { id, text });
            respond(response_tx, id, result);
        }
        QueryRequest::Shutdown => {}
    }
}

fn respond(response_tx: &Sender<QueryResponse>, id: RequestId, result: Result<QueryResponse>) {
    let response = result.unwrap_or_else(|e| {
        log::error!("Request {} failed: {}", id, e);
        QueryResponse::Error {
            id,
            message: e.to_string(),
        }
    });
    let _ = response_tx.send(response);
}
