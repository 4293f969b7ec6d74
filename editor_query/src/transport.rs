//! Interpreter process transport.
//!
//! Runs the interpreter as a child process, writes one request per line to
//! its stdin and collects filtered output lines from stdout and stderr.

use crate::config::InterpreterConfig;
use crate::error::{QueryError, Result};
use crate::protocol::{
    add_table_command, is_prompt, load_command, prepare_expression, LineSplitter, OutputFilter,
    Progress, ResponseCollector, NO_OUTPUT, RESET_COMMAND,
};
use crate::types::{tables_from_database_json, LoadedDatabase};
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A running interpreter.
pub struct Interpreter {
    config: InterpreterConfig,
    child: Child,
    stdin: ChildStdin,
    lines: mpsc::UnboundedReceiver<String>,
    readers: Vec<JoinHandle<()>>,
}

impl Interpreter {
    /// Starts the interpreter. Does not wait for its first prompt.
    pub fn spawn(config: InterpreterConfig) -> Result<Self> {
        let mut cmd = Command::new(&config.command);
        cmd.args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        for (key, value) in &config.env {
            if std::env::var_os(key).is_none() {
                cmd.env(key, value);
            }
        }
        if let Some(ref dir) = config.working_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|source| QueryError::Spawn {
            command: config.command.clone(),
            source,
        })?;
        log::info!("Started interpreter: {}", config.command);

        let stdin = child.stdin.take().ok_or(QueryError::MissingPipe("stdin"))?;
        let stdout = child.stdout.take().ok_or(QueryError::MissingPipe("stdout"))?;
        let stderr = child.stderr.take().ok_or(QueryError::MissingPipe("stderr"))?;

        let filter = Arc::new(OutputFilter::new(&config.prompt)?);
        let (line_tx, lines) = mpsc::unbounded_channel();
        let readers = vec![
            tokio::spawn(pump(stdout, config.prompt.clone(), filter.clone(), line_tx.clone())),
            tokio::spawn(pump(stderr, config.prompt.clone(), filter, line_tx)),
        ];

        Ok(Self {
            config,
            child,
            stdin,
            lines,
            readers,
        })
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Waits up to `max` for a prompt. Returns true if one arrived.
    pub async fn wait_for_prompt(&mut self, max: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + max;
        loop {
            match tokio::time::timeout_at(deadline, self.lines.recv()).await {
                Ok(Some(line)) if is_prompt(&line, &self.config.prompt) => return true,
                Ok(Some(line)) => log::debug!("Interpreter: {}", line),
                Ok(None) | Err(_) => return false,
            }
        }
    }

    /// Sends one request and returns its output.
    ///
    /// Blank input is not sent. A request that stops producing output for
    /// the configured timeout returns what was collected so far.
    pub async fn send_query(&mut self, expression: &str) -> Result<String> {
        let Some(request) = prepare_expression(expression) else {
            return Ok(NO_OUTPUT.to_string());
        };

        while let Ok(stale) = self.lines.try_recv() {
            log::trace!("Discarding stale output: {}", stale);
        }

        log::debug!("Sending query: {}", request);
        self.stdin.write_all(format!("{}\r\n", request).as_bytes()).await?;
        self.stdin.flush().await?;

        let timeout = self.config.query_timeout();
        let mut collector = ResponseCollector::new(&self.config.prompt);
        loop {
            match tokio::time::timeout(timeout, self.lines.recv()).await {
                Ok(Some(line)) => {
                    if collector.accept(&line) == Progress::Done {
                        break;
                    }
                }
                Ok(None) => {
                    log::warn!("Interpreter output closed during '{}'", request);
                    break;
                }
                Err(_) => {
                    log::warn!(
                        "No output for {} ms during '{}', returning partial output",
                        self.config.query_timeout_ms,
                        request
                    );
                    break;
                }
            }
        }
        Ok(collector.finish())
    }

    /// Clears the interpreter and loads a database file.
    pub async fn load_database(&mut self, path: &Path) -> Result<LoadedDatabase> {
        let path = existing_file(path)?;

        if let Err(e) = self.send_query(RESET_COMMAND).await {
            log::warn!("{} failed: {}", RESET_COMMAND, e);
        }
        let output = self.send_query(&load_command(&path)).await?;

        let json = tokio::fs::read_to_string(&path).await?;
        let tables = tables_from_database_json(&json)?;
        log::info!("Loaded {} ({} tables)", path.display(), tables.len());
        Ok(LoadedDatabase { output, tables })
    }

    /// Adds a table from a CSV file.
    pub async fn add_table_from_csv(
        &mut self,
        name: &str,
        attributes: &[String],
        path: &Path,
    ) -> Result<String> {
        let path = existing_file(path)?;
        self.send_query(&add_table_command(name, attributes, &path))
            .await
    }

    /// Kills the interpreter and returns its exit code, if it had one.
    pub async fn shutdown(mut self) -> Option<i32> {
        if let Err(e) = self.child.kill().await {
            log::debug!("Interpreter already gone: {}", e);
        }
        for reader in self.readers.drain(..) {
            reader.abort();
        }
        let code = self.child.try_wait().ok().flatten().and_then(|s| s.code());
        log::info!("Interpreter stopped");
        code
    }
}

fn existing_file(path: &Path) -> Result<std::path::PathBuf> {
    if !path.exists() {
        return Err(QueryError::MissingFile(path.to_path_buf()));
    }
    Ok(std::fs::canonicalize(path)?)
}

/// Reads a pipe until EOF, forwarding filtered lines.
async fn pump<R: AsyncRead + Unpin>(
    mut reader: R,
    prompt: String,
    filter: Arc<OutputFilter>,
    tx: mpsc::UnboundedSender<String>,
) {
    let forward = |lines: Vec<String>| {
        lines
            .iter()
            .filter_map(|line| filter.clean(line))
            .all(|line| tx.send(line).is_ok())
    };

    let mut splitter = LineSplitter::new(&prompt);
    let mut chunk = [0u8; 1024];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) => {
                forward(splitter.finish().into_iter().collect());
                break;
            }
            Ok(n) => {
                if !forward(splitter.push(&chunk[..n])) {
                    break;
                }
            }
            Err(e) => {
                log::debug!("Interpreter pipe closed: {}", e);
                break;
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    /// A stand-in interpreter: prompt, then per request an accepting prompt,
    /// one result line and the closing prompt.
    const FAKE: &str = r#"printf '>>>'
while IFS= read -r line; do
  line=$(printf '%s' "$line" | tr -d '\r')
  printf '>>>\n'
  case "$line" in
    .tables) printf 'R : { a, b }\n' ;;
    .reset) ;;
    *) printf '\033[32mgot %s\033[0m\n' "$line" ;;
  esac
  printf '>>>'
done"#;

    fn fake(script: &str) -> InterpreterConfig {
        let mut config = InterpreterConfig::new("sh", vec!["-c".to_string(), script.to_string()]);
        config.query_timeout_ms = 2_000;
        config
    }

    async fn started(script: &str) -> Interpreter {
        let mut interpreter = Interpreter::spawn(fake(script)).unwrap();
        assert!(interpreter.wait_for_prompt(Duration::from_secs(5)).await);
        interpreter
    }

    #[tokio::test]
    async fn test_send_query() {
        let mut interpreter = started(FAKE).await;
        assert_eq!(interpreter.send_query("R").await.unwrap(), "got R;");
        assert_eq!(interpreter.send_query(".tables").await.unwrap(), "R : { a, b }");
        assert_eq!(interpreter.send_query(".reset").await.unwrap(), NO_OUTPUT);
        assert_eq!(interpreter.send_query("   ").await.unwrap(), NO_OUTPUT);
        interpreter.shutdown().await;
    }

    #[tokio::test]
    async fn test_timeout_returns_partial_output() {
        let script = r#"printf '>>>'
while IFS= read -r line; do
  printf '>>>\npartial\n'
done"#;
        let mut config = fake(script);
        config.query_timeout_ms = 200;
        let mut interpreter = Interpreter::spawn(config).unwrap();
        assert!(interpreter.wait_for_prompt(Duration::from_secs(5)).await);

        assert_eq!(interpreter.send_query("R").await.unwrap(), "partial");
        interpreter.shutdown().await;
    }

    #[tokio::test]
    async fn test_load_database() {
        let mut db = tempfile::NamedTempFile::new().unwrap();
        write!(db, r#"{{"tables": {{"R": {{"attributes": {{"a": "int"}}}}}}}}"#).unwrap();

        let mut interpreter = started(FAKE).await;
        let loaded = interpreter.load_database(db.path()).await.unwrap();
        assert!(loaded.output.starts_with("got .load"));
        assert_eq!(loaded.tables.len(), 1);
        assert_eq!(loaded.tables[0].attributes, vec!["a".to_string()]);
        interpreter.shutdown().await;
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut interpreter = started(FAKE).await;
        let err = interpreter
            .add_table_from_csv("S", &["x".to_string()], &dir.path().join("none.csv"))
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::MissingFile(_)));
        interpreter.shutdown().await;
    }

    #[tokio::test]
    async fn test_spawn_failure_names_command() {
        let config = InterpreterConfig::new("ra-editor-no-such-interpreter", vec![]);
        match Interpreter::spawn(config) {
            Err(QueryError::Spawn { command, .. }) => {
                assert_eq!(command, "ra-editor-no-such-interpreter")
            }
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("spawn should fail"),
        }
    }
}
