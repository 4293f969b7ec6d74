//! Line protocol of the interactive interpreter.
//!
//! The interpreter reads one request per line and answers on its terminal:
//! it prints the prompt once the request is accepted, then the result, then
//! the prompt again. Its output carries terminal noise (escape sequences,
//! echoed input, stray control bytes) that is filtered here before any line
//! reaches a caller.

use crate::error::Result;
use regex::Regex;
use std::path::Path;

/// Text returned for a request that printed nothing.
pub const NO_OUTPUT: &str = "(no output)";

/// Command that clears all loaded tables.
pub const RESET_COMMAND: &str = ".reset";

/// Turns editor text into a request line.
///
/// Returns None for blank input. Dot-commands are sent as they are; any other
/// expression gets a terminating `;` unless it already ends with one.
pub fn prepare_expression(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('.') || trimmed.ends_with(';') {
        return Some(trimmed.to_string());
    }
    Some(format!("{};", trimmed))
}

/// `.load <path>`
pub fn load_command(path: &Path) -> String {
    format!(".load {}", path.display())
}

/// `.add name(a, b) : <path>`
pub fn add_table_command(name: &str, attributes: &[String], path: &Path) -> String {
    format!(".add {}({}) : {}", name, attributes.join(", "), path.display())
}

/// Returns true if an output line is the interpreter's prompt.
pub fn is_prompt(line: &str, prompt: &str) -> bool {
    line.trim().ends_with(prompt)
}

/// Splits raw output bytes into lines.
///
/// A line ends at `\r` or `\n`, or as soon as the pending text ends with the
/// prompt, which the interpreter prints without a newline.
#[derive(Debug, Clone)]
pub struct LineSplitter {
    buf: Vec<u8>,
    prompt: Vec<u8>,
}

impl LineSplitter {
    pub fn new(prompt: &str) -> Self {
        Self {
            buf: Vec::new(),
            prompt: prompt.as_bytes().to_vec(),
        }
    }

    /// Feeds a chunk of output and returns the lines it completed.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        for &byte in bytes {
            if byte == b'\r' || byte == b'\n' {
                lines.extend(self.take());
                continue;
            }
            self.buf.push(byte);
            if !self.prompt.is_empty() && self.buf.ends_with(&self.prompt) {
                lines.extend(self.take());
            }
        }
        lines
    }

    /// Returns the unterminated remainder, if any.
    pub fn finish(&mut self) -> Option<String> {
        self.take()
    }

    fn take(&mut self) -> Option<String> {
        if self.buf.is_empty() {
            return None;
        }
        let line = String::from_utf8_lossy(&self.buf).into_owned();
        self.buf.clear();
        Some(line)
    }
}

/// Removes terminal noise from output lines.
#[derive(Debug, Clone)]
pub struct OutputFilter {
    ansi: Regex,
    prompt_echo: Regex,
    continuation_echo: Regex,
    command_echo: Regex,
    unprintable: Regex,
}

impl OutputFilter {
    pub fn new(prompt: &str) -> Result<Self> {
        Ok(Self {
            ansi: Regex::new(r"\x1B\[[0-9;?]*[ -/]*[@-~]")?,
            prompt_echo: Regex::new(&format!(r"^\$\d+\s+{}.*$", regex::escape(prompt)))?,
            continuation_echo: Regex::new(r"^\d+\s*\.\.\.\s*.*$")?,
            command_echo: Regex::new(r"^\d+\s+\.\w+(\s+\S+)?$")?,
            unprintable: Regex::new(r"[^\x20-\x7E\r\n\t]")?,
        })
    }

    /// Cleans one line. Returns None if the line is noise to drop.
    pub fn clean(&self, raw: &str) -> Option<String> {
        let line = self.ansi.replace_all(raw, "");
        if self.prompt_echo.is_match(&line) {
            return None;
        }

        let trimmed = line.trim();
        if self.continuation_echo.is_match(trimmed) || self.command_echo.is_match(trimmed) {
            return None;
        }

        let line = self.unprintable.replace_all(&line, "").replace('?', "");
        if line.trim() == "Q" {
            return None;
        }
        Some(line)
    }
}

/// Whether a response is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Pending,
    Done,
}

/// Collects the output of one request.
///
/// The first prompt after the request means it was accepted, the second
/// that it finished. Lines in between are the result.
#[derive(Debug, Clone)]
pub struct ResponseCollector {
    prompt: String,
    accepted: bool,
    lines: Vec<String>,
}

impl ResponseCollector {
    pub fn new(prompt: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            accepted: false,
            lines: Vec::new(),
        }
    }

    pub fn accept(&mut self, line: &str) -> Progress {
        if is_prompt(line, &self.prompt) {
            if self.accepted {
                return Progress::Done;
            }
            self.accepted = true;
            return Progress::Pending;
        }
        self.lines.push(line.to_string());
        Progress::Pending
    }

    /// Returns the collected output, or [`NO_OUTPUT`] if there was none.
    pub fn finish(self) -> String {
        if self.lines.is_empty() {
            NO_OUTPUT.to_string()
        } else {
            self.lines.join("\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_prepare_expression() {
        assert_eq!(prepare_expression("R"), Some("R;".to_string()));
        assert_eq!(prepare_expression("<S>[a=1] R; "), Some("<S>[a=1] R;".to_string()));
        assert_eq!(prepare_expression(".tables"), Some(".tables".to_string()));
        assert_eq!(prepare_expression(" .eval bag\n"), Some(".eval bag".to_string()));
        assert_eq!(prepare_expression("  \n\t"), None);
        assert_eq!(prepare_expression(""), None);
    }

    #[test]
    fn test_commands() {
        let path = PathBuf::from("/tmp/db.json");
        assert_eq!(load_command(&path), ".load /tmp/db.json");

        let attrs = vec!["id".to_string(), "name".to_string()];
        assert_eq!(
            add_table_command("Students", &attrs, Path::new("/tmp/s.csv")),
            ".add Students(id, name) : /tmp/s.csv"
        );
    }

    #[test]
    fn test_line_splitter() {
        let mut splitter = LineSplitter::new(">>>");
        assert_eq!(splitter.push(b"a\r\nb"), vec!["a".to_string()]);
        assert_eq!(splitter.push(b"c\n>>"), vec!["bc".to_string()]);
        // The prompt flushes without a newline.
        assert_eq!(splitter.push(b">"), vec![">>>".to_string()]);
        assert_eq!(splitter.push(b" \n"), vec![" ".to_string()]);
        assert_eq!(splitter.push(b"tail"), Vec::<String>::new());
        assert_eq!(splitter.finish(), Some("tail".to_string()));
        assert_eq!(splitter.finish(), None);
    }

    #[test]
    fn test_filter_keeps_results() {
        let filter = OutputFilter::new(">>>").unwrap();
        assert_eq!(filter.clean("R : { a, b }"), Some("R : { a, b }".to_string()));
        assert_eq!(filter.clean("\x1b[32m| a | b |\x1b[0m"), Some("| a | b |".to_string()));
        assert_eq!(filter.clean(">>>"), Some(">>>".to_string()));
    }

    #[test]
    fn test_filter_drops_echoes() {
        let filter = OutputFilter::new(">>>").unwrap();
        assert_eq!(filter.clean("$1 >>> <S>[a=1] R;"), None);
        assert_eq!(filter.clean("2 ... R"), None);
        assert_eq!(filter.clean(" 3 .tables"), None);
        assert_eq!(filter.clean("4 .load /tmp/db.json"), None);
        assert_eq!(filter.clean("Q"), None);
        assert_eq!(filter.clean("\x1b[1mQ\x1b[0m "), None);
    }

    #[test]
    fn test_filter_strips_unprintable() {
        let filter = OutputFilter::new(">>>").unwrap();
        assert_eq!(filter.clean("a\x07b\tc"), Some("ab\tc".to_string()));
        assert_eq!(filter.clean("name ┃ größe?"), Some("name  gre".to_string()));
    }

    #[test]
    fn test_collector_counts_prompts() {
        let mut collector = ResponseCollector::new(">>>");
        assert_eq!(collector.accept(">>>"), Progress::Pending);
        assert_eq!(collector.accept("| a |"), Progress::Pending);
        assert_eq!(collector.accept("| 1 |"), Progress::Pending);
        assert_eq!(collector.accept(" >>> "), Progress::Done);
        assert_eq!(collector.finish(), "| a |\n| 1 |");
    }

    #[test]
    fn test_collector_no_output() {
        let mut collector = ResponseCollector::new(">>>");
        collector.accept(">>>");
        assert_eq!(collector.accept(">>>"), Progress::Done);
        assert_eq!(collector.finish(), NO_OUTPUT);
    }
}
