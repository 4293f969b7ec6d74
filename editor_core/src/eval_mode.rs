//! Query evaluation mode and its side-channel command.

use std::fmt;
use std::str::FromStr;

/// How the interpreter evaluates queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EvalMode {
    /// Set semantics: duplicates removed.
    Set,
    /// Bag semantics: duplicates kept.
    Bag,
    /// Optimization off.
    #[default]
    Off,
}

impl EvalMode {
    /// Returns all modes in menu order.
    pub fn all() -> &'static [EvalMode] {
        &[EvalMode::Set, EvalMode::Bag, EvalMode::Off]
    }

    /// The mode's name on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            EvalMode::Set => "set",
            EvalMode::Bag => "bag",
            EvalMode::Off => "off",
        }
    }

    /// The command that switches the interpreter into this mode.
    pub fn command(self) -> String {
        format!(".eval {}", self.as_str())
    }

    /// Display label for a mode picker.
    pub fn label(self) -> &'static str {
        match self {
            EvalMode::Set => "Set Mode",
            EvalMode::Bag => "Bag Mode",
            EvalMode::Off => "Off Mode",
        }
    }
}

impl fmt::Display for EvalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvalMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "set" => Ok(EvalMode::Set),
            "bag" => Ok(EvalMode::Bag),
            "off" => Ok(EvalMode::Off),
            other => Err(format!("unknown eval mode '{}'", other)),
        }
    }
}

/// Something that can run an interpreter command on the editor's behalf.
pub trait CommandSink {
    type Error: fmt::Display;

    fn submit(&mut self, command: &str) -> Result<(), Self::Error>;
}

/// Holds the selected mode and mirrors changes to the interpreter.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvalModeSelector {
    mode: EvalMode,
}

impl EvalModeSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> EvalMode {
        self.mode
    }

    /// Selects a mode and sends `.eval <mode>` through `sink`.
    ///
    /// The selection sticks even if the command cannot be delivered; the
    /// failure is only logged.
    pub fn select<S: CommandSink>(&mut self, mode: EvalMode, sink: &mut S) {
        self.mode = mode;
        let command = mode.command();
        match sink.submit(&command) {
            Ok(()) => log::info!("Eval mode set to {}", mode),
            Err(e) => log::warn!("Failed to send '{}': {}", command, e),
        }
    }
}
