//! RA Editor - Relational algebra query editor.
//!
//! Reads a query file (or stdin), prints it highlighted with line numbers and
//! fold markers, and optionally runs it through the interpreter.

mod render;

use clap::Parser;
use crossterm::tty::IsTty;
use ra_editor_core::{EditorMount, EvalMode, EvalModeSelector};
use ra_editor_query::{Config, QueryClient, QueryNotification, QueryResponse};
use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug, Default, PartialEq)]
#[command(name = "ra-editor")]
#[command(about = "Relational algebra query editor")]
#[command(version)]
struct Args {
    /// Query file to open (reads stdin if omitted)
    file: Option<PathBuf>,

    /// Config file with [editor] and [interpreter] tables
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Collapse every foldable block
    #[arg(long)]
    fold: bool,

    /// Never emit colors
    #[arg(long)]
    plain: bool,

    /// Evaluation mode to select before running
    #[arg(long, value_name = "set|bag|off", value_parser = parse_mode)]
    mode: Option<EvalMode>,

    /// Run the document through the interpreter
    #[arg(long)]
    run: bool,

    /// List the interpreter's tables
    #[arg(long)]
    tables: bool,
}

fn parse_mode(value: &str) -> Result<EvalMode, String> {
    value.parse()
}

impl Args {
    fn needs_interpreter(&self) -> bool {
        self.run || self.tables || self.mode.is_some()
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let text = match &args.file {
        Some(path) => {
            log::info!("Opening file: {}", path.display());
            std::fs::read_to_string(path)?
        }
        None => io::read_to_string(io::stdin())?,
    };

    let mut mount = EditorMount::new();
    let view = mount.mount(config.editor, &text, None);
    if args.fold {
        view.fold_all();
    }

    let mut stdout = io::stdout().lock();
    let color = !args.plain && io::stdout().is_tty();
    render::render(&mut stdout, view, color)?;

    if !args.needs_interpreter() {
        return Ok(());
    }

    let client = QueryClient::start(config.interpreter.clone())?;
    match client.recv_notification_timeout(config.interpreter.startup_timeout() * 10) {
        Some(QueryNotification::StartFailed { message }) => return Err(message.into()),
        Some(_) => {}
        None => log::warn!("Interpreter did not report ready"),
    }

    let mut handle = client.handle();
    if let Some(mode) = args.mode {
        let mut selector = EvalModeSelector::new();
        selector.select(mode, &mut handle);
    }

    if args.run {
        if let Some(id) = handle.execute(&view.outgoing_text()) {
            print_response(client.recv_response(), id)?;
        } else {
            log::info!("Nothing to run");
        }
    }

    if args.tables {
        let id = handle.list_tables();
        print_response(client.recv_response(), id)?;
    }

    client.shutdown();
    Ok(())
}

fn print_response(response: Option<QueryResponse>, id: u64) -> Result<(), Box<dyn Error>> {
    match response {
        Some(QueryResponse::Output { text, .. }) => println!("{}", text),
        Some(QueryResponse::Tables { tables, .. }) => {
            for table in tables {
                println!("{} ({})", table.name, table.attributes.join(", "));
            }
        }
        Some(QueryResponse::DatabaseLoaded { database, .. }) => println!("{}", database.output),
        Some(QueryResponse::Error { message, .. }) => return Err(message.into()),
        None => return Err(format!("no response to request {}", id).into()),
    }
    Ok(())
}
