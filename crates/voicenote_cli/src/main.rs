//! Terminal host for the VoiceNote core.
//!
//! # Responsibility
//! - Open the note store against a SQLite storage file.
//! - Drive the capture surface from command arguments.
//! - Render the (optionally filtered) note list.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;
use voicenote_core::{
    core_version, default_log_level, init_logging, CaptureSurface, KeyValueStore,
    MemoryKeyValueStore, NoSpeechCapability, Note, NoteStore, Notice, NoticeSink,
    SqliteKeyValueStore,
};

const STORAGE_DIR_NAME: &str = "voicenote";
const STORAGE_FILE_NAME: &str = "voicenote.db";

#[derive(Parser)]
#[command(name = "voicenote")]
#[command(about = "VoiceNote - capture, search and delete notes", long_about = None)]
struct Cli {
    /// Storage file; defaults to `voicenote.db` in the platform data dir.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Keep notes in memory only; nothing survives the process.
    #[arg(long, global = true, conflicts_with = "db")]
    memory: bool,

    /// Absolute directory for rolling log files.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save a typed note
    Add {
        /// Note body
        text: String,
    },
    /// Show notes, newest first
    List {
        /// Case-insensitive substring filter
        #[arg(long, short)]
        search: Option<String>,
    },
    /// Delete a note by id
    Delete { id: Uuid },
    /// Start an audio note
    Record,
    /// Print the core version
    Version,
}

/// Prints notices the way a toast would show them.
struct TerminalNotices;

impl NoticeSink for TerminalNotices {
    fn notify(&mut self, notice: Notice) {
        eprintln!("{notice}");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_ref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        let log_dir = log_dir.to_str().context("log directory must be UTF-8")?;
        init_logging(level, log_dir)?;
    }

    if let Commands::Version = cli.command {
        println!("voicenote_core version={}", core_version());
        return Ok(());
    }

    if cli.memory {
        return run(
            cli.command,
            NoteStore::initialize(MemoryKeyValueStore::new()),
        );
    }

    let path = storage_path(cli.db, dirs::data_dir());
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create `{}`", parent.display()))?;
    }
    let storage = SqliteKeyValueStore::open(&path)
        .with_context(|| format!("failed to open storage `{}`", path.display()))?;
    run(cli.command, NoteStore::initialize(storage))
}

/// Explicit `--db` wins; otherwise the platform data dir, then the working
/// directory.
fn storage_path(explicit: Option<PathBuf>, data_dir: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| match data_dir {
        Some(dir) => dir.join(STORAGE_DIR_NAME).join(STORAGE_FILE_NAME),
        None => PathBuf::from(STORAGE_FILE_NAME),
    })
}

fn run<K: KeyValueStore>(command: Commands, mut store: NoteStore<K>) -> Result<()> {
    let mut surface = CaptureSurface::new(NoSpeechCapability, TerminalNotices);
    surface.open();

    match command {
        Commands::Add { text } => {
            surface.start_text();
            surface.edit(text);
            match surface.save(&mut store)? {
                Some(note) => print_note(&note),
                None => log::debug!("event=cli_add module=cli status=rejected reason=empty"),
            }
        }
        Commands::List { search } => {
            let query = search.unwrap_or_default();
            for note in store.visible(&query) {
                print_note(note);
            }
        }
        Commands::Delete { id } => {
            let existed = store.get(id).is_some();
            store.delete(id)?;
            if existed {
                println!("deleted {id}");
            }
        }
        Commands::Record => {
            surface.start_recording();
        }
        Commands::Version => {}
    }

    Ok(())
}

fn print_note(note: &Note) {
    println!(
        "{}  {}  {}",
        note.id,
        note.date.format("%Y-%m-%d %H:%M"),
        note.content
    );
}
