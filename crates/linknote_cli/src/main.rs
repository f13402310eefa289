//! Command-line driver over a note collection.
//!
//! # Responsibility
//! - Run note store, search and graph use-cases against a notes directory.
//! - Print plain text by default and JSON where a renderer consumes output.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use linknote_core::{
    init_logging, CoreConfig, FruchtermanReingold, GraphLayout, LayoutConfig, NoteStore,
    StorageBackend,
};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "linknote", version, about = "Markdown notes with [[wikilink]] graph")]
struct Cli {
    /// Notes directory (defaults to a temp-dir vault).
    #[arg(long, env = "LINKNOTE_NOTES_DIR")]
    dir: Option<PathBuf>,

    /// Storage backend: files or sqlite.
    #[arg(long, env = "LINKNOTE_BACKEND")]
    backend: Option<StorageBackend>,

    /// Write rolling logs into this absolute directory.
    #[arg(long, env = "LINKNOTE_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every note name.
    List,
    /// Print one note.
    Show { name: String },
    /// Create or overwrite one note.
    Save { name: String, content: String },
    /// Delete one note.
    Delete { name: String },
    /// Case-insensitive search over names and contents.
    Search { query: String },
    /// Print the link graph.
    Graph {
        #[arg(long)]
        json: bool,
    },
    /// Print notes linking to one note.
    Backlinks { name: String },
    /// Print force-directed node positions as JSON.
    Layout {
        #[arg(long, default_value_t = LayoutConfig::default().iterations)]
        iterations: u32,
        #[arg(long, default_value_t = LayoutConfig::default().width)]
        width: f64,
        #[arg(long, default_value_t = LayoutConfig::default().height)]
        height: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = CoreConfig::from_env()?;
    if let Some(dir) = cli.dir {
        config.notes_dir = dir;
    }
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if let Some(log_dir) = cli.log_dir {
        config.log_dir = log_dir;
        let log_dir = config.log_dir.to_string_lossy().into_owned();
        init_logging(&config.log_level, &log_dir)?;
    }

    let repo = config
        .open_repository()
        .with_context(|| format!("cannot open notes at {}", config.notes_dir.display()))?;
    let mut store = NoteStore::load(repo).context("cannot load notes")?;

    match cli.command {
        Command::List => {
            for note in store.notes() {
                println!("{}", note.name);
            }
        }
        Command::Show { name } => {
            println!("{}", store.open(&name)?);
        }
        Command::Save { name, content } => {
            store.save(&name, &content)?;
            println!("saved {name}");
        }
        Command::Delete { name } => {
            store.delete(&name)?;
            println!("deleted {name}");
        }
        Command::Search { query } => {
            for note in store.search(&query) {
                println!("{}", note.name);
            }
        }
        Command::Graph { json } => {
            let graph = store.link_graph();
            if json {
                println!("{}", serde_json::to_string_pretty(&graph)?);
            } else {
                for node in graph.nodes() {
                    let marker = if node.isolated { " (isolated)" } else { "" };
                    println!("{}{marker}", node.name);
                }
                for edge in graph.edges() {
                    println!("{} -> {}", edge.source, edge.target);
                }
            }
        }
        Command::Backlinks { name } => {
            for source in store.backlinks(&name) {
                println!("{source}");
            }
        }
        Command::Layout {
            iterations,
            width,
            height,
        } => {
            let layout = FruchtermanReingold::new(LayoutConfig {
                iterations,
                width,
                height,
                ..LayoutConfig::default()
            });
            let positions = layout.layout(&store.link_graph());
            println!("{}", serde_json::to_string_pretty(&positions)?);
        }
    }

    Ok(())
}
