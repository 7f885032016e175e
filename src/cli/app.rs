//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::{query, task};
use crate::storage::{Config, TaskStore};
use crate::Organizer;

#[derive(Parser)]
#[command(name = "tasktree")]
#[command(author, version, about = "Hierarchical task organizer with activation cascades")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Task file (defaults to the configured or platform data location)
    #[arg(long, global = true, env = "TASKTREE_FILE")]
    pub file: Option<PathBuf>,

    /// Output format (defaults to the configured format)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the task file, seeding it if it does not exist yet
    Init,

    /// Show the task tree
    Tree {
        /// Task to start from (defaults to the root)
        task: Option<String>,
    },

    /// Show one task with its priority and children
    Show {
        /// Task ID, exact name, or `root`
        task: String,
    },

    /// Create a new task under a parent
    Add {
        /// Parent task
        parent: String,

        /// Name of the new task
        name: String,
    },

    /// Link an existing task under another parent
    Link {
        /// Parent task
        parent: String,

        /// Task to link
        child: String,
    },

    /// Detach a task from a parent
    Remove {
        /// Parent task
        parent: String,

        /// Task to detach
        child: String,
    },

    /// Move a child to another position within its parent
    Move {
        /// Parent task
        parent: String,

        /// Current position (0-based)
        from: usize,

        /// New position (0-based)
        to: usize,
    },

    /// Toggle selection of a child
    Select {
        /// Parent task
        parent: String,

        /// Child position (0-based)
        index: usize,
    },

    /// Clear selections on a task and everything below it
    Clear {
        /// Task to clear
        task: String,
    },

    /// Activate a task (cascades to parents and dormant children)
    Activate {
        /// Task to activate
        task: String,
    },

    /// Deactivate a task (cascades to children and dormant parents)
    Deactivate {
        /// Task to deactivate
        task: String,
    },

    /// Rename a task, merging with an existing task of that name
    Rename {
        /// Task to rename
        task: String,

        /// New name
        name: String,
    },

    /// Search tasks by name
    Search {
        /// Search query
        query: String,

        /// Task being viewed; excluded from results
        #[arg(long)]
        scope: Option<String>,
    },
}

/// Installs the tracing subscriber; logs go to stderr
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "tasktree=debug" } else { "warn" };

    // Ignore error if a subscriber is already set (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load()?;
    let format = cli.format.unwrap_or_else(|| config.default_format.into());
    let output = Output::new(format, cli.verbose);

    let path = config.store_path(cli.file.as_deref())?;
    output.verbose_ctx("store", &format!("Using task file: {}", path.display()));

    let mut org = Organizer::open(TaskStore::new(&path))?;

    match cli.command {
        Commands::Init => {
            org.save()?;
            output.success(&format!("Initialized task file at {}", path.display()));
        }

        Commands::Tree { task } => query::tree(&org, &output, task.as_deref())?,
        Commands::Show { task } => query::show(&org, &output, &task)?,
        Commands::Search { query: text, scope } => {
            output.verbose_ctx("search", &format!("Searching for: {}", text));
            query::search(&org, &output, &text, scope.as_deref())?
        }

        Commands::Add { parent, name } => task::add(&mut org, &output, &parent, &name)?,
        Commands::Link { parent, child } => task::link(&mut org, &output, &parent, &child)?,
        Commands::Remove { parent, child } => task::remove(&mut org, &output, &parent, &child)?,
        Commands::Move { parent, from, to } => task::move_child(&mut org, &output, &parent, from, to)?,
        Commands::Select { parent, index } => task::select(&mut org, &output, &parent, index)?,
        Commands::Clear { task: id } => task::clear(&mut org, &output, &id)?,
        Commands::Activate { task: id } => task::set_active(&mut org, &output, &id, true)?,
        Commands::Deactivate { task: id } => task::set_active(&mut org, &output, &id, false)?,
        Commands::Rename { task: id, name } => task::rename(&mut org, &output, &id, &name)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}
