//! Command-line interface for todo
//!
//! This module defines the CLI structure using clap derive macros.
//! Task list commands live in `task`, save file commands in `saves`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputOptions;
use crate::persistence::PersistenceManager;
use crate::session::Session;
use crate::store::TaskStore;

mod init;
mod saves;
mod task;

/// todo - a to-do list with timestamped save files
///
/// Add tasks, mark them complete, and save or restore the whole list.
#[derive(Parser, Debug)]
#[command(name = "todo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base directory holding the config, session and save files
    /// (defaults to current directory)
    #[arg(long, global = true, env = "TODO_DIR")]
    pub dir: Option<PathBuf>,

    /// Date used to name save files (defaults to today)
    #[arg(long, global = true, env = "TODO_TODAY", hide = true)]
    pub today: Option<NaiveDate>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a task to the pending list
    Add {
        /// Task text; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Select a pending task by its list number
    Select {
        /// List number as shown by `todo list`
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        number: u64,
    },

    /// Delete a pending task (defaults to the selected one)
    Delete {
        /// List number as shown by `todo list`
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        number: Option<u64>,
    },

    /// Mark a pending task as completed (defaults to the selected one)
    Complete {
        /// List number as shown by `todo list`
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        number: Option<u64>,
    },

    /// Remove all pending and completed tasks
    Clear,

    /// Show pending and completed tasks
    List,

    /// Save the task lists to a new save file
    Save,

    /// List available save files
    Saves,

    /// Replace the task lists with the contents of a save file
    Load {
        /// Save file name as shown by `todo saves`
        file: String,
    },

    /// Write a default .todo.toml
    Init,

    /// Open the interactive task list
    Ui,
}

/// Options shared by every command
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub dir: Option<PathBuf>,
    pub today: Option<NaiveDate>,
    pub json: bool,
    pub quiet: bool,
}

impl GlobalOptions {
    pub fn output(&self) -> OutputOptions {
        OutputOptions {
            json: self.json,
            quiet: self.quiet,
        }
    }

    /// Date for save file names
    pub fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let global = GlobalOptions {
            dir: self.dir,
            today: self.today,
            json: self.json,
            quiet: self.quiet,
        };

        match self.command {
            Commands::Add { text } => task::run_add(&global, &text.join(" ")),
            Commands::Select { number } => task::run_select(&global, number),
            Commands::Delete { number } => task::run_delete(&global, number),
            Commands::Complete { number } => task::run_complete(&global, number),
            Commands::Clear => task::run_clear(&global),
            Commands::List => task::run_list(&global),
            Commands::Save => saves::run_save(&global),
            Commands::Saves => saves::run_saves(&global),
            Commands::Load { file } => saves::run_load(&global, &file),
            Commands::Init => init::run(&global),
            Commands::Ui => {
                let ctx = load_context(&global)?;
                crate::ui::task_list::run(ctx.store, ctx.session, ctx.persistence, global.today)
            }
        }
    }
}

/// Everything a command needs: resolved paths plus the current task lists
pub(crate) struct CommandContext {
    pub(crate) store: TaskStore,
    pub(crate) session: Session,
    pub(crate) persistence: PersistenceManager,
}

impl CommandContext {
    /// Write the task lists back to the session file
    pub(crate) fn commit(&self) -> Result<()> {
        self.session.store(&self.store)
    }
}

pub(crate) fn base_dir(global: &GlobalOptions) -> Result<PathBuf> {
    match &global.dir {
        Some(path) => Ok(path.clone()),
        None => Ok(std::env::current_dir()?),
    }
}

pub(crate) fn load_context(global: &GlobalOptions) -> Result<CommandContext> {
    let base = base_dir(global)?;
    let config = Config::load_from_dir(&base)?;
    debug!(base = %base.display(), ?config, "loaded configuration");

    let session = Session::new(config.session_file_in(&base));
    let persistence =
        PersistenceManager::new(config.save_dir_in(&base)).excluding(session.path());
    let store = session.load()?;

    Ok(CommandContext {
        store,
        session,
        persistence,
    })
}

/// Convert a 1-based list number into a pending list index.
///
/// Numbers that do not fit in `usize` cannot address any task.
pub(crate) fn number_to_index(number: u64, len: usize) -> Result<usize> {
    usize::try_from(number.saturating_sub(1))
        .map_err(|_| Error::IndexOutOfRange { index: usize::MAX, len })
}
