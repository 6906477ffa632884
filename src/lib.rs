//! todo - To-do List Library
//!
//! This library provides the core functionality for the todo CLI tool:
//! a pending/completed task list and its save file persistence.
//!
//! # Core Concepts
//!
//! - **Pending tasks**: free-text tasks entered but not yet completed
//! - **Completed tasks**: tasks marked complete, shown without repeats
//! - **Save files**: `Date-DD-Save-N.json` snapshots that are never overwritten
//! - **Session**: the working copy that carries tasks between commands
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `.todo.toml`
//! - `error`: Error types and result aliases
//! - `output`: Human and JSON output envelopes
//! - `persistence`: Save file naming, writing, listing and loading
//! - `session`: Session file storage
//! - `store`: Pending and completed task lists
//! - `ui`: Interactive terminal task list

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod persistence;
pub mod session;
pub mod store;
pub mod ui;

pub use error::{Error, Result};
pub use persistence::{PersistenceManager, SaveFile, SaveOutcome};
pub use store::{AddOutcome, TaskStore};
