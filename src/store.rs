//! In-memory task list state
//!
//! A [`TaskStore`] owns two ordered lists of task text:
//!
//! - `pending`: tasks entered and shown in the "Tasks-to-complete" list.
//!   Duplicates are allowed.
//! - `completed`: every task marked complete, in completion order. The raw
//!   list may repeat a task; it is deduplicated (first occurrence kept) for
//!   display and persistence.
//!
//! Completing a task copies it into `completed` and leaves it in `pending`,
//! so the same task can be completed more than once.

use std::collections::HashSet;

use tracing::debug;

use crate::error::{Error, Result};

/// Result of [`TaskStore::add_task`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Task was appended at this index of the pending list
    Added { index: usize },
    /// Input was empty or whitespace-only; nothing changed
    Ignored,
}

/// Pending and completed task lists plus the current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    pending: Vec<String>,
    completed: Vec<String>,
    selected: usize,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from raw lists, e.g. the contents of a save file.
    ///
    /// `completed` is kept as given; deduplication happens on read.
    pub fn from_parts(pending: Vec<String>, completed: Vec<String>) -> Self {
        Self {
            pending,
            completed,
            selected: 0,
        }
    }

    pub fn pending(&self) -> &[String] {
        &self.pending
    }

    /// Raw completed list, including repeats.
    pub fn completed(&self) -> &[String] {
        &self.completed
    }

    /// Completed list with repeats removed, first occurrence kept.
    pub fn completed_unique(&self) -> Vec<String> {
        dedup(&self.completed)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.completed.is_empty()
    }

    /// Currently selected index into the pending list
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Move the selection to `index`.
    ///
    /// Index 0 is always accepted, since the selection defaults to 0 when the
    /// pending list is empty. Any other index must address a pending task.
    pub fn select(&mut self, index: usize) -> Result<()> {
        if index != 0 {
            self.check_index(index)?;
        }
        self.selected = index;
        Ok(())
    }

    /// Append `text` to the pending list.
    ///
    /// Blank input is silently ignored.
    pub fn add_task(&mut self, text: &str) -> AddOutcome {
        if text.trim().is_empty() {
            debug!("ignoring blank task input");
            return AddOutcome::Ignored;
        }

        self.pending.push(text.to_string());
        let index = self.pending.len() - 1;
        debug!(index, task = text, "task added");
        AddOutcome::Added { index }
    }

    /// Remove the pending task at `index` and reset the selection to 0.
    ///
    /// Returns `Ok(None)` without touching anything when the pending list is
    /// empty. An index outside a non-empty list is an error and leaves the
    /// store unchanged.
    pub fn delete_task(&mut self, index: usize) -> Result<Option<String>> {
        if self.pending.is_empty() {
            debug!(index, "delete on empty pending list ignored");
            self.selected = 0;
            return Ok(None);
        }
        self.check_index(index)?;

        let removed = self.pending.remove(index);
        self.selected = 0;
        debug!(index, task = %removed, "task deleted");
        Ok(Some(removed))
    }

    /// Mark the pending task at `index` as completed.
    ///
    /// The task is appended to the completed list and stays in the pending
    /// list. Returns `Ok(None)` when the pending list is empty.
    pub fn complete_task(&mut self, index: usize) -> Result<Option<String>> {
        if self.pending.is_empty() {
            debug!(index, "complete on empty pending list ignored");
            return Ok(None);
        }
        self.check_index(index)?;

        let task = self.pending[index].clone();
        self.completed.push(task.clone());
        debug!(index, task = %task, "task completed");
        Ok(Some(task))
    }

    /// Empty both lists.
    pub fn clear_all(&mut self) {
        debug!(
            pending = self.pending.len(),
            completed = self.completed.len(),
            "clearing all tasks"
        );
        self.pending.clear();
        self.completed.clear();
        self.selected = 0;
    }

    /// Replace the whole store with `other`.
    pub fn replace(&mut self, other: TaskStore) {
        *self = other;
    }

    /// Display labels for the pending list: `"1. first"`, `"2. second"`, ...
    pub fn pending_labels(&self) -> Vec<String> {
        labels(&self.pending)
    }

    /// Display labels for the deduplicated completed list.
    pub fn completed_labels(&self) -> Vec<String> {
        labels(&self.completed_unique())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.pending.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.pending.len(),
            });
        }
        Ok(())
    }
}

/// Remove repeated entries, keeping the first occurrence of each and the
/// original order.
pub fn dedup<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for item in items {
        let item = item.as_ref();
        if seen.insert(item) {
            unique.push(item.to_string());
        }
    }
    unique
}

/// 1-based ordinal label for a rendered list entry.
pub fn label(index: usize, text: &str) -> String {
    format!("{}. {}", index + 1, text)
}

fn labels(items: &[String]) -> Vec<String> {
    items
        .iter()
        .enumerate()
        .map(|(idx, text)| label(idx, text))
        .collect()
}
