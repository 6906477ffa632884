//! todo task list command implementations.

use serde::Serialize;

use crate::error::Result;
use crate::output::{emit_success, HumanOutput};
use crate::store::{AddOutcome, TaskStore};

use super::{load_context, number_to_index, GlobalOptions};

/// Both lists as rendered to the user
#[derive(Serialize)]
pub(crate) struct ListsOutput {
    pub(crate) pending: Vec<String>,
    pub(crate) completed: Vec<String>,
    pub(crate) selected: usize,
}

impl ListsOutput {
    pub(crate) fn from_store(store: &TaskStore) -> Self {
        Self {
            pending: store.pending().to_vec(),
            completed: store.completed_unique(),
            selected: store.selected(),
        }
    }
}

#[derive(Serialize)]
struct AddOutput {
    added: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    index: Option<usize>,
    #[serde(flatten)]
    lists: ListsOutput,
}

#[derive(Serialize)]
struct ChangeOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    task: Option<String>,
    #[serde(flatten)]
    lists: ListsOutput,
}

pub fn run_add(global: &GlobalOptions, text: &str) -> Result<()> {
    let mut ctx = load_context(global)?;
    let outcome = ctx.store.add_task(text);

    let (header, index) = match outcome {
        AddOutcome::Added { index } => {
            ctx.commit()?;
            ("Task added", Some(index))
        }
        AddOutcome::Ignored => ("No task added", None),
    };

    let mut human = HumanOutput::new(header);
    match index {
        Some(index) => human.push_summary("Number", (index + 1).to_string()),
        None => human.push_warning("empty input ignored"),
    }
    push_lists(&mut human, &ctx.store);

    let output = AddOutput {
        added: index.is_some(),
        index,
        lists: ListsOutput::from_store(&ctx.store),
    };
    emit_success(global.output(), "add", &output, Some(&human))
}

pub fn run_select(global: &GlobalOptions, number: u64) -> Result<()> {
    let mut ctx = load_context(global)?;
    ctx.store
        .select(number_to_index(number, ctx.store.pending().len())?)?;
    ctx.commit()?;

    let selected = ctx.store.pending().get(ctx.store.selected()).cloned();
    let mut human = HumanOutput::new("Task selected");
    if let Some(task) = &selected {
        human.push_summary("Task", task.clone());
    }
    push_lists(&mut human, &ctx.store);

    let output = ChangeOutput {
        task: selected,
        lists: ListsOutput::from_store(&ctx.store),
    };
    emit_success(global.output(), "select", &output, Some(&human))
}

pub fn run_delete(global: &GlobalOptions, number: Option<u64>) -> Result<()> {
    let mut ctx = load_context(global)?;
    let index = resolve_index(&ctx.store, number)?;
    let removed = ctx.store.delete_task(index)?;
    ctx.commit()?;

    let mut human = match &removed {
        Some(task) => {
            let mut human = HumanOutput::new("Task deleted");
            human.push_summary("Task", task.clone());
            human
        }
        None => {
            let mut human = HumanOutput::new("No task deleted");
            human.push_warning("no pending tasks");
            human
        }
    };
    push_lists(&mut human, &ctx.store);

    let output = ChangeOutput {
        task: removed,
        lists: ListsOutput::from_store(&ctx.store),
    };
    emit_success(global.output(), "delete", &output, Some(&human))
}

pub fn run_complete(global: &GlobalOptions, number: Option<u64>) -> Result<()> {
    let mut ctx = load_context(global)?;
    let index = resolve_index(&ctx.store, number)?;
    let completed = ctx.store.complete_task(index)?;
    if completed.is_some() {
        ctx.commit()?;
    }

    let mut human = match &completed {
        Some(task) => {
            let mut human = HumanOutput::new("Task completed");
            human.push_summary("Task", task.clone());
            human
        }
        None => {
            let mut human = HumanOutput::new("No task completed");
            human.push_warning("no pending tasks");
            human
        }
    };
    push_lists(&mut human, &ctx.store);

    let output = ChangeOutput {
        task: completed,
        lists: ListsOutput::from_store(&ctx.store),
    };
    emit_success(global.output(), "complete", &output, Some(&human))
}

pub fn run_clear(global: &GlobalOptions) -> Result<()> {
    let mut ctx = load_context(global)?;
    ctx.store.clear_all();
    ctx.commit()?;

    let mut human = HumanOutput::new("All tasks cleared");
    push_lists(&mut human, &ctx.store);

    emit_success(
        global.output(),
        "clear",
        &ListsOutput::from_store(&ctx.store),
        Some(&human),
    )
}

pub fn run_list(global: &GlobalOptions) -> Result<()> {
    let ctx = load_context(global)?;

    let mut human = HumanOutput::new("TO-DO LIST");
    if let Some(task) = ctx.store.pending().get(ctx.store.selected()) {
        human.push_summary("Selected", task.clone());
    }
    push_lists(&mut human, &ctx.store);

    emit_success(
        global.output(),
        "list",
        &ListsOutput::from_store(&ctx.store),
        Some(&human),
    )
}

/// Render both lists with their 1-based labels.
pub(crate) fn push_lists(human: &mut HumanOutput, store: &TaskStore) {
    human.push_section("Tasks-to-complete", store.pending_labels());
    human.push_section("Completed Tasks", store.completed_labels());
}

fn resolve_index(store: &TaskStore, number: Option<u64>) -> Result<usize> {
    match number {
        Some(number) => number_to_index(number, store.pending().len()),
        None => Ok(store.selected()),
    }
}
