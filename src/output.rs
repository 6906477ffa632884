//! Printing command results.
//!
//! Every command reports through [`emit_success`] or [`emit_error`]. With
//! `--json` the result is a single `todo.v1` envelope on stdout:
//!
//! ```text
//! { "schema_version": "todo.v1", "command": "list", "status": "success",
//!   "data": { ... }, "warnings": [...], "next_steps": [...] }
//! ```
//!
//! Errors carry `"error": { message, code, kind, details }` in place of
//! `data`. Without `--json` a [`HumanOutput`] is rendered as plain text.

use serde::Serialize;

use crate::error::{exit_codes, Error, Result};

pub const SCHEMA_VERSION: &str = "todo.v1";

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone)]
enum Block {
    Fact { key: String, value: String },
    List { title: String, items: Vec<String> },
}

/// Plain-text report: a header line, then facts and titled lists in the
/// order they were pushed, then warnings and suggested commands.
#[derive(Debug, Clone)]
pub struct HumanOutput {
    header: String,
    blocks: Vec<Block>,
    warnings: Vec<String>,
    next_steps: Vec<String>,
}

impl HumanOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            blocks: Vec::new(),
            warnings: Vec::new(),
            next_steps: Vec::new(),
        }
    }

    /// Add a `Key: value` line.
    pub fn push_summary(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.blocks.push(Block::Fact {
            key: key.into(),
            value: value.into(),
        });
    }

    /// Add a titled list; empty lists render as `(none)`.
    pub fn push_section(&mut self, title: impl Into<String>, items: Vec<String>) {
        self.blocks.push(Block::List {
            title: title.into(),
            items,
        });
    }

    pub fn push_warning(&mut self, value: impl Into<String>) {
        self.warnings.push(value.into());
    }

    pub fn push_next_step(&mut self, value: impl Into<String>) {
        self.next_steps.push(value.into());
    }
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum Status {
    Success,
    Error,
}

#[derive(Serialize)]
struct Envelope<'a, B: Serialize> {
    schema_version: &'static str,
    command: &'a str,
    status: Status,
    #[serde(flatten)]
    body: B,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    next_steps: Vec<String>,
}

#[derive(Serialize)]
struct DataBody<'a, T: Serialize> {
    data: &'a T,
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
struct ErrorInfo {
    message: String,
    code: i32,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<()> {
    if options.json {
        return print_json(&Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: Status::Success,
            body: DataBody { data },
            warnings: human.map(|h| h.warnings.clone()).unwrap_or_default(),
            next_steps: human.map(|h| h.next_steps.clone()).unwrap_or_default(),
        });
    }

    if let (false, Some(human)) = (options.quiet, human) {
        println!("{}", format_human(human));
    }
    Ok(())
}

/// Report a failed command. `--quiet` never hides errors.
pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let hint = error_hint(err);
    if json {
        return print_json(&Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: Status::Error,
            body: ErrorBody {
                error: ErrorInfo {
                    message: err.to_string(),
                    code: err.exit_code(),
                    kind: error_kind(err),
                    details: err.details(),
                },
            },
            warnings: Vec::new(),
            next_steps: hint.map(str::to_string).into_iter().collect(),
        });
    }

    eprintln!("error: {err}");
    if let Some(hint) = hint {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

fn print_json<T: Serialize>(payload: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(payload)?);
    Ok(())
}

pub fn format_human(output: &HumanOutput) -> String {
    let mut lines = vec![output.header.clone()];

    let mut previous_was_fact = false;
    for block in &output.blocks {
        match block {
            Block::Fact { key, value } => {
                if !previous_was_fact {
                    lines.push(String::new());
                }
                if value.is_empty() {
                    lines.push(key.clone());
                } else {
                    lines.push(format!("{key}: {value}"));
                }
                previous_was_fact = true;
            }
            Block::List { title, items } => {
                lines.push(String::new());
                lines.push(format!("{title}:"));
                if items.is_empty() {
                    lines.push("  (none)".to_string());
                }
                lines.extend(items.iter().map(|item| format!("  {item}")));
                previous_was_fact = false;
            }
        }
    }

    if !output.warnings.is_empty() || !output.next_steps.is_empty() {
        lines.push(String::new());
    }
    lines.extend(output.warnings.iter().map(|w| format!("warning: {w}")));
    lines.extend(output.next_steps.iter().map(|step| format!("next: {step}")));

    lines.join("\n")
}

/// Subcommand name from the raw arguments, for labelling error envelopes
/// when parsing has not happened yet.
pub fn infer_command_name_from_args() -> String {
    command_name(std::env::args().skip(1))
}

fn command_name(args: impl IntoIterator<Item = String>) -> String {
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--dir" | "--today" => {
                args.next();
            }
            flag if flag.starts_with('-') => {}
            _ => return arg,
        }
    }
    "todo".to_string()
}

fn error_kind(err: &Error) -> &'static str {
    match err.exit_code() {
        exit_codes::USER_ERROR => "user_error",
        exit_codes::CONTRACT_VIOLATION => "contract_violation",
        _ => "operation_failed",
    }
}

fn error_hint(err: &Error) -> Option<&'static str> {
    match err {
        Error::SaveNotFound(_) => Some("todo saves"),
        Error::IndexOutOfRange { .. } => Some("todo list"),
        Error::InvalidConfig(_) => Some("fix .todo.toml then retry"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_output_keeps_push_order() {
        let mut human = HumanOutput::new("TO-DO LIST");
        human.push_summary("Selected", "a");
        human.push_section("Tasks-to-complete", vec!["1. a".into(), "2. b".into()]);
        human.push_section("Completed Tasks", Vec::new());
        human.push_warning("empty input ignored");
        human.push_next_step("todo save");

        assert_eq!(
            format_human(&human),
            "TO-DO LIST\n\nSelected: a\n\nTasks-to-complete:\n  1. a\n  2. b\n\nCompleted Tasks:\n  (none)\n\nwarning: empty input ignored\nnext: todo save"
        );
    }

    #[test]
    fn header_only_when_empty() {
        assert_eq!(format_human(&HumanOutput::new("Cleared")), "Cleared");
    }

    #[test]
    fn command_name_skips_option_values() {
        let args = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(command_name(args(&["--dir", "work", "add", "x"])), "add");
        assert_eq!(command_name(args(&["--json", "--today", "2024-01-02", "save"])), "save");
        assert_eq!(command_name(args(&["--quiet"])), "todo");
    }
}
