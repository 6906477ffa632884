mod support;

use predicates::str::contains;

#[test]
fn todo_help_works() {
    support::todo_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("to-do list"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = [
        "add", "select", "delete", "complete", "clear", "list", "save", "saves", "load", "init",
        "ui",
    ];

    for cmd in subcommands {
        support::todo_cmd().arg(cmd).arg("--help").assert().success();
    }
}

#[test]
fn list_on_fresh_directory_is_empty() {
    let dir = support::TestDir::new();
    dir.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("TO-DO LIST"))
        .stdout(contains("Tasks-to-complete:\n  (none)"));
}
