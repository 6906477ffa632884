mod support;

use std::fs;

use predicates::str::contains;
use serde_json::json;
use todo::config::{Config, CONFIG_FILE};

use support::TestDir;

#[test]
fn config_defaults_when_missing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config::load_from_dir(dir.path()).expect("defaults");

    assert_eq!(config.save_dir, "To_Do_Saves");
    assert_eq!(config.session_file, ".todo/session.json");
}

#[test]
fn config_overrides_from_toml() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let toml = r#"
save_dir = "archive/saves"
session_file = "state.json"
"#;
    fs::write(dir.path().join(CONFIG_FILE), toml)?;

    let config = Config::load_from_dir(dir.path())?;

    assert_eq!(config.save_dir, "archive/saves");
    assert_eq!(config.session_file, "state.json");
    Ok(())
}

#[test]
fn invalid_config_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join(CONFIG_FILE);
    fs::write(&path, "save_dir = \"\"\n")?;

    let err = Config::load_from_dir(dir.path()).unwrap_err();
    assert!(err.to_string().contains("save_dir cannot be empty"));
    let err = Config::load(&path).unwrap_err();
    assert!(err.to_string().contains("save_dir cannot be empty"));
    Ok(())
}

#[test]
fn save_then_load_round_trips() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join(CONFIG_FILE);
    let config = Config {
        save_dir: "backups".to_string(),
        session_file: "work/session.json".to_string(),
    };

    config.save(&path)?;

    assert_eq!(Config::load(&path)?, config);
    Ok(())
}

#[test]
fn cli_uses_configured_save_dir() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TestDir::new();
    dir.write_file(CONFIG_FILE, "save_dir = \"backups\"\n")?;
    dir.cmd().args(["add", "x"]).assert().success();

    let saved = dir.json(&["save"]);
    assert_eq!(saved["data"]["file"], "Date-12-Save-1.json");
    assert!(dir.path().join("backups").join("Date-12-Save-1.json").exists());
    assert!(!dir.save_dir().exists());
    Ok(())
}

#[test]
fn cli_reports_broken_config() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TestDir::new();
    dir.write_file(CONFIG_FILE, "save_dir = \"saves\"\nsession_file = \"saves/s.json\"\n")?;

    dir.cmd()
        .arg("list")
        .assert()
        .code(2)
        .stderr(contains("Invalid configuration"))
        .stderr(contains("hint: fix .todo.toml then retry"));
    Ok(())
}

#[test]
fn session_spelled_into_save_dir_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TestDir::new();
    dir.write_file(
        CONFIG_FILE,
        "session_file = \"./To_Do_Saves/session.json\"\n",
    )?;

    dir.cmd()
        .args(["add", "x"])
        .assert()
        .code(2)
        .stderr(contains("cannot live inside save_dir"));
    assert!(!dir.save_dir().join("session.json").exists());
    Ok(())
}

#[test]
fn init_writes_default_config_once() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TestDir::new();

    let report = dir.json(&["init"]);
    assert_eq!(report["data"]["save_dir"], json!("To_Do_Saves"));
    let written = Config::load(&dir.path().join(CONFIG_FILE))?;
    assert_eq!(written, Config::default());

    dir.cmd()
        .arg("init")
        .assert()
        .code(2)
        .stderr(contains("already exists"));
    Ok(())
}
