use std::fs;
use std::path::Path;
use assert_cmd::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn backup_sync_cmd(home: &Path, plugin_root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("backup-sync").expect("backup-sync binary");
    cmd.env("HOME", home)
        .env("USERPROFILE", home)
        .env("CLAUDE_PLUGIN_ROOT", plugin_root)
        .env_remove("RUST_LOG");
    cmd
}

fn write_script(plugin_root: &Path, body: &str) {
    let scripts = plugin_root.join("scripts");
    fs::create_dir_all(&scripts).expect("scripts dir");
    fs::write(scripts.join("backup-sync.sh"), body).expect("write script");
}

fn configure(home: &TempDir, plugin: &TempDir) {
    backup_sync_cmd(home.path(), plugin.path())
        .args(["configure", "me/dotfiles"])
        .assert()
        .success();
}

#[test]
fn status_before_configure_is_not_an_error() {
    let home = TempDir::new().unwrap();
    let plugin = TempDir::new().unwrap();
    backup_sync_cmd(home.path(), plugin.path())
        .arg("status")
        .assert()
        .success()
        .stdout(contains("Not configured"));
}

#[test]
fn configure_writes_config_under_home() {
    let home = TempDir::new().unwrap();
    let plugin = TempDir::new().unwrap();
    backup_sync_cmd(home.path(), plugin.path())
        .args(["configure", "me/dotfiles", "--branch", "backup"])
        .assert()
        .success()
        .stdout(contains("Backup-sync configured successfully."))
        .stdout(contains("Branch: backup"))
        .stdout(contains("Host: github.com"));

    let raw = fs::read_to_string(home.path().join(".claude/backup-sync/config.json"))
        .expect("config written");
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["repo"], "me/dotfiles");
    assert_eq!(json["branch"], "backup");
    assert_eq!(json["gh_host"], "github.com");
}

#[test]
fn explicit_home_flag_overrides_environment() {
    let env_home = TempDir::new().unwrap();
    let flag_home = TempDir::new().unwrap();
    let plugin = TempDir::new().unwrap();
    backup_sync_cmd(env_home.path(), plugin.path())
        .arg("--home")
        .arg(flag_home.path())
        .args(["configure", "me/dotfiles"])
        .assert()
        .success();

    assert!(flag_home.path().join(".claude/backup-sync/config.json").exists());
    assert!(!env_home.path().join(".claude/backup-sync/config.json").exists());
}

#[test]
fn sync_before_configure_fails() {
    let home = TempDir::new().unwrap();
    let plugin = TempDir::new().unwrap();
    write_script(plugin.path(), "echo should-not-run\n");
    backup_sync_cmd(home.path(), plugin.path())
        .arg("sync")
        .assert()
        .failure()
        .stderr(contains("Not configured. Please run backup_configure first."))
        .stdout(contains("should-not-run").not());
}

#[test]
fn sync_runs_script_from_plugin_root() {
    let home = TempDir::new().unwrap();
    let plugin = TempDir::new().unwrap();
    configure(&home, &plugin);
    write_script(
        plugin.path(),
        "echo \"pushed from $HOME\" >> \"$HOME/.claude/backup-sync/sync.log\"\necho pushed\n",
    );

    backup_sync_cmd(home.path(), plugin.path())
        .arg("sync")
        .assert()
        .success()
        .stdout(contains("Sync completed:\npushed"));

    backup_sync_cmd(home.path(), plugin.path())
        .arg("status")
        .assert()
        .success()
        .stdout(contains("Repo:          me/dotfiles"))
        .stdout(contains("Last sync:     pushed from"))
        .stdout(contains("Unable to check (repo not cloned)"));
}

#[test]
fn failing_sync_reports_output_and_exits_non_zero() {
    let home = TempDir::new().unwrap();
    let plugin = TempDir::new().unwrap();
    configure(&home, &plugin);
    write_script(plugin.path(), "echo 'fatal: repository not found' >&2\nexit 128\n");

    backup_sync_cmd(home.path(), plugin.path())
        .arg("sync")
        .assert()
        .failure()
        .stderr(contains("Sync script exited with error:"))
        .stderr(contains("fatal: repository not found"));
}

#[test]
fn log_reports_history_states() {
    let home = TempDir::new().unwrap();
    let plugin = TempDir::new().unwrap();
    backup_sync_cmd(home.path(), plugin.path())
        .arg("log")
        .assert()
        .success()
        .stdout(contains("No sync history"));

    let dir = home.path().join(".claude/backup-sync");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("sync.log"), "one\ntwo\n\nthree\n").unwrap();

    backup_sync_cmd(home.path(), plugin.path())
        .args(["log", "--lines", "2"])
        .assert()
        .success()
        .stdout("two\nthree\n");
}

#[test]
fn tools_json_lists_four_definitions() {
    let home = TempDir::new().unwrap();
    let plugin = TempDir::new().unwrap();
    let assert = backup_sync_cmd(home.path(), plugin.path())
        .args(["tools", "--json"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let tools: Vec<serde_json::Value> = serde_json::from_str(&stdout).unwrap();
    assert_eq!(tools.len(), 4);
    assert!(tools.iter().all(|t| t.get("inputSchema").is_some()));
}

#[test]
fn serve_answers_on_stdout_and_logs_on_stderr() {
    let home = TempDir::new().unwrap();
    let plugin = TempDir::new().unwrap();
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"backup_log","arguments":{}}}"#,
        "\n",
    );

    let assert = backup_sync_cmd(home.path(), plugin.path())
        .arg("serve")
        .write_stdin(input)
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let responses: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("every stdout line is a frame"))
        .collect();

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "backup-sync");
    assert_eq!(
        responses[1]["result"]["content"][0]["text"],
        "No sync history"
    );
}
