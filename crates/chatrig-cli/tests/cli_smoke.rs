//! Runs the built binary for commands that never touch docker.

use std::process::Command;

use tempfile::TempDir;

fn chatrig(root: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_chatrig"));
    cmd.env("CHATRIG_CONFIG_DIR", root.path())
        .env_remove("CHATRIG_SECRETS_FILE")
        .env_remove("CHATRIG_STACK_DIR")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn paths_lists_generated_files_under_the_config_root() {
    let root = TempDir::new().unwrap();
    let out = chatrig(&root).arg("paths").output().unwrap();

    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    let generated = root.path().join("generated").join("webui.env");
    assert!(stdout.contains(&format!("frontend_env = {}", generated.display())));
    assert!(stdout.contains("gateway_state = "));
}

#[test]
fn bare_invocation_prints_help() {
    let root = TempDir::new().unwrap();
    let out = chatrig(&root).output().unwrap();

    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("Usage:"));
}

#[test]
fn unknown_mode_is_a_usage_error() {
    let root = TempDir::new().unwrap();
    let out = chatrig(&root)
        .args(["start", "turbo"])
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn invalid_port_setting_exits_with_config_code() {
    let root = TempDir::new().unwrap();
    let out = chatrig(&root)
        .env("CHATRIG_GATEWAY_PORT", "not-a-port")
        .arg("paths")
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(78));
    assert!(String::from_utf8_lossy(&out.stderr).contains("CHATRIG_GATEWAY_PORT"));
}
