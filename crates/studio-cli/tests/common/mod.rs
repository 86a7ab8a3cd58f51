use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Session file inside an isolated test directory.
pub fn session_file(dir: &Path) -> PathBuf {
    dir.join("session.json")
}

/// Run the CLI against `api`, keeping the session in `dir`.
pub fn run_cli_with_env(args: &[&str], dir: &Path, api: &str) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_studio"));
    cmd.args(args);
    cmd.env("HOME", dir);
    cmd.env("XDG_DATA_HOME", dir.join("data"));
    cmd.env("STUDIO_API_URL", api);
    cmd.env("STUDIO_SESSION_FILE", session_file(dir));
    cmd.env_remove("STUDIO_PASSWORD");
    cmd.env_remove("RUST_LOG");
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI and expect success.
pub fn run_cli_with_env_success(args: &[&str], dir: &Path, api: &str) -> String {
    let output = run_cli_with_env(args, dir, api);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run the CLI and expect failure, returning stderr.
pub fn run_cli_with_env_failure(args: &[&str], dir: &Path, api: &str) -> String {
    let output = run_cli_with_env(args, dir, api);
    if output.status.success() {
        panic!("CLI command should have failed: {:?}", args);
    }
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Read the stored session file as JSON.
pub fn read_session(dir: &Path) -> Option<serde_json::Value> {
    let content = std::fs::read_to_string(session_file(dir)).ok()?;
    serde_json::from_str(&content).ok()
}
