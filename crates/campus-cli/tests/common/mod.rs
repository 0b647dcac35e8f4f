use std::path::Path;
use std::process::{Command, Output};

/// Run the CLI against the in-memory mock with an isolated HOME, so the
/// saved session lands under `home`.
pub fn run_cli(args: &[&str], home: &Path) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_campus"));
    cmd.args(["--mode", "mock", "--instant"]);
    cmd.args(args);
    cmd.env("HOME", home);
    cmd.env("XDG_DATA_HOME", home.join("data"));
    cmd.env_remove("CAMPUS_MODE");
    cmd.env_remove("RUST_LOG");
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI and expect success.
pub fn run_cli_success(args: &[&str], home: &Path) -> String {
    let output = run_cli(args, home);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run the CLI and expect failure, returning stderr.
pub fn run_cli_failure(args: &[&str], home: &Path) -> String {
    let output = run_cli(args, home);
    assert!(
        !output.status.success(),
        "CLI command unexpectedly succeeded: {:?}\nstdout: {}",
        args,
        String::from_utf8_lossy(&output.stdout)
    );
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Sign in against the mock.
pub fn login(home: &Path) {
    run_cli_success(
        &["auth", "login", "--email", "john@example.com", "--password", "secret"],
        home,
    );
}
