//! Shared test infrastructure for integration tests.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

/// Output of one binary run, with stdout split into JSON result lines.
#[derive(Debug)]
pub struct RunResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl RunResult {
    /// Parse every non-empty stdout line as a JSON envelope.
    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line)
                    .unwrap_or_else(|err| panic!("stdout line is not JSON ({err}): {line}"))
            })
            .collect()
    }
}

impl From<Output> for RunResult {
    fn from(output: Output) -> Self {
        Self {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Run the intake binary with `args`, feeding `stdin` and capturing output.
pub fn run_intake(args: &[&str], stdin: &str, cwd: Option<&Path>) -> RunResult {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_laboral-intake"));
    cmd.args(args)
        .env("RUST_LOG", "warn")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    let mut child = cmd.spawn().expect("spawn laboral-intake");
    child
        .stdin
        .take()
        .expect("child stdin")
        .write_all(stdin.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait for laboral-intake").into()
}

/// Join tool calls into JSON-lines input.
#[allow(dead_code)]
pub fn session_input(calls: &[serde_json::Value]) -> String {
    calls
        .iter()
        .map(|call| format!("{call}\n"))
        .collect::<String>()
}
