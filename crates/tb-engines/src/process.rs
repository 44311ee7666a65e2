//! Subprocess capture.
//!
//! One helper owns the child-process idiom for every adapter: spawn,
//! capture stdout and stderr, record the exit code and wall time. The
//! caller decides whether stdout is an artifact (run files, eval
//! reports) or log material.

use crate::EngineError;
use std::ffi::OsStr;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;

/// Everything observed from one subprocess invocation.
#[derive(Debug, Clone)]
pub struct Capture {
    pub program: String,
    pub args: Vec<String>,
    /// Exit code; None when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub duration_ms: u64,
}

impl Capture {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// The invocation as a single line, for logs.
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// Render the capture as a log file body: command line, exit code,
    /// then the combined output.
    pub fn log_text(&self) -> String {
        let mut text = self.command_line();
        text.push('\n');
        match self.code {
            Some(code) => text.push_str(&format!("exit code: {code}\n")),
            None => text.push_str("exit code: killed by signal\n"),
        }
        text.push_str(&String::from_utf8_lossy(&self.stdout));
        if !self.stderr.is_empty() {
            text.push_str(&String::from_utf8_lossy(&self.stderr));
        }
        text
    }
}

/// Run `program` with `args` to completion, capturing output. Only a
/// spawn failure (binary not found, not executable) is an error; a
/// nonzero exit comes back as a normal [`Capture`].
pub async fn run(
    program: impl AsRef<OsStr>,
    args: &[String],
) -> Result<Capture, EngineError> {
    let program_str = program.as_ref().to_string_lossy().into_owned();
    tracing::debug!("running: {} {}", program_str, args.join(" "));

    let start = Instant::now();
    let output = Command::new(program.as_ref())
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| EngineError::Spawn {
            program: program_str.clone(),
            message: e.to_string(),
        })?;

    Ok(Capture {
        program: program_str,
        args: args.to_vec(),
        code: output.status.code(),
        stdout: output.stdout,
        stderr: output.stderr,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_stdout_on_success() {
        let cap = run("sh", &["-c".into(), "echo hello".into()])
            .await
            .unwrap();
        assert!(cap.success());
        assert_eq!(String::from_utf8_lossy(&cap.stdout).trim(), "hello");
    }

    #[tokio::test]
    async fn nonzero_exit_is_not_an_error() {
        let cap = run("sh", &["-c".into(), "echo oops >&2; exit 3".into()])
            .await
            .unwrap();
        assert!(!cap.success());
        assert_eq!(cap.code, Some(3));
        let log = cap.log_text();
        assert!(log.starts_with("sh -c echo oops >&2; exit 3\n"));
        assert!(log.contains("exit code: 3"));
        assert!(log.contains("oops"));
    }

    #[tokio::test]
    async fn missing_binary_is_a_spawn_error() {
        let err = run("/nonexistent/IndriBuildIndex", &[]).await.unwrap_err();
        match err {
            EngineError::Spawn { program, .. } => {
                assert_eq!(program, "/nonexistent/IndriBuildIndex")
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
