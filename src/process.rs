//! External tool invocation.
//!
//! Abstracts process spawning for testability:
//! - CommandRunner trait: run a program to completion and capture its text
//! - SystemRunner: `std::process::Command` for production
//!
//! Calls block until the child exits; there is no timeout.

use std::io;
use std::process::Command;

use tracing::debug;

/// Captured result of a finished process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Whether the process exited with status 0
    pub success: bool,
    /// Exit code, if the process was not killed by a signal
    pub code: Option<i32>,
    /// Stdout followed by stderr, lossily decoded
    pub text: String,
}

impl ToolOutput {
    /// Successful output with the given text
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            text: text.into(),
        }
    }

    /// Failed output with the given exit code and text
    pub fn failed(code: i32, text: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            text: text.into(),
        }
    }
}

/// Process spawn errors
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// The program is not installed or not on PATH
    #[error("{0} not found")]
    NotFound(String),

    #[error("failed to run {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Runs external programs to completion
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<ToolOutput, ProcessError>;
}

/// Runner that spawns real processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<ToolOutput, ProcessError> {
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => ProcessError::NotFound(program.to_string()),
                _ => ProcessError::Io {
                    program: program.to_string(),
                    source,
                },
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        debug!(program, code = ?output.status.code(), "process exited");

        Ok(ToolOutput {
            success: output.status.success(),
            code: output.status.code(),
            text,
        })
    }
}

/// Render an invocation for logs with the value after any `secret_flag`
/// masked.
pub fn redacted_command_line(program: &str, args: &[&str], secret_flag: &str) -> String {
    let mut parts = vec![program.to_string()];
    let mut mask_next = false;
    for arg in args {
        if mask_next {
            parts.push("********".to_string());
            mask_next = false;
        } else {
            parts.push(arg.to_string());
            mask_next = *arg == secret_flag;
        }
    }
    parts.join(" ")
}
