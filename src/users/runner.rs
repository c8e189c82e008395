//! Invocation of the external account-management tools.
//!
//! Lifecycle operations never call `std::process::Command` directly; they go
//! through [`CommandRunner`] so tests can record invocations without root or
//! a mutable system database.

use std::process::Command;

use thiserror::Error;

pub const USERADD: &str = "useradd";
pub const USERDEL: &str = "userdel";
pub const GROUPADD: &str = "groupadd";
pub const USERMOD: &str = "usermod";
pub const PASSWD: &str = "passwd";

const REQUIRED_TOOLS: [&str; 5] = [USERADD, USERDEL, GROUPADD, USERMOD, PASSWD];

/// Captured streams of a finished command.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("{program} exited with status {}: {stderr}", display_code(.code))]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        // No exit code means the tool was killed by a signal
        None => "signal".to_string(),
    }
}

pub trait CommandRunner {
    /// Run to completion, capturing stdout and stderr. Non-zero exit is an
    /// error carrying the captured stderr.
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError>;

    /// Run with stdio left on the terminal, for tools that hold their own
    /// dialog (passwd). Output is not captured.
    fn run_interactive(&self, program: &str, args: &[&str]) -> Result<(), CommandError>;
}

/// The real runner. Every call blocks until the tool exits.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError> {
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| CommandError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() {
            return Err(CommandError::Failed {
                program: program.to_string(),
                code: output.status.code(),
                stderr,
            });
        }

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr,
        })
    }

    fn run_interactive(&self, program: &str, args: &[&str]) -> Result<(), CommandError> {
        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|source| CommandError::Spawn {
                program: program.to_string(),
                source,
            })?;

        if !status.success() {
            return Err(CommandError::Failed {
                program: program.to_string(),
                code: status.code(),
                stderr: String::new(),
            });
        }

        Ok(())
    }
}

/// Names of the account tools that do not resolve on PATH.
pub fn missing_tools() -> Vec<&'static str> {
    REQUIRED_TOOLS
        .into_iter()
        .filter(|tool| which::which(tool).is_err())
        .collect()
}

/// Recording fake: logs every argv, executes nothing, and can be primed to
/// fail the next captured invocation.
#[cfg(test)]
pub(crate) struct RecordingRunner {
    pub calls: std::cell::RefCell<Vec<Vec<String>>>,
    fail_next: std::cell::Cell<bool>,
}

#[cfg(test)]
impl RecordingRunner {
    pub fn new() -> Self {
        Self {
            calls: std::cell::RefCell::new(Vec::new()),
            fail_next: std::cell::Cell::new(false),
        }
    }

    pub fn fail_next(&self) {
        self.fail_next.set(true);
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn argv(&self, index: usize) -> Vec<String> {
        self.calls.borrow()[index].clone()
    }

    fn record(&self, program: &str, args: &[&str]) -> Result<(), CommandError> {
        let mut argv = vec![program.to_string()];
        argv.extend(args.iter().map(|s| s.to_string()));
        self.calls.borrow_mut().push(argv);

        if self.fail_next.replace(false) {
            return Err(CommandError::Failed {
                program: program.to_string(),
                code: Some(1),
                stderr: "simulated failure".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
impl CommandRunner for RecordingRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError> {
        self.record(program, args)?;
        Ok(CommandOutput::default())
    }

    fn run_interactive(&self, program: &str, args: &[&str]) -> Result<(), CommandError> {
        self.record(program, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_captures_stdout() {
        let out = SystemRunner.run("echo", &["hello"]).unwrap();
        assert_eq!(out.stdout.trim(), "hello");
    }

    #[test]
    fn test_nonzero_exit_is_failed() {
        let err = SystemRunner.run("false", &[]).unwrap_err();
        match err {
            CommandError::Failed { program, code, .. } => {
                assert_eq!(program, "false");
                assert_eq!(code, Some(1));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let err = SystemRunner
            .run("userman-no-such-tool", &[])
            .unwrap_err();
        assert!(matches!(err, CommandError::Spawn { .. }));
    }

    #[test]
    fn test_failed_display_carries_stderr() {
        let err = CommandError::Failed {
            program: USERADD.to_string(),
            code: Some(9),
            stderr: "user exists".to_string(),
        };
        assert_eq!(err.to_string(), "useradd exited with status 9: user exists");
    }

    #[test]
    fn test_recording_runner_records_argv() {
        let runner = RecordingRunner::new();
        runner.run(USERADD, &["-m", "bob"]).unwrap();
        assert_eq!(runner.argv(0), vec!["useradd", "-m", "bob"]);

        runner.fail_next();
        assert!(runner.run(USERDEL, &["-r", "bob"]).is_err());
        assert_eq!(runner.call_count(), 2);
    }
}
