use super::command_line::CommandLine;
use crate::domain::value_objects::execution_mode::ExecutionMode;
use async_trait::async_trait;
use std::fmt;
use std::io::Write;
use std::process::{Command, Stdio};
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command as TokioCommand;
use tracing::{debug, warn};

/// Exit code reported when the child could not be started at all
pub const SPAWN_FAILURE_CODE: i32 = -1;

/// What a finished child process left behind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionOutcome {
    exit_code: i32,
    stdout: String,
    stderr: String,
}

impl ExecutionOutcome {
    pub fn new(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    pub fn success(stdout: impl Into<String>) -> Self {
        Self::new(0, stdout, "")
    }

    /// Outcome for a child that never ran; the reason lands in stderr
    pub fn spawn_failure(reason: impl fmt::Display) -> Self {
        Self::new(SPAWN_FAILURE_CODE, "", reason.to_string())
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn into_parts(self) -> (i32, String, String) {
        (self.exit_code, self.stdout, self.stderr)
    }
}

/// Runs one command and reports how it ended
///
/// Implementations never fail: a child that cannot be spawned is reported as an
/// outcome with [`SPAWN_FAILURE_CODE`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, command: &CommandLine, mode: ExecutionMode) -> ExecutionOutcome;
}

#[derive(Debug, Clone, Copy)]
enum Echo {
    Stdout,
    Stderr,
}

impl Echo {
    fn write(self, bytes: &[u8]) {
        let result = match self {
            Self::Stdout => std::io::stdout().lock().write_all(bytes),
            Self::Stderr => std::io::stderr().lock().write_all(bytes),
        };
        if let Err(e) = result {
            debug!("Failed to echo child output: {}", e);
        }
    }
}

/// Runs rendered command lines through the platform shell
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: String,
    flag: String,
}

impl Default for ShellRunner {
    fn default() -> Self {
        if cfg!(target_os = "windows") {
            Self::with_shell("cmd", "/C")
        } else {
            Self::with_shell("sh", "-c")
        }
    }
}

impl ShellRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shell(shell: impl Into<String>, flag: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
            flag: flag.into(),
        }
    }

    /// Hold the calling thread until the child exits
    fn run_blocking(&self, script: &str, verbose: bool) -> ExecutionOutcome {
        let output = Command::new(&self.shell)
            .arg(&self.flag)
            .arg(script)
            .stdin(Stdio::null())
            .output();

        match output {
            Ok(output) => {
                if verbose {
                    Echo::Stdout.write(&output.stdout);
                    Echo::Stderr.write(&output.stderr);
                }
                ExecutionOutcome::new(
                    output.status.code().unwrap_or(SPAWN_FAILURE_CODE),
                    String::from_utf8_lossy(&output.stdout),
                    String::from_utf8_lossy(&output.stderr),
                )
            }
            Err(e) => ExecutionOutcome::spawn_failure(format!(
                "Failed to spawn '{}': {}",
                script, e
            )),
        }
    }

    async fn run_background(&self, script: &str, verbose: bool) -> ExecutionOutcome {
        let spawned = TokioCommand::new(&self.shell)
            .arg(&self.flag)
            .arg(script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => {
                return ExecutionOutcome::spawn_failure(format!(
                    "Failed to spawn '{}': {}",
                    script, e
                ))
            }
        };

        // both pipes drained together so neither can fill up and stall the child
        let (stdout, stderr) = tokio::join!(
            drain(child.stdout.take(), verbose.then_some(Echo::Stdout)),
            drain(child.stderr.take(), verbose.then_some(Echo::Stderr)),
        );

        match child.wait().await {
            Ok(status) => {
                ExecutionOutcome::new(status.code().unwrap_or(SPAWN_FAILURE_CODE), stdout, stderr)
            }
            Err(e) => {
                warn!("Failed to wait for '{}': {}", script, e);
                let mut stderr = stderr;
                stderr.push_str(&e.to_string());
                ExecutionOutcome::new(SPAWN_FAILURE_CODE, stdout, stderr)
            }
        }
    }
}

#[async_trait]
impl ProcessRunner for ShellRunner {
    async fn run(&self, command: &CommandLine, mode: ExecutionMode) -> ExecutionOutcome {
        let script = command.render();
        let started = Instant::now();

        let outcome = if mode.blocking {
            self.run_blocking(&script, mode.verbose)
        } else {
            self.run_background(&script, mode.verbose).await
        };

        debug!(
            "'{}' exited with code {} in {:?}",
            script,
            outcome.exit_code(),
            started.elapsed()
        );
        outcome
    }
}

async fn drain<R>(reader: Option<R>, echo: Option<Echo>) -> String
where
    R: AsyncRead + Unpin,
{
    let Some(reader) = reader else {
        return String::new();
    };

    let mut reader = BufReader::new(reader);
    let mut captured = Vec::new();
    let mut line = Vec::new();

    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => break,
            Ok(_) => {
                if let Some(echo) = echo {
                    echo.write(&line);
                }
                captured.extend_from_slice(&line);
            }
            Err(e) => {
                warn!("Failed to read child output: {}", e);
                break;
            }
        }
    }

    String::from_utf8_lossy(&captured).into_owned()
}
