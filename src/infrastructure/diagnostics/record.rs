use crate::domain::entities::operation::OperationKind;
use crate::domain::entities::service_config::ServiceConfig;
use crate::domain::value_objects::execution_mode::ExecutionMode;
use crate::infrastructure::process::command_executor::ExecutionOutcome;
use serde::Serialize;

/// Value of the `source` field on every record this crate emits
pub const DIAGNOSTICS_SOURCE: &str = "repo-service";

/// Configured defaults at the time of a failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefaultsSnapshot {
    pub branch: String,
    pub commit: String,
    pub silent: bool,
    pub blocking: bool,
}

impl From<&ServiceConfig> for DefaultsSnapshot {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            branch: config.default_branch.clone(),
            commit: config.default_commit.clone(),
            silent: config.silent,
            blocking: config.blocking,
        }
    }
}

/// Structured event handed to a [`DiagnosticsSink`](super::DiagnosticsSink)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DiagnosticRecord {
    /// Emitted right before a child process is spawned
    Invocation {
        source: String,
        operation: OperationKind,
        command: String,
        mode: ExecutionMode,
    },
    /// Emitted for every non-zero exit, benign or not
    Failure {
        source: String,
        operation: OperationKind,
        command: String,
        exit_code: i32,
        stdout: String,
        stderr: String,
        defaults: DefaultsSnapshot,
    },
}

impl DiagnosticRecord {
    pub fn invocation(operation: OperationKind, command: impl Into<String>, mode: ExecutionMode) -> Self {
        Self::Invocation {
            source: DIAGNOSTICS_SOURCE.to_string(),
            operation,
            command: command.into(),
            mode,
        }
    }

    pub fn failure(
        operation: OperationKind,
        command: impl Into<String>,
        outcome: &ExecutionOutcome,
        defaults: DefaultsSnapshot,
    ) -> Self {
        Self::Failure {
            source: DIAGNOSTICS_SOURCE.to_string(),
            operation,
            command: command.into(),
            exit_code: outcome.exit_code(),
            stdout: outcome.stdout().to_string(),
            stderr: outcome.stderr().to_string(),
            defaults,
        }
    }

    pub fn operation(&self) -> OperationKind {
        match self {
            Self::Invocation { operation, .. } | Self::Failure { operation, .. } => *operation,
        }
    }

    pub fn command(&self) -> &str {
        match self {
            Self::Invocation { command, .. } | Self::Failure { command, .. } => command,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failure_record_serializes_with_defaults() {
        let outcome = ExecutionOutcome::new(128, "", "fatal: not a git repository");
        let record = DiagnosticRecord::failure(
            OperationKind::Fetch,
            "git fetch --all --prune",
            &outcome,
            DefaultsSnapshot::from(&ServiceConfig::default()),
        );

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "kind": "failure",
                "source": "repo-service",
                "operation": "fetch",
                "command": "git fetch --all --prune",
                "exit_code": 128,
                "stdout": "",
                "stderr": "fatal: not a git repository",
                "defaults": {
                    "branch": "master",
                    "commit": "HEAD",
                    "silent": true,
                    "blocking": false
                }
            })
        );
        assert!(record.is_failure());
    }

    #[test]
    fn test_invocation_accessors() {
        let record =
            DiagnosticRecord::invocation(OperationKind::Log, "git log", ExecutionMode::blocking());
        assert_eq!(record.operation(), OperationKind::Log);
        assert_eq!(record.command(), "git log");
        assert!(!record.is_failure());
    }
}
