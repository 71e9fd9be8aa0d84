use super::record::DiagnosticRecord;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{error, info};

/// Receives diagnostic records. The service calls it but never configures it.
pub trait DiagnosticsSink: Send + Sync {
    fn record(&self, record: &DiagnosticRecord);
}

/// Forwards records to `tracing`: invocations at info, failures at error
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn record(&self, record: &DiagnosticRecord) {
        match record {
            DiagnosticRecord::Invocation {
                source,
                operation,
                command,
                mode,
            } => {
                info!(
                    source = %source,
                    operation = %operation,
                    command = %command,
                    blocking = mode.blocking,
                    verbose = mode.verbose,
                    "Running command"
                );
            }
            DiagnosticRecord::Failure {
                source,
                operation,
                command,
                exit_code,
                stdout,
                stderr,
                defaults,
            } => {
                let defaults = serde_json::to_string(defaults)
                    .unwrap_or_else(|e| format!("<unserializable: {}>", e));
                error!(
                    source = %source,
                    operation = %operation,
                    command = %command,
                    exit_code = *exit_code,
                    stdout = %stdout,
                    stderr = %stderr,
                    defaults = %defaults,
                    "Command exited with code {}",
                    exit_code
                );
            }
        }
    }
}

/// Keeps every record in memory, in arrival order
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<DiagnosticRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<DiagnosticRecord> {
        self.lock().clone()
    }

    pub fn invocations(&self) -> Vec<DiagnosticRecord> {
        self.lock().iter().filter(|r| !r.is_failure()).cloned().collect()
    }

    pub fn failures(&self) -> Vec<DiagnosticRecord> {
        self.lock().iter().filter(|r| r.is_failure()).cloned().collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    // a panicking test thread must not hide the records of the others
    fn lock(&self) -> MutexGuard<'_, Vec<DiagnosticRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DiagnosticsSink for MemorySink {
    fn record(&self, record: &DiagnosticRecord) {
        self.lock().push(record.clone());
    }
}
