/// Infrastructure layer modules
///
/// This layer provides concrete implementations for external system interactions:
/// - Process execution (command building, shell runner)
/// - File system operations (directory lifecycle)
/// - Diagnostics (structured records for invocations and failures)
pub mod diagnostics;
pub mod filesystem;
pub mod process;

// Re-export commonly used types
pub use diagnostics::{DiagnosticRecord, DiagnosticsSink, MemorySink, TracingSink};
pub use filesystem::DirectoryManager;
pub use process::{CommandBuilder, CommandLine, ExecutionOutcome, ProcessRunner, ShellRunner};
