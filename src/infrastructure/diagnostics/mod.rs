pub mod record;
pub mod sink;

pub use record::{DefaultsSnapshot, DiagnosticRecord, DIAGNOSTICS_SOURCE};
pub use sink::{DiagnosticsSink, MemorySink, TracingSink};
