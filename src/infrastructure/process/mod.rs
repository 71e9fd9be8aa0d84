pub mod command_builder;
pub mod command_executor;
pub mod command_line;

pub use command_builder::CommandBuilder;
pub use command_executor::{ExecutionOutcome, ProcessRunner, ShellRunner};
pub use command_line::CommandLine;

#[cfg(test)]
pub use command_executor::MockProcessRunner;
