use serde::{Deserialize, Serialize};

/// How a single child process is run
///
/// This is all the process runner gets to see of a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExecutionMode {
    /// Hold the calling thread until the child exits
    pub blocking: bool,
    /// Echo the captured output to this process's stdout/stderr
    pub verbose: bool,
}

impl ExecutionMode {
    pub fn new(blocking: bool, verbose: bool) -> Self {
        Self { blocking, verbose }
    }

    pub fn blocking() -> Self {
        Self::new(true, false)
    }

    pub fn background() -> Self {
        Self::new(false, false)
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
