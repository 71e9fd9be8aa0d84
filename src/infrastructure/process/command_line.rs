use serde::Serialize;
use std::fmt;

/// A single argument of a pipeline stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Arg {
    /// Passed through as one word; quoted when rendered
    Plain(String),
    /// Shell text expanded by the shell, e.g. `'/repos/ddf'/*.csv`.
    /// Only built from already-quoted parts.
    Glob(String),
}

impl Arg {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Plain(value) | Self::Glob(value) => value,
        }
    }

    fn render(&self) -> String {
        match self {
            Self::Plain(value) => shell_words::quote(value).into_owned(),
            Self::Glob(value) => value.clone(),
        }
    }
}

/// One program invocation inside a pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stage {
    pub program: String,
    pub args: Vec<Arg>,
}

impl Stage {
    fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    fn render(&self) -> String {
        let mut words = vec![shell_words::quote(&self.program).into_owned()];
        words.extend(self.args.iter().map(Arg::render));
        words.join(" ")
    }
}

/// Command produced by the builder: one or more stages joined by pipes
///
/// ```
/// use repos_service::infrastructure::process::command_line::CommandLine;
///
/// let command = CommandLine::new("git")
///     .arg("--git-dir=/repos/ddf/.git")
///     .arg("--work-tree=/repos/ddf")
///     .args(["fetch", "--all", "--prune"]);
/// assert_eq!(command.program(), "git");
/// assert_eq!(command.argv()[2..], ["fetch", "--all", "--prune"]);
/// assert!(command.render().ends_with(" fetch --all --prune"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandLine {
    stages: Vec<Stage>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            stages: vec![Stage::new(program)],
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.current_stage().args.push(Arg::Plain(arg.into()));
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stage = self.current_stage();
        stage.args.extend(args.into_iter().map(|arg| Arg::Plain(arg.into())));
        self
    }

    pub fn glob(mut self, shell_text: impl Into<String>) -> Self {
        self.current_stage().args.push(Arg::Glob(shell_text.into()));
        self
    }

    /// Start a new stage fed by the previous one's stdout
    pub fn pipe(mut self, program: impl Into<String>) -> Self {
        self.stages.push(Stage::new(program));
        self
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Program of the first stage
    pub fn program(&self) -> &str {
        &self.stages[0].program
    }

    /// Arguments of the first stage, unquoted
    pub fn argv(&self) -> Vec<&str> {
        self.stages[0].args.iter().map(Arg::as_str).collect()
    }

    pub fn is_pipeline(&self) -> bool {
        self.stages.len() > 1
    }

    /// Shell text handed to `sh -c`
    pub fn render(&self) -> String {
        self.stages
            .iter()
            .map(Stage::render)
            .collect::<Vec<_>>()
            .join(" | ")
    }

    fn current_stage(&mut self) -> &mut Stage {
        let last = self.stages.len() - 1;
        &mut self.stages[last]
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_args_are_quoted_when_needed() {
        let command = CommandLine::new("git").args(["show", "HEAD:my file.csv"]);
        assert_eq!(command.render(), "git show 'HEAD:my file.csv'");
        assert_eq!(command.argv(), vec!["show", "HEAD:my file.csv"]);
    }

    #[test]
    fn test_glob_is_rendered_verbatim() {
        let command = CommandLine::new("wc")
            .arg("-l")
            .glob("/repos/ddf/*.csv")
            .pipe("grep")
            .arg("total$");
        assert!(command.is_pipeline());
        assert_eq!(command.render(), "wc -l /repos/ddf/*.csv | grep 'total$'");
        assert_eq!(command.stages()[1].program, "grep");
    }

    #[test]
    fn test_single_stage() {
        let command = CommandLine::new("echo").arg("0");
        assert!(!command.is_pipeline());
        assert_eq!(command.program(), "echo");
        assert_eq!(command.to_string(), "echo 0");
    }
}
