use super::location::RepositoryLocation;
use crate::domain::value_objects::remote_url::RemoteUrl;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a unit of work against a repository or the filesystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationKind {
    Clone,
    CheckoutBranch,
    CheckoutCommit,
    Fetch,
    Reset,
    Pull,
    Clean,
    Log,
    Show,
    Diff,
    CountLines,
    CheckCredentials,
    EnsureDirectory,
    RemoveDirectory,
}

impl OperationKind {
    pub const ALL: [OperationKind; 14] = [
        Self::Clone,
        Self::CheckoutBranch,
        Self::CheckoutCommit,
        Self::Fetch,
        Self::Reset,
        Self::Pull,
        Self::Clean,
        Self::Log,
        Self::Show,
        Self::Diff,
        Self::CountLines,
        Self::CheckCredentials,
        Self::EnsureDirectory,
        Self::RemoveDirectory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clone => "clone",
            Self::CheckoutBranch => "checkout-branch",
            Self::CheckoutCommit => "checkout-commit",
            Self::Fetch => "fetch",
            Self::Reset => "reset",
            Self::Pull => "pull",
            Self::Clean => "clean",
            Self::Log => "log",
            Self::Show => "show",
            Self::Diff => "diff",
            Self::CountLines => "count-lines",
            Self::CheckCredentials => "check-credentials",
            Self::EnsureDirectory => "ensure-directory",
            Self::RemoveDirectory => "remove-directory",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An operation that runs through the command pipeline, with its own parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Clone { url: RemoteUrl },
    CheckoutBranch,
    CheckoutCommit,
    Fetch,
    Reset,
    Pull,
    Clean,
    Log,
    /// `file_path` is relative to the repository root
    Show { file_path: String },
    Diff { from: String, to: String },
    /// `None` counts every data file in the repository directory.
    /// An empty list is a valid input and counts to zero.
    CountLines { files: Option<Vec<String>> },
    CheckCredentials,
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Clone { .. } => OperationKind::Clone,
            Self::CheckoutBranch => OperationKind::CheckoutBranch,
            Self::CheckoutCommit => OperationKind::CheckoutCommit,
            Self::Fetch => OperationKind::Fetch,
            Self::Reset => OperationKind::Reset,
            Self::Pull => OperationKind::Pull,
            Self::Clean => OperationKind::Clean,
            Self::Log => OperationKind::Log,
            Self::Show { .. } => OperationKind::Show,
            Self::Diff { .. } => OperationKind::Diff,
            Self::CountLines { .. } => OperationKind::CountLines,
            Self::CheckCredentials => OperationKind::CheckCredentials,
        }
    }
}

/// Per-call execution overrides. `None` falls back to the service configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocking: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blocking(mut self, blocking: bool) -> Self {
        self.blocking = Some(blocking);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }
}

/// A named operation plus its parameters and execution overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequest {
    pub operation: Operation,
    pub location: Option<RepositoryLocation>,
    pub branch: Option<String>,
    pub commit: Option<String>,
    pub options: RequestOptions,
}

impl OperationRequest {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            location: None,
            branch: None,
            commit: None,
            options: RequestOptions::default(),
        }
    }

    pub fn with_location(mut self, location: RepositoryLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn with_commit(mut self, commit: impl Into<String>) -> Self {
        self.commit = Some(commit.into());
        self
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    pub fn kind(&self) -> OperationKind {
        self.operation.kind()
    }
}
