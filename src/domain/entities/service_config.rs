use super::location::RepositoryLocation;
use super::operation::{Operation, OperationKind, OperationRequest};
use crate::common::error::RepoError;
use crate::common::result::RepoResult;
use crate::domain::value_objects::allowed_error::AllowedErrorPatterns;
use crate::domain::value_objects::execution_mode::ExecutionMode;
use serde::{Deserialize, Serialize};

/// What removing the contents of a missing directory means
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalPolicy {
    /// A missing directory is an error
    #[default]
    Strict,
    /// A missing directory is already empty
    Tolerant,
}

/// Immutable service configuration
///
/// Built once, shared read-only by every call. Per-call values are merged in by
/// [`ServiceConfig::resolve`].
///
/// ```
/// use repos_service::domain::entities::service_config::{RemovalPolicy, ServiceConfig};
///
/// let config = ServiceConfig::from_yaml_str("default_branch: main\nremoval_policy: tolerant\n").unwrap();
/// assert_eq!(config.default_branch, "main");
/// assert_eq!(config.default_commit, "HEAD");
/// assert_eq!(config.removal_policy, RemovalPolicy::Tolerant);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub default_branch: String,
    pub default_commit: String,
    /// Do not echo child output
    pub silent: bool,
    /// Hold the caller until the child exits
    pub blocking: bool,
    pub git_executable: String,
    pub ssh_executable: String,
    /// Target of the credential check, e.g. `git@github.com`
    pub ssh_host: String,
    /// Highest ssh exit code still counted as authenticated
    pub ssh_failure_threshold: i32,
    pub ssh_help_url: String,
    /// Metadata directory name inside each working copy
    pub metadata_dir: String,
    /// Extension of the data files diffs and line counts look at
    pub data_extension: String,
    pub removal_policy: RemovalPolicy,
    pub allowed_errors: AllowedErrorPatterns,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_branch: "master".to_string(),
            default_commit: "HEAD".to_string(),
            silent: true,
            blocking: false,
            git_executable: "git".to_string(),
            ssh_executable: "ssh".to_string(),
            ssh_host: "git@github.com".to_string(),
            ssh_failure_threshold: 1,
            ssh_help_url: "https://docs.github.com/en/authentication/connecting-to-github-with-ssh"
                .to_string(),
            metadata_dir: ".git".to_string(),
            data_extension: "csv".to_string(),
            removal_policy: RemovalPolicy::Strict,
            allowed_errors: AllowedErrorPatterns::default(),
        }
    }
}

/// A request with every default filled in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequest<'a> {
    pub operation: &'a Operation,
    pub location: Option<&'a RepositoryLocation>,
    pub branch: &'a str,
    pub commit: &'a str,
    pub mode: ExecutionMode,
}

impl<'a> ResolvedRequest<'a> {
    pub fn kind(&self) -> OperationKind {
        self.operation.kind()
    }
}

impl ServiceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> RepoResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_removal_policy(mut self, policy: RemovalPolicy) -> Self {
        self.removal_policy = policy;
        self
    }

    pub fn with_default_branch(mut self, branch: impl Into<String>) -> Self {
        self.default_branch = branch.into();
        self
    }

    pub fn with_allowed_errors(mut self, patterns: AllowedErrorPatterns) -> Self {
        self.allowed_errors = patterns;
        self
    }

    pub fn with_git_executable(mut self, executable: impl Into<String>) -> Self {
        self.git_executable = executable.into();
        self
    }

    pub fn with_ssh_host(mut self, host: impl Into<String>) -> Self {
        self.ssh_host = host.into();
        self
    }

    pub fn validate(&self) -> RepoResult<()> {
        let required = [
            ("default_branch", &self.default_branch),
            ("default_commit", &self.default_commit),
            ("git_executable", &self.git_executable),
            ("ssh_executable", &self.ssh_executable),
            ("ssh_host", &self.ssh_host),
            ("metadata_dir", &self.metadata_dir),
            ("data_extension", &self.data_extension),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(RepoError::config_error(format!("{} must not be empty", field)));
            }
        }

        if self.ssh_failure_threshold < 0 {
            return Err(RepoError::config_error(
                "ssh_failure_threshold must not be negative",
            ));
        }

        for pattern in self.allowed_errors.iter() {
            if pattern.label.is_empty() || pattern.needle.is_empty() {
                return Err(RepoError::config_error(
                    "allowed error patterns need a label and a non-empty needle",
                ));
            }
        }

        Ok(())
    }

    /// Execution mode when a request overrides nothing
    pub fn default_mode(&self) -> ExecutionMode {
        ExecutionMode::new(self.blocking, !self.silent)
    }

    /// Merge per-call overrides over the configured defaults. Pure.
    pub fn resolve<'a>(&'a self, request: &'a OperationRequest) -> ResolvedRequest<'a> {
        let defaults = self.default_mode();
        ResolvedRequest {
            operation: &request.operation,
            location: request.location.as_ref(),
            branch: request.branch.as_deref().unwrap_or(&self.default_branch),
            commit: request.commit.as_deref().unwrap_or(&self.default_commit),
            mode: ExecutionMode::new(
                request.options.blocking.unwrap_or(defaults.blocking),
                request.options.verbose.unwrap_or(defaults.verbose),
            ),
        }
    }
}
