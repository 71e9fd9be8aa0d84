use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use super::error_classifier::{
    classify_credentials, operation_overrides, Classified, ClassifiedResult, ErrorClassifier,
};
use super::normalizer::{CommitHistory, Identity, LineCount, Normalizer, StatusMap};
use crate::common::error::RepoError;
use crate::common::result::{RepoResult, ResultExt};
use crate::domain::entities::location::RepositoryLocation;
use crate::domain::entities::operation::{Operation, OperationKind, OperationRequest, RequestOptions};
use crate::domain::entities::service_config::{ResolvedRequest, ServiceConfig};
use crate::domain::value_objects::commit_record::CommitRecord;
use crate::domain::value_objects::execution_mode::ExecutionMode;
use crate::domain::value_objects::file_status::FileStatus;
use crate::domain::value_objects::remote_url::RemoteUrl;
use crate::infrastructure::diagnostics::{
    DefaultsSnapshot, DiagnosticRecord, DiagnosticsSink, TracingSink,
};
use crate::infrastructure::filesystem::DirectoryManager;
use crate::infrastructure::process::{
    CommandBuilder, CommandLine, ExecutionOutcome, ProcessRunner, ShellRunner,
};

/// Entry point for every repository operation
///
/// Cheap to clone; clones share the configuration, the runner and the sink.
/// Calls may run concurrently from many tasks, but mutating operations against
/// one working copy must not overlap. Nothing here serializes them.
#[derive(Clone)]
pub struct RepoService {
    config: Arc<ServiceConfig>,
    runner: Arc<dyn ProcessRunner>,
    sink: Arc<dyn DiagnosticsSink>,
    directories: DirectoryManager,
}

impl RepoService {
    /// Service running commands through the platform shell and logging through `tracing`
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_components(config, Arc::new(ShellRunner::new()), Arc::new(TracingSink))
    }

    pub fn with_components(
        config: ServiceConfig,
        runner: Arc<dyn ProcessRunner>,
        sink: Arc<dyn DiagnosticsSink>,
    ) -> Self {
        let directories = DirectoryManager::new(config.removal_policy);
        Self {
            config: Arc::new(config),
            runner,
            sink,
            directories,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Build, run, classify and normalize one request
    ///
    /// The normalizer only sees the stdout of a zero exit. Benign conditions come
    /// back as [`Classified::Benign`] with the label of the pattern that matched.
    pub async fn execute<N>(
        &self,
        request: &OperationRequest,
        normalizer: &N,
    ) -> ClassifiedResult<N::Output>
    where
        N: Normalizer,
    {
        let resolved = self.config.resolve(request);
        let kind = resolved.kind();
        let command = CommandBuilder::new(&self.config).build(&resolved)?;

        let outcome = self.run(kind, &command, resolved.mode).await;
        let classified = self.classify(&resolved, outcome)?;

        match classified {
            Classified::Output(raw) => normalizer
                .normalize(&raw)
                .map(Classified::Output)
                .map_repo_err(|e| RepoError::normalize_error(kind, e.to_string())),
            Classified::Benign { condition } => {
                debug!("{} ended with benign condition '{}'", kind, condition);
                Ok(Classified::Benign { condition })
            }
        }
    }

    /// Clone `url` into `location`
    ///
    /// A destination that already holds a working copy counts as success.
    pub async fn clone_repository(
        &self,
        url: &str,
        location: RepositoryLocation,
        branch: Option<&str>,
        options: RequestOptions,
    ) -> RepoResult<()> {
        let url = RemoteUrl::new(url).map_repo_err(|e| RepoError::invalid_url(e.to_string(), url))?;
        let mut request = OperationRequest::new(Operation::Clone { url })
            .with_location(location)
            .with_options(options);
        if let Some(branch) = branch {
            request = request.with_branch(branch);
        }
        self.unit(request).await
    }

    pub async fn checkout_branch(
        &self,
        location: RepositoryLocation,
        branch: Option<&str>,
        options: RequestOptions,
    ) -> RepoResult<()> {
        let mut request = Self::scoped(Operation::CheckoutBranch, location, options);
        if let Some(branch) = branch {
            request = request.with_branch(branch);
        }
        self.unit(request).await
    }

    pub async fn checkout_commit(
        &self,
        location: RepositoryLocation,
        commit: Option<&str>,
        options: RequestOptions,
    ) -> RepoResult<()> {
        let mut request = Self::scoped(Operation::CheckoutCommit, location, options);
        if let Some(commit) = commit {
            request = request.with_commit(commit);
        }
        self.unit(request).await
    }

    pub async fn fetch(&self, location: RepositoryLocation, options: RequestOptions) -> RepoResult<()> {
        self.unit(Self::scoped(Operation::Fetch, location, options)).await
    }

    /// Hard reset onto `origin/<branch>`
    pub async fn reset(
        &self,
        location: RepositoryLocation,
        branch: Option<&str>,
        options: RequestOptions,
    ) -> RepoResult<()> {
        let mut request = Self::scoped(Operation::Reset, location, options);
        if let Some(branch) = branch {
            request = request.with_branch(branch);
        }
        self.unit(request).await
    }

    pub async fn pull(
        &self,
        location: RepositoryLocation,
        branch: Option<&str>,
        options: RequestOptions,
    ) -> RepoResult<()> {
        let mut request = Self::scoped(Operation::Pull, location, options);
        if let Some(branch) = branch {
            request = request.with_branch(branch);
        }
        self.unit(request).await
    }

    /// Remove untracked files and directories
    pub async fn clean(&self, location: RepositoryLocation, options: RequestOptions) -> RepoResult<()> {
        self.unit(Self::scoped(Operation::Clean, location, options)).await
    }

    pub async fn log(
        &self,
        location: RepositoryLocation,
        options: RequestOptions,
    ) -> RepoResult<Vec<CommitRecord>> {
        let request = Self::scoped(Operation::Log, location, options);
        Ok(self.execute(&request, &CommitHistory).await?.unwrap_or_default())
    }

    /// Content of `file_path` at `commit`; empty when the file does not exist there
    pub async fn show(
        &self,
        location: RepositoryLocation,
        file_path: &str,
        commit: Option<&str>,
        options: RequestOptions,
    ) -> RepoResult<String> {
        let operation = Operation::Show {
            file_path: file_path.to_string(),
        };
        let mut request = Self::scoped(operation, location, options);
        if let Some(commit) = commit {
            request = request.with_commit(commit);
        }
        Ok(self.execute(&request, &Identity).await?.unwrap_or_default())
    }

    /// Data files changed between two revisions, keyed by path
    pub async fn diff(
        &self,
        location: RepositoryLocation,
        from: &str,
        to: &str,
        options: RequestOptions,
    ) -> RepoResult<BTreeMap<String, FileStatus>> {
        let operation = Operation::Diff {
            from: from.to_string(),
            to: to.to_string(),
        };
        let request = Self::scoped(operation, location, options);
        Ok(self.execute(&request, &StatusMap).await?.unwrap_or_default())
    }

    /// Total lines of the given files, or of every data file in the repository when
    /// `files` is `None`
    ///
    /// A file in the list that cannot be read fails the whole count.
    ///
    /// The repository form relies on the `total` line `wc` prints for two or more
    /// files. A repository holding exactly one data file has no such line, so the
    /// call fails with [`RepoError::OperationFailed`] (exit code 1). Count that file
    /// through the list form instead.
    pub async fn count_lines(
        &self,
        location: Option<RepositoryLocation>,
        files: Option<&[String]>,
        options: RequestOptions,
    ) -> RepoResult<u64> {
        let mut request = OperationRequest::new(Operation::CountLines {
            files: files.map(<[String]>::to_vec),
        })
        .with_options(options);
        request.location = location;

        Ok(self.execute(&request, &LineCount).await?.unwrap_or_default())
    }

    /// Verify that the ssh key is accepted by the configured host
    pub async fn check_credentials(&self, options: RequestOptions) -> RepoResult<()> {
        let request = OperationRequest::new(Operation::CheckCredentials).with_options(options);
        self.unit(request).await
    }

    pub async fn ensure_directory(&self, path: &Path) -> RepoResult<()> {
        self.directories.ensure_directory(path).await
    }

    /// Empty `path`; what happens when it is missing depends on the configured removal policy
    pub async fn remove_directory_contents(&self, path: &Path) -> RepoResult<()> {
        self.directories.remove_directory_contents(path).await
    }

    fn scoped(
        operation: Operation,
        location: RepositoryLocation,
        options: RequestOptions,
    ) -> OperationRequest {
        OperationRequest::new(operation)
            .with_location(location)
            .with_options(options)
    }

    async fn unit(&self, request: OperationRequest) -> RepoResult<()> {
        self.execute(&request, &Identity).await.map(|_| ())
    }

    async fn run(&self, kind: OperationKind, command: &CommandLine, mode: ExecutionMode) -> ExecutionOutcome {
        let rendered = command.render();
        self.sink
            .record(&DiagnosticRecord::invocation(kind, rendered.clone(), mode));

        let outcome = self.runner.run(command, mode).await;

        if !outcome.is_success() {
            self.sink.record(&DiagnosticRecord::failure(
                kind,
                rendered,
                &outcome,
                DefaultsSnapshot::from(self.config.as_ref()),
            ));
        }
        outcome
    }

    fn classify(&self, resolved: &ResolvedRequest<'_>, outcome: ExecutionOutcome) -> ClassifiedResult<String> {
        let kind = resolved.kind();

        let result = if kind == OperationKind::CheckCredentials {
            classify_credentials(
                &outcome,
                self.config.ssh_failure_threshold,
                &self.config.ssh_help_url,
            )
            .map(|classified| classified.map(|()| outcome.into_parts().1))
        } else {
            ErrorClassifier::new(&self.config.allowed_errors).classify(
                kind,
                &operation_overrides(resolved),
                outcome,
            )
        };

        if let Err(error) = &result {
            warn!("{}", error);
        }
        result
    }
}
