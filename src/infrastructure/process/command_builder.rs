use super::command_line::CommandLine;
use crate::common::error::RepoError;
use crate::common::result::{OptionExt, RepoResult};
use crate::domain::entities::location::RepositoryLocation;
use crate::domain::entities::operation::{Operation, OperationKind};
use crate::domain::entities::service_config::{ResolvedRequest, ServiceConfig};
use std::path::{Path, PathBuf};

/// History format: short hash, author unix time, author date, subject, blank line
pub const LOG_FORMAT: &str = "--pretty=format:%h%n%at%n%ad%n%s%n%n";

/// Maps a resolved request onto the command that carries it out. No side effects.
pub struct CommandBuilder<'c> {
    config: &'c ServiceConfig,
}

impl<'c> CommandBuilder<'c> {
    pub fn new(config: &'c ServiceConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, request: &ResolvedRequest<'_>) -> RepoResult<CommandLine> {
        let kind = request.kind();

        match request.operation {
            Operation::Clone { url } => {
                let location = Self::require_location(kind, request.location)?;
                let branch = Self::reference(kind, "branch", request.branch)?;
                self.clone_command(location, url.as_str(), branch)
            }
            Operation::CheckoutBranch => {
                let branch = Self::reference(kind, "branch", request.branch)?;
                Ok(self.git_in(kind, request.location)?.args(["checkout", branch]))
            }
            Operation::CheckoutCommit => {
                let commit = Self::reference(kind, "commit", request.commit)?;
                Ok(self.git_in(kind, request.location)?.args(["checkout", commit]))
            }
            Operation::Fetch => Ok(self
                .git_in(kind, request.location)?
                .args(["fetch", "--all", "--prune"])),
            Operation::Reset => {
                let branch = Self::reference(kind, "branch", request.branch)?;
                Ok(self
                    .git_in(kind, request.location)?
                    .args(["reset", "--hard"])
                    .arg(format!("origin/{}", branch)))
            }
            Operation::Pull => {
                let branch = Self::reference(kind, "branch", request.branch)?;
                Ok(self
                    .git_in(kind, request.location)?
                    .args(["pull", "origin", branch]))
            }
            Operation::Clean => Ok(self.git_in(kind, request.location)?.args(["clean", "-f", "-d"])),
            Operation::Log => Ok(self.git_in(kind, request.location)?.args(["log", LOG_FORMAT])),
            Operation::Show { file_path } => {
                let commit = Self::reference(kind, "commit", request.commit)?;
                Self::validate_repo_path(kind, file_path)?;
                Ok(self
                    .git_in(kind, request.location)?
                    .arg("show")
                    .arg(format!("{}:{}", commit, file_path)))
            }
            Operation::Diff { from, to } => {
                let from = Self::reference(kind, "commit-from", from)?;
                let to = Self::reference(kind, "commit-to", to)?;
                Ok(self
                    .git_in(kind, request.location)?
                    .args(["diff", from, to, "--name-status", "--no-renames", "--"])
                    .arg(format!("*.{}", self.config.data_extension)))
            }
            Operation::CountLines { files } => match files {
                Some(files) if files.is_empty() => Ok(CommandLine::new("echo").arg("0")),
                Some(files) => self.count_lines_of(kind, request.location, files),
                None => {
                    let location = Self::require_location(kind, request.location)?;
                    Ok(self.count_lines_in(&location.resolve()?))
                }
            },
            Operation::CheckCredentials => Ok(CommandLine::new(&self.config.ssh_executable)
                .arg("-T")
                .arg(&self.config.ssh_host)),
        }
    }

    /// `git` bound to an explicit metadata/work-tree pair instead of the process cwd
    fn git_in(
        &self,
        kind: OperationKind,
        location: Option<&RepositoryLocation>,
    ) -> RepoResult<CommandLine> {
        let location = Self::require_location(kind, location)?;
        let work_tree = location.resolve()?;
        let git_dir = work_tree.join(&self.config.metadata_dir);

        Ok(CommandLine::new(&self.config.git_executable)
            .arg(format!("--git-dir={}", git_dir.display()))
            .arg(format!("--work-tree={}", work_tree.display())))
    }

    fn clone_command(
        &self,
        location: &RepositoryLocation,
        url: &str,
        branch: &str,
    ) -> RepoResult<CommandLine> {
        // validates both halves of a split location
        location.resolve()?;

        let command = CommandLine::new(&self.config.git_executable);
        let command = match location.base() {
            Some(base) => command
                .arg("-C")
                .arg(base.display().to_string())
                .args(["clone", url])
                .arg(location.path().display().to_string()),
            None => command
                .args(["clone", url])
                .arg(location.path().display().to_string()),
        };

        Ok(command.args(["-b", branch]))
    }

    fn count_lines_in(&self, directory: &Path) -> CommandLine {
        let pattern = format!(
            "{}/*.{}",
            shell_words::quote(&directory.display().to_string()),
            shell_words::quote(&self.config.data_extension)
        );

        CommandLine::new("wc")
            .arg("-l")
            .glob(pattern)
            .pipe("grep")
            .arg("total$")
    }

    fn count_lines_of(
        &self,
        kind: OperationKind,
        location: Option<&RepositoryLocation>,
        files: &[String],
    ) -> RepoResult<CommandLine> {
        let root = location.map(RepositoryLocation::resolve).transpose()?;

        let mut paths = Vec::with_capacity(files.len());
        for file in files {
            if file.is_empty() {
                return Err(RepoError::invalid_request(kind, "file names must not be empty"));
            }
            let path = PathBuf::from(file);
            let resolved = match (&root, path.is_absolute()) {
                (_, true) => path,
                (Some(root), false) => root.join(path),
                (None, false) => {
                    return Err(RepoError::invalid_request(
                        kind,
                        format!("relative file '{}' needs a repository location", file),
                    ))
                }
            };
            paths.push(resolved.display().to_string());
        }

        // single stage, so a missing file decides the exit code
        Ok(CommandLine::new("wc").arg("-l").arg("--").args(paths))
    }

    fn require_location<'r>(
        kind: OperationKind,
        location: Option<&'r RepositoryLocation>,
    ) -> RepoResult<&'r RepositoryLocation> {
        location.ok_or_invalid_request(kind, "a repository location is required")
    }

    /// Branch names, commits and ranges end up as git arguments
    fn reference<'v>(kind: OperationKind, what: &str, value: &'v str) -> RepoResult<&'v str> {
        if value.trim().is_empty() {
            return Err(RepoError::invalid_request(
                kind,
                format!("{} must not be empty", what),
            ));
        }
        if value.starts_with('-') {
            return Err(RepoError::invalid_request(
                kind,
                format!("{} '{}' must not start with '-'", what, value),
            ));
        }
        Ok(value)
    }

    fn validate_repo_path(kind: OperationKind, file_path: &str) -> RepoResult<()> {
        if file_path.is_empty() {
            return Err(RepoError::invalid_request(kind, "file path must not be empty"));
        }
        if Path::new(file_path).is_absolute() {
            return Err(RepoError::invalid_request(
                kind,
                format!("file path '{}' must be relative to the repository", file_path),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::operation::{OperationRequest, RequestOptions};
    use crate::domain::value_objects::remote_url::RemoteUrl;
    use pretty_assertions::assert_eq;

    const REPO: &str = "/repos/VS-work/ddf--ws-testing/master";

    fn build(request: &OperationRequest) -> RepoResult<CommandLine> {
        let config = ServiceConfig::default();
        let resolved = config.resolve(request);
        CommandBuilder::new(&config).build(&resolved)
    }

    fn scoped(operation: Operation) -> OperationRequest {
        OperationRequest::new(operation).with_location(RepositoryLocation::new(REPO))
    }

    fn scoped_prefix() -> Vec<String> {
        vec![
            format!("--git-dir={}/.git", REPO),
            format!("--work-tree={}", REPO),
        ]
    }

    fn argv(command: &CommandLine) -> Vec<String> {
        command.argv().into_iter().map(String::from).collect()
    }

    fn expected(tail: &[&str]) -> Vec<String> {
        let mut args = scoped_prefix();
        args.extend(tail.iter().map(|s| s.to_string()));
        args
    }

    #[test]
    fn test_clone_into_split_location() {
        let url = RemoteUrl::new("git@github.com:VS-work/ddf--ws-testing.git").unwrap();
        let request = OperationRequest::new(Operation::Clone { url }).with_location(
            RepositoryLocation::within("/home/import/repos", "VS-work/ddf--ws-testing/master"),
        );

        let command = build(&request).unwrap();
        assert_eq!(command.program(), "git");
        assert_eq!(
            argv(&command),
            vec![
                "-C",
                "/home/import/repos",
                "clone",
                "git@github.com:VS-work/ddf--ws-testing.git",
                "VS-work/ddf--ws-testing/master",
                "-b",
                "master",
            ]
        );
    }

    #[test]
    fn test_clone_into_root_location_with_branch() {
        let url = RemoteUrl::new("https://github.com/VS-work/ddf--ws-testing.git").unwrap();
        let request = scoped(Operation::Clone { url }).with_branch("development");

        let command = build(&request).unwrap();
        assert_eq!(
            argv(&command),
            vec![
                "clone",
                "https://github.com/VS-work/ddf--ws-testing.git",
                REPO,
                "-b",
                "development",
            ]
        );
    }

    #[test]
    fn test_checkout_branch_defaults_to_master() {
        let command = build(&scoped(Operation::CheckoutBranch)).unwrap();
        assert_eq!(argv(&command), expected(&["checkout", "master"]));
        assert_eq!(
            shell_words::split(&command.render()).unwrap(),
            [vec!["git".to_string()], expected(&["checkout", "master"])].concat()
        );
    }

    #[test]
    fn test_checkout_commit_defaults_to_head() {
        let command = build(&scoped(Operation::CheckoutCommit)).unwrap();
        assert_eq!(argv(&command), expected(&["checkout", "HEAD"]));

        let command = build(&scoped(Operation::CheckoutCommit).with_commit("5d4ee0a")).unwrap();
        assert_eq!(argv(&command), expected(&["checkout", "5d4ee0a"]));
    }

    #[test]
    fn test_sync_commands() {
        assert_eq!(
            argv(&build(&scoped(Operation::Fetch)).unwrap()),
            expected(&["fetch", "--all", "--prune"])
        );
        assert_eq!(
            argv(&build(&scoped(Operation::Reset).with_branch("development")).unwrap()),
            expected(&["reset", "--hard", "origin/development"])
        );
        assert_eq!(
            argv(&build(&scoped(Operation::Pull)).unwrap()),
            expected(&["pull", "origin", "master"])
        );
        assert_eq!(
            argv(&build(&scoped(Operation::Clean)).unwrap()),
            expected(&["clean", "-f", "-d"])
        );
    }

    #[test]
    fn test_log_format_is_fixed() {
        let command = build(&scoped(Operation::Log)).unwrap();
        assert_eq!(
            argv(&command),
            expected(&["log", "--pretty=format:%h%n%at%n%ad%n%s%n%n"])
        );
    }

    #[test]
    fn test_show_path_at_commit() {
        let request = scoped(Operation::Show {
            file_path: "lang/nl-nl/filename.csv".to_string(),
        })
        .with_commit("aaaaaaa");

        let command = build(&request).unwrap();
        assert_eq!(argv(&command), expected(&["show", "aaaaaaa:lang/nl-nl/filename.csv"]));
    }

    #[test]
    fn test_show_rejects_absolute_path() {
        let request = scoped(Operation::Show {
            file_path: "/etc/passwd".to_string(),
        });
        assert!(matches!(build(&request), Err(RepoError::InvalidRequest { .. })));
    }

    #[test]
    fn test_diff_keeps_flag_order() {
        let request = scoped(Operation::Diff {
            from: "HEAD~3".to_string(),
            to: "HEAD^".to_string(),
        });

        let command = build(&request).unwrap();
        assert_eq!(
            argv(&command),
            expected(&["diff", "HEAD~3", "HEAD^", "--name-status", "--no-renames", "--", "*.csv"])
        );
        assert!(command.render().ends_with("--name-status --no-renames -- '*.csv'"));
    }

    #[test]
    fn test_count_lines_empty_list_is_trivial() {
        let request = scoped(Operation::CountLines {
            files: Some(Vec::new()),
        });
        assert_eq!(build(&request).unwrap().render(), "echo 0");

        // no location needed either
        let request = OperationRequest::new(Operation::CountLines {
            files: Some(Vec::new()),
        });
        assert_eq!(build(&request).unwrap().render(), "echo 0");
    }

    #[test]
    fn test_count_lines_in_directory() {
        let command = build(&scoped(Operation::CountLines { files: None })).unwrap();
        assert_eq!(
            command.render(),
            format!("wc -l {}/*.csv | grep 'total$'", REPO)
        );
    }

    #[test]
    fn test_count_lines_of_files_resolves_against_location() {
        let request = scoped(Operation::CountLines {
            files: Some(vec![
                "ddf--concepts.csv".to_string(),
                "/data/ddf--entities.csv".to_string(),
            ]),
        });

        let command = build(&request).unwrap();
        let concepts = format!("{}/ddf--concepts.csv", REPO);
        assert_eq!(command.program(), "wc");
        assert_eq!(
            command.argv(),
            vec!["-l", "--", concepts.as_str(), "/data/ddf--entities.csv"]
        );
        assert!(!command.is_pipeline());
    }

    #[test]
    fn test_count_lines_relative_file_without_location() {
        let request = OperationRequest::new(Operation::CountLines {
            files: Some(vec!["ddf--concepts.csv".to_string()]),
        });
        assert!(matches!(build(&request), Err(RepoError::InvalidRequest { .. })));
    }

    #[test]
    fn test_check_credentials() {
        let command = build(&OperationRequest::new(Operation::CheckCredentials)).unwrap();
        assert_eq!(command.program(), "ssh");
        assert_eq!(command.argv(), vec!["-T", "git@github.com"]);
    }

    #[test]
    fn test_missing_location_is_rejected() {
        let result = build(&OperationRequest::new(Operation::Fetch));
        match result {
            Err(RepoError::InvalidRequest { operation, .. }) => {
                assert_eq!(operation, OperationKind::Fetch)
            }
            other => panic!("Expected InvalidRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_relative_location_is_rejected() {
        let request =
            OperationRequest::new(Operation::Pull).with_location(RepositoryLocation::new("repos/ddf"));
        assert!(matches!(build(&request), Err(RepoError::InvalidLocation { .. })));
    }

    #[test]
    fn test_option_like_references_are_rejected() {
        let request = scoped(Operation::CheckoutBranch).with_branch("--orphan");
        assert!(build(&request).is_err());

        let request = scoped(Operation::Diff {
            from: "HEAD".to_string(),
            to: "--output=/tmp/x".to_string(),
        });
        assert!(build(&request).is_err());
    }

    #[test]
    fn test_execution_options_do_not_change_the_command() {
        let plain = build(&scoped(Operation::Fetch)).unwrap();
        let verbose = build(
            &scoped(Operation::Fetch)
                .with_options(RequestOptions::new().with_blocking(true).with_verbose(true)),
        )
        .unwrap();
        assert_eq!(plain, verbose);
    }
}
