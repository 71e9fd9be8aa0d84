use crate::common::error::RepoError;
use crate::common::result::RepoResult;
use crate::domain::entities::operation::{Operation, OperationKind};
use crate::domain::entities::service_config::ResolvedRequest;
use crate::domain::value_objects::allowed_error::{AllowedErrorPattern, AllowedErrorPatterns};
use crate::infrastructure::process::command_executor::ExecutionOutcome;

/// Label for a `show` of a path git does not know at the requested commit
pub const PATH_ABSENT_AT_REVISION: &str = "path-absent-at-revision";
/// Label for a `show` of a path that exists in the work tree only
pub const PATH_NOT_IN_REVISION: &str = "path-not-in-revision";
/// Label for an ssh exit code at or below the configured threshold
pub const AUTHENTICATED_WITHOUT_SHELL: &str = "authenticated-without-shell";

/// Non-error result of an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified<T> {
    /// Exit code 0, normalized output
    Output(T),
    /// Non-zero exit matching an allowed pattern
    Benign { condition: String },
}

impl<T> Classified<T> {
    pub fn benign(condition: impl Into<String>) -> Self {
        Self::Benign {
            condition: condition.into(),
        }
    }

    pub fn is_benign(&self) -> bool {
        matches!(self, Self::Benign { .. })
    }

    /// Label of the matched condition, if benign
    pub fn condition(&self) -> Option<&str> {
        match self {
            Self::Output(_) => None,
            Self::Benign { condition } => Some(condition),
        }
    }

    pub fn into_output(self) -> Option<T> {
        match self {
            Self::Output(output) => Some(output),
            Self::Benign { .. } => None,
        }
    }

    pub fn map<U, F>(self, f: F) -> Classified<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Output(output) => Classified::Output(f(output)),
            Self::Benign { condition } => Classified::Benign { condition },
        }
    }

    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        self.into_output().unwrap_or_default()
    }
}

/// Outcome of one operation after classification
pub type ClassifiedResult<T> = RepoResult<Classified<T>>;

/// Decides whether an exit is success, a benign condition or a failure
///
/// Operation overrides are consulted before the global allowed set. Both are
/// ordered and the first substring match wins.
#[derive(Debug, Clone, Copy)]
pub struct ErrorClassifier<'p> {
    allowed: &'p AllowedErrorPatterns,
}

impl<'p> ErrorClassifier<'p> {
    pub fn new(allowed: &'p AllowedErrorPatterns) -> Self {
        Self { allowed }
    }

    /// Classify a finished process; on success the raw stdout is handed back
    pub fn classify(
        &self,
        operation: OperationKind,
        overrides: &AllowedErrorPatterns,
        outcome: ExecutionOutcome,
    ) -> ClassifiedResult<String> {
        let (exit_code, stdout, stderr) = outcome.into_parts();
        if exit_code == 0 {
            return Ok(Classified::Output(stdout));
        }

        let matched = overrides
            .first_match(&stderr)
            .or_else(|| self.allowed.first_match(&stderr));

        match matched {
            Some(pattern) => Ok(Classified::benign(pattern.label.clone())),
            None => Err(RepoError::operation_failed(operation, exit_code)),
        }
    }
}

/// Benign conditions that only apply to one operation
pub fn operation_overrides(request: &ResolvedRequest<'_>) -> AllowedErrorPatterns {
    match request.operation {
        // older git capitalizes the message, current git does not
        Operation::Show { file_path } => AllowedErrorPatterns::empty()
            .with(AllowedErrorPattern::new(
                PATH_ABSENT_AT_REVISION,
                format!(
                    "fatal: Path '{}' does not exist in '{}'",
                    file_path, request.commit
                ),
            ))
            .with(AllowedErrorPattern::new(
                PATH_ABSENT_AT_REVISION,
                format!(
                    "fatal: path '{}' does not exist in '{}'",
                    file_path, request.commit
                ),
            ))
            .with(AllowedErrorPattern::new(
                PATH_NOT_IN_REVISION,
                "exists on disk, but not in",
            )),
        _ => AllowedErrorPatterns::empty(),
    }
}

/// `ssh -T` exits non-zero even when the key is accepted, since no shell is granted
pub fn classify_credentials(
    outcome: &ExecutionOutcome,
    threshold: i32,
    help: &str,
) -> ClassifiedResult<()> {
    match outcome.exit_code() {
        0 => Ok(Classified::Output(())),
        code if code > 0 && code <= threshold => Ok(Classified::benign(AUTHENTICATED_WITHOUT_SHELL)),
        code => Err(RepoError::credential_check_failed(code, help)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::location::RepositoryLocation;
    use crate::domain::entities::operation::OperationRequest;
    use crate::domain::entities::service_config::ServiceConfig;
    use crate::domain::value_objects::allowed_error::DESTINATION_NOT_EMPTY;

    fn classify(outcome: ExecutionOutcome) -> ClassifiedResult<String> {
        let allowed = AllowedErrorPatterns::default();
        ErrorClassifier::new(&allowed).classify(
            OperationKind::Clone,
            &AllowedErrorPatterns::empty(),
            outcome,
        )
    }

    #[test]
    fn test_zero_exit_is_success_with_raw_stdout() {
        let result = classify(ExecutionOutcome::new(0, "  raw\n", "warning: ignored"));
        assert_eq!(result.unwrap(), Classified::Output("  raw\n".to_string()));
    }

    #[test]
    fn test_allowed_pattern_is_benign() {
        let result = classify(ExecutionOutcome::new(
            128,
            "",
            "fatal: destination path 'master' already exists and is not an empty directory.\n",
        ));
        let classified = result.unwrap();
        assert!(classified.is_benign());
        assert_eq!(classified.condition(), Some(DESTINATION_NOT_EMPTY));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let result = classify(ExecutionOutcome::new(
            128,
            "",
            "fatal: destination path 'master' ALREADY EXISTS AND IS NOT AN EMPTY DIRECTORY.",
        ));
        assert!(result.is_err());
    }

    #[test]
    fn test_failure_message_never_carries_stderr() {
        let error = classify(ExecutionOutcome::new(128, "", "fatal: secret token abc123"))
            .unwrap_err();
        let message = error.to_string();
        assert_eq!(message, "Unexpected error [code=128]: clone");
        assert!(!message.contains("abc123"));
    }

    #[test]
    fn test_overrides_are_checked_first() {
        let allowed = AllowedErrorPatterns::empty().with(AllowedErrorPattern::new("global", "boom"));
        let overrides =
            AllowedErrorPatterns::empty().with(AllowedErrorPattern::new("specific", "boom"));

        let result = ErrorClassifier::new(&allowed).classify(
            OperationKind::Show,
            &overrides,
            ExecutionOutcome::new(1, "", "boom"),
        );
        assert_eq!(result.unwrap().condition(), Some("specific"));
    }

    #[test]
    fn test_show_overrides_name_file_and_commit() {
        let config = ServiceConfig::default();
        let request = OperationRequest::new(Operation::Show {
            file_path: "lang/nl-nl/filename.csv".to_string(),
        })
        .with_location(RepositoryLocation::new("/repos/ddf"))
        .with_commit("aaaaaaa");
        let overrides = operation_overrides(&config.resolve(&request));

        let stderr = "fatal: Path 'lang/nl-nl/filename.csv' does not exist in 'aaaaaaa'\n";
        assert_eq!(
            overrides.first_match(stderr).map(|p| p.label.as_str()),
            Some(PATH_ABSENT_AT_REVISION)
        );

        // a different file at the same commit is a real failure
        let other = "fatal: Path 'ddf--concepts.csv' does not exist in 'aaaaaaa'\n";
        assert!(overrides.first_match(other).is_none());

        // current git lowercases the message
        let stderr = "fatal: path 'lang/nl-nl/filename.csv' does not exist in 'aaaaaaa'\n";
        assert_eq!(
            overrides.first_match(stderr).map(|p| p.label.as_str()),
            Some(PATH_ABSENT_AT_REVISION)
        );
        let other = "fatal: path 'ddf--concepts.csv' does not exist in 'aaaaaaa'\n";
        assert!(overrides.first_match(other).is_none());

        let stderr = "fatal: Path 'x.csv' exists on disk, but not in 'aaaaaaa'.\n";
        assert_eq!(
            overrides.first_match(stderr).map(|p| p.label.as_str()),
            Some(PATH_NOT_IN_REVISION)
        );
    }

    #[test]
    fn test_other_operations_have_no_overrides() {
        let config = ServiceConfig::default();
        let request = OperationRequest::new(Operation::Fetch);
        assert!(operation_overrides(&config.resolve(&request)).is_empty());
    }

    #[test]
    fn test_credentials_threshold() {
        let help = "https://example.com/ssh";
        assert_eq!(
            classify_credentials(&ExecutionOutcome::success(""), 1, help).unwrap(),
            Classified::Output(())
        );
        assert_eq!(
            classify_credentials(&ExecutionOutcome::new(1, "", "Hi! no shell access"), 1, help)
                .unwrap()
                .condition(),
            Some(AUTHENTICATED_WITHOUT_SHELL)
        );

        for code in [255, 2, -1] {
            match classify_credentials(&ExecutionOutcome::new(code, "", ""), 1, help) {
                Err(RepoError::CredentialCheckFailed { exit_code, .. }) => {
                    assert_eq!(exit_code, code)
                }
                other => panic!("Expected CredentialCheckFailed, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_classified_helpers() {
        let benign: Classified<String> = Classified::benign(PATH_ABSENT_AT_REVISION);
        assert_eq!(benign.clone().unwrap_or_default(), "");
        assert_eq!(benign.map(|s| s.len()).condition(), Some(PATH_ABSENT_AT_REVISION));
        assert_eq!(Classified::Output(3).map(|n| n * 2).into_output(), Some(6));
    }
}
