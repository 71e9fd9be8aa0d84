use crate::common::error::RepoError;
use crate::domain::entities::operation::OperationKind;

/// Result alias used across the crate
///
/// # Examples
///
/// ```
/// use repos_service::common::result::RepoResult;
/// use repos_service::common::error::RepoError;
///
/// fn example_function() -> RepoResult<String> {
///     Ok("success".to_string())
/// }
///
/// fn example_with_error() -> RepoResult<()> {
///     Err(RepoError::config_error("Something went wrong"))
/// }
/// ```
pub type RepoResult<T> = Result<T, RepoError>;

/// Helpers for turning an `Option` into a `RepoResult`
pub trait OptionExt<T> {
    /// Convert `None` into an invalid-request error for `operation`
    ///
    /// # Examples
    ///
    /// ```
    /// use repos_service::common::result::{OptionExt, RepoResult};
    /// use repos_service::domain::entities::operation::OperationKind;
    ///
    /// let none_value: Option<String> = None;
    /// let result: RepoResult<String> =
    ///     none_value.ok_or_invalid_request(OperationKind::Show, "file path is required");
    /// assert!(result.is_err());
    /// ```
    fn ok_or_invalid_request(
        self,
        operation: OperationKind,
        message: impl Into<String>,
    ) -> RepoResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_invalid_request(
        self,
        operation: OperationKind,
        message: impl Into<String>,
    ) -> RepoResult<T> {
        self.ok_or_else(|| RepoError::invalid_request(operation, message))
    }
}

/// Helpers for mapping foreign errors into `RepoError`
pub trait ResultExt<T, E> {
    /// Map the error with a closure
    fn map_repo_err<F>(self, f: F) -> RepoResult<T>
    where
        F: FnOnce(E) -> RepoError;

    /// Wrap an I/O error as a directory lifecycle failure on `path`
    ///
    /// # Examples
    ///
    /// ```
    /// use repos_service::common::result::{RepoResult, ResultExt};
    ///
    /// let result: Result<(), std::io::Error> = Err(std::io::Error::new(
    ///     std::io::ErrorKind::PermissionDenied, "denied"
    /// ));
    /// let repo_result: RepoResult<()> = result.with_directory_error("create failed", None);
    /// assert!(repo_result.is_err());
    /// ```
    fn with_directory_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> RepoResult<T>
    where
        E: Into<std::io::Error>;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn map_repo_err<F>(self, f: F) -> RepoResult<T>
    where
        F: FnOnce(E) -> RepoError,
    {
        self.map_err(f)
    }

    fn with_directory_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> RepoResult<T>
    where
        E: Into<std::io::Error>,
    {
        self.map_err(|e| RepoError::directory_error_with_source(message, path, e.into()))
    }
}
