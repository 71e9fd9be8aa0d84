use crate::domain::entities::operation::OperationKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepoError {
    /// Non-zero exit that matched no allowed pattern. stderr stays in the diagnostics sink.
    #[error("Unexpected error [code={exit_code}]: {operation}")]
    OperationFailed {
        operation: OperationKind,
        exit_code: i32,
    },

    #[error("Credential check failed [code={exit_code}]: please follow {help} to configure access")]
    CredentialCheckFailed { exit_code: i32, help: String },

    #[error("Directory operation failed: {message}")]
    Directory {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Directory '{}' does not exist", .path.display())]
    DirectoryMissing { path: PathBuf },

    #[error("Invalid repository location: {message}")]
    InvalidLocation { message: String, path: PathBuf },

    #[error("Invalid remote url: {message}")]
    InvalidUrl { message: String, url: String },

    #[error("Invalid {operation} request: {message}")]
    InvalidRequest {
        operation: OperationKind,
        message: String,
    },

    #[error("Failed to normalize {operation} output: {message}")]
    Normalize {
        operation: OperationKind,
        message: String,
    },

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl RepoError {
    pub fn operation_failed(operation: OperationKind, exit_code: i32) -> Self {
        Self::OperationFailed {
            operation,
            exit_code,
        }
    }

    pub fn credential_check_failed(exit_code: i32, help: impl Into<String>) -> Self {
        Self::CredentialCheckFailed {
            exit_code,
            help: help.into(),
        }
    }

    pub fn directory_error(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Directory {
            message: message.into(),
            path,
            source: None,
        }
    }

    pub fn directory_error_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Directory {
            message: message.into(),
            path,
            source: Some(source),
        }
    }

    pub fn directory_missing(path: impl Into<PathBuf>) -> Self {
        Self::DirectoryMissing { path: path.into() }
    }

    pub fn invalid_location(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::InvalidLocation {
            message: message.into(),
            path: path.into(),
        }
    }

    pub fn invalid_url(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::InvalidUrl {
            message: message.into(),
            url: url.into(),
        }
    }

    pub fn invalid_request(operation: OperationKind, message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            operation,
            message: message.into(),
        }
    }

    pub fn normalize_error(operation: OperationKind, message: impl Into<String>) -> Self {
        Self::Normalize {
            operation,
            message: message.into(),
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    pub fn config_error_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Operation the error belongs to, when it came out of the command pipeline
    pub fn operation(&self) -> Option<OperationKind> {
        match self {
            Self::OperationFailed { operation, .. }
            | Self::InvalidRequest { operation, .. }
            | Self::Normalize { operation, .. } => Some(*operation),
            Self::CredentialCheckFailed { .. } => Some(OperationKind::CheckCredentials),
            _ => None,
        }
    }

    /// Exit code of the failed child process, if any
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::OperationFailed { exit_code, .. }
            | Self::CredentialCheckFailed { exit_code, .. } => Some(*exit_code),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RepoError {
    fn from(error: std::io::Error) -> Self {
        Self::directory_error_with_source("File system operation failed", None, error)
    }
}

impl From<serde_yaml::Error> for RepoError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::config_error_with_source("YAML deserialization failed", error)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(error: serde_json::Error) -> Self {
        Self::config_error_with_source("JSON serialization failed", error)
    }
}
