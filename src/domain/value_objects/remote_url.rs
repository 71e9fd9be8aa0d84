use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq)]
pub enum RemoteUrlError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("Missing repository path")]
    MissingRepoPath,

    #[error("Invalid characters in URL: {0}")]
    InvalidCharacters(String),

    #[error("URL injection attempt detected: {0}")]
    UrlInjectionAttempt(String),
}

fn scp_like_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:([A-Za-z0-9._-]+)@)?([A-Za-z0-9.-]+):([^/\\].*)$")
            .expect("scp-like remote pattern is valid")
    })
}

/// Remote a repository is cloned from
///
/// Keeps the caller's spelling verbatim so git receives exactly what it was given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RemoteUrl {
    raw: String,
    host: String,
    repo_path: String,
}

impl RemoteUrl {
    pub fn new(url: &str) -> Result<Self, RemoteUrlError> {
        Self::validate_security(url)?;

        if let Some((host, repo_path)) = Self::parse_scp_like(url) {
            return Ok(Self {
                raw: url.to_string(),
                host,
                repo_path,
            });
        }

        let (host, repo_path) = Self::parse_url(url)?;
        Ok(Self {
            raw: url.to_string(),
            host,
            repo_path,
        })
    }

    fn validate_security(url: &str) -> Result<(), RemoteUrlError> {
        if url.is_empty() {
            return Err(RemoteUrlError::InvalidFormat("Empty URL".to_string()));
        }

        // would be read by git as an option
        if url.starts_with('-') {
            return Err(RemoteUrlError::UrlInjectionAttempt(
                "URL must not start with '-'".to_string(),
            ));
        }

        for ch in url.chars() {
            if ch.is_control() || ch.is_whitespace() {
                return Err(RemoteUrlError::InvalidCharacters(format!(
                    "Unexpected character: {:?}",
                    ch
                )));
            }
        }

        Ok(())
    }

    fn parse_scp_like(url: &str) -> Option<(String, String)> {
        if url.contains("://") {
            return None;
        }
        let captures = scp_like_pattern().captures(url)?;
        let host = captures.get(2)?.as_str().to_string();
        let path = captures.get(3)?.as_str();
        Some((host, Self::trim_repo_path(path)))
    }

    fn parse_url(url: &str) -> Result<(String, String), RemoteUrlError> {
        let parsed = Url::parse(url).map_err(|_| RemoteUrlError::InvalidFormat(url.to_string()))?;

        let scheme = parsed.scheme();
        if !matches!(scheme, "https" | "http" | "ssh" | "git" | "file") {
            return Err(RemoteUrlError::UnsupportedScheme(scheme.to_string()));
        }

        let host = match parsed.host_str() {
            Some(host) => host.to_string(),
            None if scheme == "file" => String::new(),
            None => return Err(RemoteUrlError::MissingHost),
        };

        let path = parsed.path();
        if path.is_empty() || path == "/" {
            return Err(RemoteUrlError::MissingRepoPath);
        }

        Ok((host, Self::trim_repo_path(path.trim_start_matches('/'))))
    }

    fn trim_repo_path(path: &str) -> String {
        path.strip_suffix(".git").unwrap_or(path).to_string()
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Repository path without a trailing `.git`, e.g. `VS-work/ddf--ws-testing`
    pub fn repo_path(&self) -> &str {
        &self.repo_path
    }

    /// Last path segment, the directory name git picks by default
    pub fn repo_name(&self) -> &str {
        self.repo_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.repo_path)
    }
}

impl fmt::Display for RemoteUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl TryFrom<String> for RemoteUrl {
    type Error = RemoteUrlError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<RemoteUrl> for String {
    fn from(url: RemoteUrl) -> Self {
        url.raw
    }
}

impl std::str::FromStr for RemoteUrl {
    type Err = RemoteUrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
