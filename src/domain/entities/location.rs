use crate::common::error::RepoError;
use crate::common::result::RepoResult;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Where a repository lives on disk
///
/// Either a single root path, or a base directory plus a subpath relative to it.
/// Both forms must resolve to one absolute path before a command is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    base: Option<PathBuf>,
    path: PathBuf,
}

impl RepositoryLocation {
    /// Location given by its root path
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            base: None,
            path: root.into(),
        }
    }

    /// Location split into an absolute base directory and a relative subpath
    pub fn within(base: impl Into<PathBuf>, relative: impl Into<PathBuf>) -> Self {
        Self {
            base: Some(base.into()),
            path: relative.into(),
        }
    }

    pub fn base(&self) -> Option<&Path> {
        self.base.as_deref()
    }

    /// The root path, or the subpath when the location is split
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_split(&self) -> bool {
        self.base.is_some()
    }

    /// Resolve to the absolute data directory
    pub fn resolve(&self) -> RepoResult<PathBuf> {
        if self.path.as_os_str().is_empty() {
            return Err(RepoError::invalid_location("empty path", &self.path));
        }

        match &self.base {
            Some(base) => {
                if !base.is_absolute() {
                    return Err(RepoError::invalid_location(
                        "base directory must be absolute",
                        base,
                    ));
                }
                Self::validate_relative(&self.path)?;
                Ok(base.join(&self.path))
            }
            None => {
                if !self.path.is_absolute() {
                    return Err(RepoError::invalid_location(
                        "repository path must be absolute",
                        &self.path,
                    ));
                }
                Ok(self.path.clone())
            }
        }
    }

    fn validate_relative(relative: &Path) -> RepoResult<()> {
        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir => {
                    return Err(RepoError::invalid_location(
                        "subpath must not leave the base directory",
                        relative,
                    ))
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(RepoError::invalid_location(
                        "subpath must be relative",
                        relative,
                    ))
                }
            }
        }
        Ok(())
    }
}

impl From<PathBuf> for RepositoryLocation {
    fn from(root: PathBuf) -> Self {
        Self::new(root)
    }
}

impl From<&Path> for RepositoryLocation {
    fn from(root: &Path) -> Self {
        Self::new(root)
    }
}
