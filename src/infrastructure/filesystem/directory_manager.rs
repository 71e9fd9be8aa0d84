use std::io::ErrorKind;
use std::path::Path;
use tokio::fs as async_fs;
use tracing::{debug, info};

use crate::common::error::RepoError;
use crate::common::result::{RepoResult, ResultExt};
use crate::domain::entities::service_config::RemovalPolicy;

/// Creates and empties the directories that back working copies
///
/// Independent of the process runner. Every check-then-act here is best effort:
/// a directory changed by someone else between the check and the act surfaces as
/// an ordinary directory error, or is ignored when the end state is already met.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryManager {
    policy: RemovalPolicy,
}

impl DirectoryManager {
    pub fn new(policy: RemovalPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> RemovalPolicy {
        self.policy
    }

    /// Create `path` and its parents unless it already is a directory
    pub async fn ensure_directory(&self, path: &Path) -> RepoResult<()> {
        Self::reject_empty(path)?;

        match async_fs::metadata(path).await {
            Ok(metadata) if metadata.is_dir() => {
                debug!("Directory already exists: {}", path.display());
                Ok(())
            }
            Ok(_) => Err(RepoError::directory_error(
                format!("'{}' exists but is not a directory", path.display()),
                Some(path.to_path_buf()),
            )),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                async_fs::create_dir_all(path).await.with_directory_error(
                    format!("Failed to create directory '{}'", path.display()),
                    Some(path.to_path_buf()),
                )?;
                info!("Created directory: {}", path.display());
                Ok(())
            }
            Err(e) => Err(RepoError::directory_error_with_source(
                format!("Failed to inspect '{}'", path.display()),
                Some(path.to_path_buf()),
                e,
            )),
        }
    }

    /// Remove everything inside `path`, keeping `path` itself
    ///
    /// Symlinks are removed, never followed. A missing directory is handled by
    /// the configured [`RemovalPolicy`].
    pub async fn remove_directory_contents(&self, path: &Path) -> RepoResult<()> {
        Self::reject_empty(path)?;

        match async_fs::metadata(path).await {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => {
                return Err(RepoError::directory_error(
                    format!("'{}' exists but is not a directory", path.display()),
                    Some(path.to_path_buf()),
                ))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return match self.policy {
                    RemovalPolicy::Tolerant => {
                        debug!("Nothing to remove, {} does not exist", path.display());
                        Ok(())
                    }
                    RemovalPolicy::Strict => Err(RepoError::directory_missing(path)),
                };
            }
            Err(e) => {
                return Err(RepoError::directory_error_with_source(
                    format!("Failed to inspect '{}'", path.display()),
                    Some(path.to_path_buf()),
                    e,
                ))
            }
        }

        let mut entries = async_fs::read_dir(path).await.with_directory_error(
            format!("Failed to read directory '{}'", path.display()),
            Some(path.to_path_buf()),
        )?;

        let mut removed = 0usize;
        while let Some(entry) = entries.next_entry().await.with_directory_error(
            format!("Failed to read directory '{}'", path.display()),
            Some(path.to_path_buf()),
        )? {
            let entry_path = entry.path();
            let file_type = match entry.file_type().await {
                Ok(file_type) => file_type,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(RepoError::directory_error_with_source(
                        format!("Failed to inspect '{}'", entry_path.display()),
                        Some(entry_path),
                        e,
                    ))
                }
            };

            let result = if file_type.is_dir() {
                async_fs::remove_dir_all(&entry_path).await
            } else {
                async_fs::remove_file(&entry_path).await
            };

            match result {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(RepoError::directory_error_with_source(
                        format!("Failed to remove '{}'", entry_path.display()),
                        Some(entry_path),
                        e,
                    ))
                }
            }
        }

        info!("Removed {} entries from {}", removed, path.display());
        Ok(())
    }

    fn reject_empty(path: &Path) -> RepoResult<()> {
        if path.as_os_str().is_empty() {
            return Err(RepoError::directory_error("empty directory path", None));
        }
        Ok(())
    }
}
