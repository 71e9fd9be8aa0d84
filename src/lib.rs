//! # repos-service - working copies of data repositories
//!
//! `repos-service` clones, synchronizes, inspects and tears down local working
//! copies of git repositories on behalf of an import tool. Every repository
//! operation is turned into one external `git` (or `ssh`, `wc`) process,
//! whose exit is classified as success, a benign condition, or a failure.
//!
//! ## Pipeline
//!
//! 1. [`CommandBuilder`](infrastructure::process::CommandBuilder) maps a request
//!    onto a command line, bound to an explicit `--git-dir`/`--work-tree` pair.
//! 2. A [`ProcessRunner`](infrastructure::process::ProcessRunner) runs it, blocking
//!    or in the background, silent or verbose.
//! 3. The [`ErrorClassifier`](application::services::ErrorClassifier) matches
//!    stderr of non-zero exits against an ordered list of allowed patterns.
//! 4. A [`Normalizer`](application::services::Normalizer) turns the stdout of a
//!    zero exit into a typed value.
//!
//! Directories backing the working copies are created and emptied by the
//! [`DirectoryManager`](infrastructure::filesystem::DirectoryManager), without
//! going through a process.
//!
//! ## Architecture
//!
//! - [`domain`]: requests, locations, configuration and value objects
//! - [`application`]: the [`RepoService`] facade, classifier and normalizers
//! - [`infrastructure`]: command building, process execution, filesystem, diagnostics
//! - [`common`]: shared error handling
//!
//! ## Examples
//!
//! ```rust,no_run
//! use repos_service::domain::entities::{RepositoryLocation, RequestOptions, ServiceConfig};
//! use repos_service::RepoService;
//!
//! # async fn example() -> repos_service::Result<()> {
//! let service = RepoService::new(ServiceConfig::default());
//! let location = RepositoryLocation::within("/home/import/repos", "VS-work/ddf--ws-testing/master");
//!
//! service.ensure_directory(&location.resolve()?).await?;
//! service
//!     .clone_repository(
//!         "git@github.com:VS-work/ddf--ws-testing.git",
//!         location.clone(),
//!         None,
//!         RequestOptions::default(),
//!     )
//!     .await?;
//!
//! let history = service.log(location.clone(), RequestOptions::default()).await?;
//! if let Some(latest) = history.first() {
//!     let changed = service
//!         .diff(location, &latest.hash, "HEAD", RequestOptions::default())
//!         .await?;
//!     println!("{} data files changed", changed.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - [`common::error::RepoError`]: main error type
//! - [`common::result::RepoResult`]: alias for `Result<T, RepoError>`
//!
//! Failure messages name the operation and exit code only; the captured output
//! goes to the [`DiagnosticsSink`](infrastructure::diagnostics::DiagnosticsSink).

#![deny(rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use crate::application::services::{Classified, ClassifiedResult, Normalizer};
pub use crate::application::RepoService;
pub use crate::common::error::RepoError;
pub use crate::common::result::RepoResult as Result;
