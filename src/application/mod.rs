/// Application layer
///
/// Orchestrates the command pipeline: build, run, classify, normalize.
pub mod services;

pub use services::repos_service::RepoService;
