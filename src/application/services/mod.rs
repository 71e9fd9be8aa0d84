pub mod error_classifier;
pub mod normalizer;
pub mod repos_service;

pub use error_classifier::{Classified, ClassifiedResult, ErrorClassifier};
pub use normalizer::{from_fn, CommitHistory, Identity, LineCount, NormalizeError, Normalizer, StatusMap};
pub use repos_service::RepoService;
