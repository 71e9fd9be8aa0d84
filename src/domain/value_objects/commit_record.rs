use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of the repository history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Abbreviated commit hash
    pub hash: String,
    /// Author time
    pub timestamp: DateTime<Utc>,
    /// Author date as git printed it
    pub date: String,
    /// Subject line
    pub message: String,
}
