pub mod allowed_error;
pub mod commit_record;
pub mod execution_mode;
pub mod file_status;
pub mod remote_url;

pub use allowed_error::{AllowedErrorPattern, AllowedErrorPatterns};
pub use commit_record::CommitRecord;
pub use execution_mode::ExecutionMode;
pub use file_status::FileStatus;
pub use remote_url::{RemoteUrl, RemoteUrlError};
