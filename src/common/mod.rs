/// Error type and result helpers shared by every layer
pub mod error;
pub mod result;
