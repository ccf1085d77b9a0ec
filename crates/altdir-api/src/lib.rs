// Client for the remote directory backend (PostgREST-style table reads)
pub mod client;
pub mod error;
pub mod retry;
pub mod types;

// Re-export common types
pub use client::DirectoryClient;
pub use error::{ApiError, Result};
pub use retry::RetryConfig;
pub use types::{BusinessRecord, CategoryRecord};
