#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

pub mod backend;
pub mod config;
pub mod error;
pub mod sink;
pub mod types;

// Re-exports
pub use backend::{ChatBackend, Finish, StreamOutcome};
pub use config::ChatConfig;
pub use error::ChatError;
pub use sink::DeltaSink;
pub use tokio_util::sync::CancellationToken;
pub use types::*;
