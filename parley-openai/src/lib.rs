#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

pub mod client;
pub mod decoder;
pub mod delivery;
pub(crate) mod error;
pub mod request;
pub mod types;

pub use client::{DeltaStream, OpenAiCompatible};
pub use decoder::{StreamDecoder, decode_stream};
pub use delivery::deliver;
pub use request::{RequestDescriptor, build_request};
pub use types::StreamFrame;

// Re-export parley-core for convenience
pub use parley_core::{
    CancellationToken, ChatBackend, ChatConfig, ChatError, Finish, StreamOutcome,
};
