//! The [`ChatBackend`] trait and the result of a streamed reply.
//!
//! The trait uses RPITIT (return-position `impl Trait` in traits) and is
//! not object-safe. Orchestration is generic over `B: ChatBackend`.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::ChatError;
use crate::sink::DeltaSink;
use crate::types::Message;

/// Why a streamed reply stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finish {
    /// The server sent its end-of-stream marker.
    Done,
    /// The connection closed without a marker.
    EndOfStream,
    /// The caller's cancellation token fired.
    Cancelled,
}

/// Summary of a streamed reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamOutcome {
    /// Number of deltas pushed to the sink.
    pub delivered: usize,
    /// Why the read loop stopped.
    pub finish: Finish,
    /// Last `finish_reason` reported by the server, if any.
    pub finish_reason: Option<String>,
}

impl StreamOutcome {
    /// Outcome of a request cancelled before anything was delivered.
    pub fn cancelled() -> Self {
        Self {
            delivered: 0,
            finish: Finish::Cancelled,
            finish_reason: None,
        }
    }

    /// Whether the reply was cut short by cancellation.
    pub fn is_cancelled(&self) -> bool {
        self.finish == Finish::Cancelled
    }
}

/// A chat-completion backend.
pub trait ChatBackend: Send + Sync {
    /// Stream a reply, pushing each text delta to `sink` as it arrives.
    ///
    /// Cancelling `cancel` ends the request promptly and is not an error.
    fn stream_chat<K>(
        &self,
        messages: Vec<Message>,
        sink: &mut K,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<StreamOutcome, ChatError>> + Send
    where
        K: DeltaSink + ?Sized;

    /// Request a reply without streaming and return its full text.
    fn complete_chat(
        &self,
        messages: Vec<Message>,
    ) -> impl Future<Output = Result<String, ChatError>> + Send;
}
