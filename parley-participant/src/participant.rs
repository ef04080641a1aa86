//! The participant: one chat request in, one [`ChatResult`] out.

use parley_core::{CancellationToken, ChatBackend, ChatError, DeltaSink, Message};

use crate::command::{Command, HELP_TEXT};
use crate::config::ParticipantConfig;
use crate::history::{HistoryTurn, replay};
use crate::result::{ChatResult, ErrorDetails, ResultMetadata, render_error};

/// The latest user input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptRequest {
    /// Text the user typed, without the command keyword.
    pub prompt: String,
    /// Command keyword (`explain`, `fix`, `generate`, `help`, ...), if any.
    pub command: Option<String>,
}

impl PromptRequest {
    /// A plain prompt without a command.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            command: None,
        }
    }

    /// Attach a command keyword.
    #[must_use]
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }
}

/// A chat participant backed by `B`.
///
/// Generic over `B: ChatBackend` (not object-safe).
pub struct Participant<B: ChatBackend> {
    backend: B,
    config: ParticipantConfig,
}

impl<B: ChatBackend> Participant<B> {
    /// Create a participant with a backend and configuration.
    pub fn new(backend: B, config: ParticipantConfig) -> Self {
        Self { backend, config }
    }

    /// The backend requests are sent to.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Assemble the conversation sent upstream for `request`.
    ///
    /// System priming first, then `history` in order, then the latest
    /// prompt, rewritten when its command carries an instruction.
    pub fn build_messages(
        &self,
        request: &PromptRequest,
        history: &[HistoryTurn],
    ) -> Vec<Message> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(self.config.system_prompt.clone()));
        messages.extend(replay(history));

        let prompt = match request.command.as_deref().and_then(Command::parse) {
            Some(command) => command.rewrite(&request.prompt),
            None => request.prompt.clone(),
        };
        messages.push(Message::user(prompt));
        messages
    }

    /// Handle one request, writing the reply (or a diagnostic) to `sink`.
    ///
    /// `/help` is answered locally. Backend errors are rendered into the
    /// sink and reported in [`ChatResult::error_details`]; they are never
    /// returned as `Err`.
    pub async fn handle<K>(
        &self,
        request: &PromptRequest,
        history: &[HistoryTurn],
        sink: &mut K,
        cancel: &CancellationToken,
    ) -> ChatResult
    where
        K: DeltaSink + ?Sized,
    {
        let command = request.command.as_deref().and_then(Command::parse);
        let mut result = ChatResult {
            error_details: None,
            metadata: ResultMetadata {
                command: request.command.clone(),
                cancelled: false,
            },
        };

        if command == Some(Command::Help) {
            sink.push(HELP_TEXT);
            return result;
        }

        let messages = self.build_messages(request, history);
        tracing::debug!(
            messages = messages.len(),
            command = command.map(Command::name),
            stream = self.config.stream,
            "handling chat request"
        );

        let outcome = if self.config.stream {
            self.backend
                .stream_chat(messages, &mut *sink, cancel)
                .await
                .map(|outcome| outcome.is_cancelled())
        } else {
            self.complete_once(messages, &mut *sink, cancel).await
        };

        match outcome {
            Ok(cancelled) => result.metadata.cancelled = cancelled,
            Err(err) => {
                tracing::warn!(error = %err, "chat request failed");
                sink.push(&render_error(&err));
                result.error_details = Some(ErrorDetails {
                    message: err.to_string(),
                });
            }
        }
        result
    }

    /// Non-streaming path: one request, one sink write. Returns whether the
    /// request was cancelled.
    async fn complete_once<K>(
        &self,
        messages: Vec<Message>,
        sink: &mut K,
        cancel: &CancellationToken,
    ) -> Result<bool, ChatError>
    where
        K: DeltaSink + ?Sized,
    {
        if cancel.is_cancelled() {
            return Ok(true);
        }
        let text = tokio::select! {
            biased;
            () = cancel.cancelled() => return Ok(true),
            text = self.backend.complete_chat(messages) => text?,
        };
        if !text.is_empty() {
            sink.push(&text);
        }
        Ok(false)
    }
}
