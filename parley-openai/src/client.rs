//! OpenAI-compatible chat-completions client.

use std::future::Future;
use std::pin::Pin;

use futures::{Stream, StreamExt};
use parley_core::{
    CancellationToken, ChatBackend, ChatConfig, ChatError, DeltaSink, Message, StreamOutcome,
};

use crate::decoder::decode_stream;
use crate::delivery::deliver;
use crate::error::{map_http_status, map_reqwest_error, retry_after_header};
use crate::request::build_request;
use crate::types::StreamFrame;

/// A lazily decoded stream of text deltas.
pub type DeltaStream = Pin<Box<dyn Stream<Item = Result<String, ChatError>> + Send>>;

/// Client for any server speaking the OpenAI chat-completions protocol
/// (vLLM, llama.cpp server, LM Studio, Ollama's OpenAI route, OpenAI itself).
///
/// Implements [`ChatBackend`].
///
/// # Example
///
/// ```no_run
/// use parley_core::ChatConfig;
/// use parley_openai::OpenAiCompatible;
///
/// let client = OpenAiCompatible::new(ChatConfig::default())
///     .endpoint("http://localhost:8000/v1/chat/completions")
///     .model("qwen2.5-coder");
/// ```
pub struct OpenAiCompatible {
    /// Endpoint, key and model.
    pub(crate) config: ChatConfig,
    /// Shared HTTP client (connection pool only, no per-request state).
    pub(crate) client: reqwest::Client,
}

impl OpenAiCompatible {
    /// Create a client for `config`.
    #[must_use]
    pub fn new(config: ChatConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Create a client configured from `PARLEY_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ChatConfig::from_env())
    }

    /// Override the endpoint URL.
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Override the API key. Empty disables the `Authorization` header.
    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = api_key.into();
        self
    }

    /// Override the model.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Use a preconfigured `reqwest` client (proxies, timeouts, TLS roots).
    #[must_use]
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Send the request and return the response if its status is a success.
    async fn send(
        &self,
        messages: &[Message],
        streaming: bool,
    ) -> Result<reqwest::Response, ChatError> {
        let request = build_request(&self.config, messages, streaming)?;

        tracing::debug!(
            url = %request.url,
            model = %self.config.model,
            messages = messages.len(),
            streaming,
            "sending chat request"
        );

        let response = request
            .into_reqwest(&self.client)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = retry_after_header(response.headers());
            let body_text = response.text().await.map_err(map_reqwest_error)?;
            return Err(map_http_status(status, &body_text, retry_after));
        }
        Ok(response)
    }

    /// Send a streaming request and return its deltas as a lazy stream.
    ///
    /// Dropping the returned stream closes the connection.
    pub async fn stream_deltas(&self, messages: Vec<Message>) -> Result<DeltaStream, ChatError> {
        let response = self.send(&messages, true).await?;
        if response.content_length() == Some(0) {
            return Err(ChatError::MissingBody);
        }
        let bytes = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(map_reqwest_error));
        Ok(Box::pin(decode_stream(bytes)))
    }
}

impl ChatBackend for OpenAiCompatible {
    /// Stream a reply into `sink`.
    ///
    /// The token is raced against the response headers as well as every
    /// body read, so cancelling at any point returns promptly with
    /// [`Finish::Cancelled`](parley_core::Finish::Cancelled).
    fn stream_chat<K>(
        &self,
        messages: Vec<Message>,
        sink: &mut K,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<StreamOutcome, ChatError>> + Send
    where
        K: DeltaSink + ?Sized,
    {
        async move {
            if cancel.is_cancelled() {
                return Ok(StreamOutcome::cancelled());
            }

            let response = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    tracing::debug!("chat request cancelled before response headers");
                    return Ok(StreamOutcome::cancelled());
                }
                response = self.send(&messages, true) => response?,
            };

            if response.content_length() == Some(0) {
                return Err(ChatError::MissingBody);
            }

            let bytes = response
                .bytes_stream()
                .map(|chunk| chunk.map_err(map_reqwest_error));
            deliver(bytes, sink, cancel).await
        }
    }

    /// Request a reply with streaming disabled and return
    /// `choices[0].message.content`, or `""` when there is none.
    fn complete_chat(
        &self,
        messages: Vec<Message>,
    ) -> impl Future<Output = Result<String, ChatError>> + Send {
        async move {
            let response = self.send(&messages, false).await?;
            let response_text = response.text().await.map_err(map_reqwest_error)?;
            let frame: StreamFrame = serde_json::from_str(&response_text)
                .map_err(|e| ChatError::InvalidResponse(format!("invalid JSON response: {e}")))?;
            Ok(frame.message_text().to_string())
        }
    }
}
