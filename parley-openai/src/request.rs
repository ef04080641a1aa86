//! Outbound request construction.
//!
//! Pure: no I/O happens here, so the exact URL, headers and body can be
//! checked without a server.

use parley_core::{ChatConfig, ChatError, ChatRequest, Message};

/// `content-type` header name.
pub const CONTENT_TYPE: &str = "content-type";
/// `authorization` header name.
pub const AUTHORIZATION: &str = "authorization";

/// Everything needed to send one chat-completions request.
#[derive(Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    /// Endpoint URL.
    pub url: String,
    /// Header name/value pairs, in send order.
    pub headers: Vec<(&'static str, String)>,
    /// Serialized JSON body.
    pub body: String,
    /// Whether the body asks for a streamed reply.
    pub streaming: bool,
}

impl RequestDescriptor {
    /// Value of the named header, if set.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Turn the descriptor into a `reqwest` request on `client`.
    pub(crate) fn into_reqwest(self, client: &reqwest::Client) -> reqwest::RequestBuilder {
        let mut builder = client.post(&self.url);
        for (name, value) in &self.headers {
            builder = builder.header(*name, value);
        }
        builder.body(self.body)
    }
}

impl std::fmt::Debug for RequestDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(name, value)| {
                if *name == AUTHORIZATION {
                    (*name, "Bearer [REDACTED]")
                } else {
                    (*name, value.as_str())
                }
            })
            .collect();
        f.debug_struct("RequestDescriptor")
            .field("url", &self.url)
            .field("headers", &headers)
            .field("body", &self.body)
            .field("streaming", &self.streaming)
            .finish()
    }
}

/// Build a chat-completions request for `messages`.
///
/// The body is `{model, messages, stream}`. An `authorization: Bearer`
/// header is added only when `config.api_key` is non-empty.
pub fn build_request(
    config: &ChatConfig,
    messages: &[Message],
    streaming: bool,
) -> Result<RequestDescriptor, ChatError> {
    let body = ChatRequest {
        model: config.model.clone(),
        messages: messages.to_vec(),
        stream: streaming,
    };
    let body = serde_json::to_string(&body)
        .map_err(|e| ChatError::InvalidRequest(format!("failed to serialize body: {e}")))?;

    let mut headers = vec![(CONTENT_TYPE, "application/json".to_string())];
    if !config.api_key.is_empty() {
        headers.push((AUTHORIZATION, format!("Bearer {}", config.api_key)));
    }

    Ok(RequestDescriptor {
        url: config.endpoint.clone(),
        headers,
        body,
        streaming,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages() -> Vec<Message> {
        vec![
            Message::system("You are terse."),
            Message::user("first"),
            Message::assistant("reply"),
            Message::user("second"),
        ]
    }

    #[test]
    fn omits_authorization_without_key() {
        let config = ChatConfig::default();
        let request = build_request(&config, &messages(), true).unwrap();
        assert_eq!(request.header(CONTENT_TYPE), Some("application/json"));
        assert_eq!(request.header(AUTHORIZATION), None);
        assert_eq!(request.headers.len(), 1);
    }

    #[test]
    fn includes_bearer_with_key() {
        let config = ChatConfig::default().api_key("sk-123");
        let request = build_request(&config, &messages(), true).unwrap();
        assert_eq!(request.header("Authorization"), Some("Bearer sk-123"));
        assert_eq!(request.header(CONTENT_TYPE), Some("application/json"));
    }

    #[test]
    fn key_only_changes_headers() {
        let without = build_request(&ChatConfig::default(), &messages(), true).unwrap();
        let with = build_request(&ChatConfig::default().api_key("k"), &messages(), true).unwrap();
        assert_eq!(without.url, with.url);
        assert_eq!(without.body, with.body);
        assert_eq!(without.streaming, with.streaming);
    }

    #[test]
    fn body_preserves_message_order() {
        let config = ChatConfig::default().model("local-model");
        let request = build_request(&config, &messages(), false).unwrap();
        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(body["model"], "local-model");
        assert_eq!(body["stream"], false);
        let contents: Vec<&str> = body["messages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["content"].as_str().unwrap())
            .collect();
        assert_eq!(contents, vec!["You are terse.", "first", "reply", "second"]);
        assert_eq!(body["messages"][2]["role"], "assistant");
    }

    #[test]
    fn deterministic() {
        let config = ChatConfig::default().api_key("k");
        let a = build_request(&config, &messages(), true).unwrap();
        let b = build_request(&config, &messages(), true).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn url_is_endpoint() {
        let config = ChatConfig::default().endpoint("http://127.0.0.1:5000/v1/chat/completions");
        let request = build_request(&config, &[], true).unwrap();
        assert_eq!(request.url, "http://127.0.0.1:5000/v1/chat/completions");
        assert!(request.streaming);
    }

    #[test]
    fn debug_redacts_authorization() {
        let config = ChatConfig::default().api_key("sk-secret");
        let request = build_request(&config, &[], true).unwrap();
        let rendered = format!("{request:?}");
        assert!(!rendered.contains("sk-secret"));
    }
}
