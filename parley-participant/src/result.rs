//! The structured result handed back to the host.

use parley_core::ChatError;
use serde::Serialize;

/// Outcome of one participant request.
///
/// Serialized in camelCase, the shape chat hosts expect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResult {
    /// Set when the request failed; the diagnostic was already rendered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<ErrorDetails>,
    /// Bookkeeping for the host.
    pub metadata: ResultMetadata,
}

/// Failure summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetails {
    /// Human-readable error message.
    pub message: String,
}

/// Request metadata echoed back to the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMetadata {
    /// Slash command used, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Whether the reply was cut short by cancellation.
    pub cancelled: bool,
}

impl ChatResult {
    /// Whether the request failed.
    pub fn is_error(&self) -> bool {
        self.error_details.is_some()
    }
}

/// Render `err` as a markdown diagnostic with remediation hints.
pub fn render_error(err: &ChatError) -> String {
    let mut text = format!("**Error:** {err}\n\nPlease check that:\n");
    text.push_str("- the model backend is running and reachable\n");
    text.push_str("- the endpoint setting points at its chat-completions URL\n");
    text.push_str("- the API key is correct, if the backend requires one\n");
    if let Some(hint) = specific_hint(err) {
        text.push('\n');
        text.push_str(hint);
        text.push('\n');
    }
    text
}

fn specific_hint(err: &ChatError) -> Option<&'static str> {
    match err {
        ChatError::Authentication { .. } => Some("The backend rejected the API key."),
        ChatError::ModelNotFound { .. } => {
            Some("The endpoint or model was not found; check `PARLEY_MODEL` and the URL path.")
        }
        ChatError::RateLimited { .. } => {
            Some("The backend is rate limiting requests; try again shortly.")
        }
        ChatError::Network(_) => {
            Some("Could not connect; is the server listening on that address?")
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_result_serializes_without_error() {
        let result = ChatResult {
            error_details: None,
            metadata: ResultMetadata {
                command: Some("fix".into()),
                cancelled: false,
            },
        };
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({"metadata": {"command": "fix", "cancelled": false}})
        );
    }

    #[test]
    fn error_result_serializes_camel_case() {
        let result = ChatResult {
            error_details: Some(ErrorDetails {
                message: "boom".into(),
            }),
            metadata: ResultMetadata::default(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["errorDetails"]["message"], "boom");
        assert!(result.is_error());
    }

    #[test]
    fn render_includes_message_and_hints() {
        let err = ChatError::Http {
            status: 418,
            body: "teapot".into(),
        };
        let text = render_error(&err);
        assert!(text.contains("HTTP 418: teapot"));
        assert!(text.contains("backend is running"));
        assert!(text.contains("endpoint"));
        assert!(text.contains("API key"));
    }

    #[test]
    fn render_adds_specific_hint_for_auth() {
        let err = ChatError::Authentication {
            status: 401,
            body: String::new(),
        };
        assert!(render_error(&err).contains("rejected the API key"));
    }

    #[test]
    fn render_shows_rate_limit_text() {
        let err = ChatError::RateLimited {
            status: 429,
            body: "quota exhausted for org-42".into(),
            retry_after: None,
        };
        let text = render_error(&err);
        assert!(text.contains("quota exhausted for org-42"));
        assert!(text.contains("rate limiting"));
    }
}
