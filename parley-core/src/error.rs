//! Errors surfaced by chat backends.

use std::time::Duration;
use thiserror::Error;

/// Errors from a chat request.
///
/// Malformed stream frames and cancellation are never reported through this
/// type: the former are dropped by the decoder, the latter ends the request
/// cleanly with [`Finish::Cancelled`](crate::Finish::Cancelled).
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ChatError {
    /// The endpoint rejected the credentials (401/403).
    #[error("authentication failed (HTTP {status}): {body}")]
    Authentication {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// The endpoint or model does not exist (404).
    #[error("not found (HTTP {status}): {body}")]
    ModelNotFound {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// The endpoint rate-limited the request (429).
    #[error("rate limited (HTTP {status}): {body}")]
    RateLimited {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
        /// Delay suggested by the server, if it gave one.
        retry_after: Option<Duration>,
    },

    /// The backend is failing or overloaded (5xx).
    #[error("service unavailable (HTTP {status}): {body}")]
    ServiceUnavailable {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// Any other non-success status.
    #[error("HTTP {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// Connection refused, reset, DNS failure and similar.
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The request hit a timeout set on the HTTP client.
    #[error("request timed out: {0}")]
    Timeout(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A successful response carried no body to read from.
    #[error("response has no body")]
    MissingBody,

    /// The request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The response body could not be understood.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ChatError {
    /// Whether retrying this request might succeed.
    ///
    /// Nothing in parley retries automatically; this is for callers.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ChatError::RateLimited { .. }
                | ChatError::ServiceUnavailable { .. }
                | ChatError::Network(_)
                | ChatError::Timeout(_)
        )
    }

    /// HTTP status code, when the error came from a non-success response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ChatError::Authentication { status, .. }
            | ChatError::ModelNotFound { status, .. }
            | ChatError::RateLimited { status, .. }
            | ChatError::ServiceUnavailable { status, .. }
            | ChatError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate_limited(body: &str) -> ChatError {
        ChatError::RateLimited {
            status: 429,
            body: body.into(),
            retry_after: None,
        }
    }

    #[test]
    fn display_carries_status_and_text() {
        let err = ChatError::Http {
            status: 418,
            body: "teapot".into(),
        };
        assert_eq!(err.to_string(), "HTTP 418: teapot");

        let err = ChatError::Authentication {
            status: 401,
            body: "bad key".into(),
        };
        assert_eq!(err.to_string(), "authentication failed (HTTP 401): bad key");
    }

    #[test]
    fn rate_limited_display_keeps_body() {
        let err = rate_limited("quota exhausted for org-42");
        assert_eq!(
            err.to_string(),
            "rate limited (HTTP 429): quota exhausted for org-42"
        );
    }

    #[test]
    fn retryable_classification() {
        assert!(rate_limited("slow down").is_retryable());
        assert!(ChatError::Timeout("deadline elapsed".into()).is_retryable());
        assert!(
            ChatError::ServiceUnavailable {
                status: 503,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(!ChatError::MissingBody.is_retryable());
        assert!(
            !ChatError::Authentication {
                status: 401,
                body: String::new()
            }
            .is_retryable()
        );
    }

    #[test]
    fn status_accessor() {
        assert_eq!(
            ChatError::ModelNotFound {
                status: 404,
                body: String::new()
            }
            .status(),
            Some(404)
        );
        assert_eq!(rate_limited("").status(), Some(429));
        assert_eq!(ChatError::MissingBody.status(), None);
    }
}
