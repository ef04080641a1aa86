//! Mapping of HTTP statuses and transport failures to [`ChatError`].

use std::time::Duration;

use parley_core::ChatError;
use reqwest::header::{HeaderMap, RETRY_AFTER};

/// Map a non-success status and its body text to a [`ChatError`].
///
/// `retry_after` is the delay from the response's `Retry-After` header;
/// for 429s without one, a "retry after N" hint in the body is used.
pub(crate) fn map_http_status(
    status: reqwest::StatusCode,
    body: &str,
    retry_after: Option<Duration>,
) -> ChatError {
    let code = status.as_u16();
    let body = body.to_string();
    match code {
        401 | 403 => ChatError::Authentication { status: code, body },
        404 => ChatError::ModelNotFound { status: code, body },
        429 => ChatError::RateLimited {
            retry_after: retry_after.or_else(|| retry_hint(&body)),
            status: code,
            body,
        },
        500..=599 => ChatError::ServiceUnavailable { status: code, body },
        _ => ChatError::Http { status: code, body },
    }
}

/// Delay from a `Retry-After: <seconds>` header. HTTP-date values are
/// not interpreted.
pub(crate) fn retry_after_header(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(RETRY_AFTER)?.to_str().ok()?;
    value.trim().parse().ok().map(Duration::from_secs)
}

/// Seconds named by a "retry after N" phrase in an error body.
fn retry_hint(body: &str) -> Option<Duration> {
    let lower = body.to_ascii_lowercase();
    let (_, after) = lower.split_once("retry after")?;
    let after = after.trim_start();
    let end = after
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(after.len());
    after[..end].parse().ok().map(Duration::from_secs)
}

/// Map a transport failure from `reqwest`.
pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ChatError {
    if err.is_timeout() {
        ChatError::Timeout(Box::new(err))
    } else {
        ChatError::Network(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use reqwest::header::HeaderValue;

    #[test]
    fn auth_statuses() {
        let err = map_http_status(StatusCode::UNAUTHORIZED, "Invalid API key", None);
        assert!(matches!(err, ChatError::Authentication { status: 401, .. }));
        let err = map_http_status(StatusCode::FORBIDDEN, "Forbidden", None);
        assert!(matches!(err, ChatError::Authentication { status: 403, .. }));
    }

    #[test]
    fn not_found_keeps_body() {
        let err = map_http_status(StatusCode::NOT_FOUND, "model 'x' not found", None);
        match err {
            ChatError::ModelNotFound { status, body } => {
                assert_eq!(status, 404);
                assert!(body.contains("model"));
            }
            other => panic!("expected ModelNotFound, got {other:?}"),
        }
    }

    #[test]
    fn rate_limit_keeps_status_and_text() {
        let err = map_http_status(
            StatusCode::TOO_MANY_REQUESTS,
            "quota exhausted for org-42",
            None,
        );
        assert_eq!(err.status(), Some(429));
        assert!(err.to_string().contains("quota exhausted for org-42"));
        assert!(matches!(
            err,
            ChatError::RateLimited {
                retry_after: None,
                ..
            }
        ));
    }

    #[test]
    fn rate_limit_delay_from_body_hint() {
        let err = map_http_status(
            StatusCode::TOO_MANY_REQUESTS,
            "Please retry after 60 seconds",
            None,
        );
        match err {
            ChatError::RateLimited { retry_after, .. } => {
                assert_eq!(retry_after, Some(Duration::from_secs(60)));
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn header_delay_wins_over_body_hint() {
        let err = map_http_status(
            StatusCode::TOO_MANY_REQUESTS,
            "retry after 60",
            Some(Duration::from_secs(5)),
        );
        match err {
            ChatError::RateLimited { retry_after, .. } => {
                assert_eq!(retry_after, Some(Duration::from_secs(5)));
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn retry_after_header_seconds_only() {
        let mut headers = HeaderMap::new();
        assert_eq!(retry_after_header(&headers), None);
        headers.insert(RETRY_AFTER, HeaderValue::from_static("12"));
        assert_eq!(retry_after_header(&headers), Some(Duration::from_secs(12)));
        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
        );
        assert_eq!(retry_after_header(&headers), None);
    }

    #[test]
    fn server_errors() {
        for status in [
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::BAD_GATEWAY,
            StatusCode::SERVICE_UNAVAILABLE,
        ] {
            let err = map_http_status(status, "down", None);
            assert!(matches!(err, ChatError::ServiceUnavailable { .. }));
            assert!(err.is_retryable());
        }
    }

    #[test]
    fn other_status_keeps_code_and_text() {
        let err = map_http_status(StatusCode::IM_A_TEAPOT, "I'm a teapot", None);
        assert_eq!(err.to_string(), "HTTP 418: I'm a teapot");
    }

    #[test]
    fn hint_absent() {
        assert_eq!(retry_hint("Generic error message"), None);
        assert_eq!(retry_hint("retry after a while"), None);
    }
}
