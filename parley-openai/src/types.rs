//! Chat-completions response frames.
//!
//! One shape covers both a streamed `data:` frame and a non-streaming
//! response body. Every field is optional on the wire, so absent fields
//! deserialize to `None`/empty instead of failing the frame.

use serde::Deserialize;

/// A decoded stream frame, or a whole non-streaming response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamFrame {
    /// Completion identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Generated choices; only the first is consulted.
    #[serde(default)]
    pub choices: Vec<FrameChoice>,
}

/// One choice within a frame.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrameChoice {
    /// Incremental content (streaming).
    #[serde(default)]
    pub delta: Option<FrameContent>,
    /// Whole message (non-streaming).
    #[serde(default)]
    pub message: Option<FrameContent>,
    /// Why generation stopped, once it has.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// The `content` carrier shared by `delta` and `message`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrameContent {
    /// Text, absent for role-only or tool-call frames.
    #[serde(default)]
    pub content: Option<String>,
}

impl StreamFrame {
    /// `choices[0].delta.content`, when present and non-empty.
    pub fn delta_text(&self) -> Option<&str> {
        self.choices
            .first()?
            .delta
            .as_ref()?
            .content
            .as_deref()
            .filter(|text| !text.is_empty())
    }

    /// `choices[0].message.content`, or `""` when absent.
    pub fn message_text(&self) -> &str {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
            .unwrap_or_default()
    }

    /// `choices[0].finish_reason`.
    pub fn finish_reason(&self) -> Option<&str> {
        self.choices.first()?.finish_reason.as_deref()
    }
}
