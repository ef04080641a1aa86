//! Configuration for a [`Participant`](crate::Participant).

/// Default system prompt for coding assistance.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful coding assistant. \
Answer questions about code, explain concepts, and help with programming tasks. \
Use markdown code blocks for code.";

/// Static configuration for a participant.
#[derive(Debug, Clone)]
pub struct ParticipantConfig {
    /// Priming message sent first in every conversation.
    pub system_prompt: String,

    /// Stream the reply delta by delta. When false, the reply is fetched in
    /// one request and written to the sink once.
    pub stream: bool,
}

impl Default for ParticipantConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            stream: true,
        }
    }
}
