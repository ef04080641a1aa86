//! Prior turns handed over by the host, and their replay as messages.

use parley_core::Message;

/// One prior turn of the chat, as the host recorded it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryTurn {
    /// Something the user asked.
    Request {
        /// The prompt exactly as typed.
        prompt: String,
        /// Slash command used, if any.
        command: Option<String>,
    },
    /// What the participant answered.
    Response {
        /// Rendered parts of the answer.
        parts: Vec<ResponsePart>,
    },
}

/// A rendered piece of a prior response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponsePart {
    /// Markdown text.
    Markdown(String),
    /// A link to a file or symbol.
    Reference {
        /// Target URI.
        uri: String,
    },
    /// Transient progress message.
    Progress(String),
    /// A clickable command button.
    CommandButton {
        /// Button label.
        title: String,
    },
}

impl HistoryTurn {
    /// A request turn without a command.
    pub fn request(prompt: impl Into<String>) -> Self {
        HistoryTurn::Request {
            prompt: prompt.into(),
            command: None,
        }
    }

    /// A response turn consisting of one markdown part.
    pub fn markdown(text: impl Into<String>) -> Self {
        HistoryTurn::Response {
            parts: vec![ResponsePart::Markdown(text.into())],
        }
    }

    /// Replay this turn as a message.
    ///
    /// Requests replay their prompt verbatim. Responses replay the
    /// concatenation of their markdown parts; a response without any text
    /// replays as `None`.
    pub fn to_message(&self) -> Option<Message> {
        match self {
            HistoryTurn::Request { prompt, .. } => Some(Message::user(prompt.clone())),
            HistoryTurn::Response { parts } => {
                let text: String = parts
                    .iter()
                    .filter_map(|part| match part {
                        ResponsePart::Markdown(text) => Some(text.as_str()),
                        _ => None,
                    })
                    .collect();
                (!text.is_empty()).then(|| Message::assistant(text))
            }
        }
    }
}

/// Replay `history` in order.
pub fn replay(history: &[HistoryTurn]) -> Vec<Message> {
    history.iter().filter_map(HistoryTurn::to_message).collect()
}
