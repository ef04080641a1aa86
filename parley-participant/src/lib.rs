#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

pub mod command;
pub mod config;
pub mod history;
pub mod participant;
pub mod result;

pub use command::{Command, HELP_TEXT};
pub use config::ParticipantConfig;
pub use history::{HistoryTurn, ResponsePart};
pub use participant::{Participant, PromptRequest};
pub use result::{ChatResult, ErrorDetails, ResultMetadata, render_error};
