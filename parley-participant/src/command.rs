//! Slash commands.

/// Help text written for `/help`. Never sent to the backend.
pub const HELP_TEXT: &str = "\
**Local model assistant**

Ask anything about your code, or use a command:

- `/explain` explain the selected code or a concept
- `/fix` find and fix bugs in the given code
- `/generate` write code from a description
- `/help` show this message

Requests go to the chat-completions endpoint set by `PARLEY_ENDPOINT`.
";

/// A recognized slash command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Explain code or a concept.
    Explain,
    /// Find and fix bugs.
    Fix,
    /// Generate code from a description.
    Generate,
    /// Show help locally.
    Help,
}

impl Command {
    /// Parse a command keyword, with or without a leading `/`.
    ///
    /// Returns `None` for unknown keywords; their prompts pass through
    /// unchanged.
    pub fn parse(keyword: &str) -> Option<Self> {
        match keyword.trim().trim_start_matches('/') {
            "explain" => Some(Command::Explain),
            "fix" => Some(Command::Fix),
            "generate" => Some(Command::Generate),
            "help" => Some(Command::Help),
            _ => None,
        }
    }

    /// Keyword as reported back in result metadata.
    pub fn name(self) -> &'static str {
        match self {
            Command::Explain => "explain",
            Command::Fix => "fix",
            Command::Generate => "generate",
            Command::Help => "help",
        }
    }

    /// Instruction prepended to the user's prompt, if this command has one.
    pub fn instruction(self) -> Option<&'static str> {
        match self {
            Command::Explain => {
                Some("Explain the following code or concept clearly and concisely:")
            }
            Command::Fix => Some(
                "Find and fix the bugs in the following code. Show the corrected code and explain what changed:",
            ),
            Command::Generate => Some(
                "Generate code for the following request. Reply with the code and a short explanation:",
            ),
            Command::Help => None,
        }
    }

    /// Apply this command's instruction to `prompt`.
    pub fn rewrite(self, prompt: &str) -> String {
        match self.instruction() {
            Some(instruction) => format!("{instruction}\n\n{prompt}"),
            None => prompt.to_string(),
        }
    }
}
