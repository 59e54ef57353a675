//! Slash commands and input limits

use std::path::PathBuf;

/// Hard cap on a message; longer input is cut
pub const MAX_INPUT_CHARS: usize = 5000;
/// Above this a length warning is shown
pub const WARN_INPUT_CHARS: usize = 4500;

/// One line of user input, interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/help`
    Help,
    /// `/prompts`
    Prompts,
    /// `/use <key>`; `None` when the key is missing
    Use(Option<String>),
    /// `/clear`
    Clear,
    /// `/export [dir]`
    Export(Option<PathBuf>),
    /// `/debug`
    Debug,
    /// `/status`
    Status,
    /// `/quit` or `/exit`
    Quit,
    /// An unrecognized slash command
    Unknown(String),
    /// Blank line
    Empty,
    /// Anything else is a message for the agent
    Send(String),
}

impl Command {
    /// Interpret a raw input line
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Command::Empty;
        }
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Command::Send(trimmed.to_string());
        };

        let mut parts = rest.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default().to_lowercase();
        let arg = parts
            .next()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string);

        match name.as_str() {
            "help" | "?" => Command::Help,
            "prompts" => Command::Prompts,
            "use" => Command::Use(arg),
            "clear" => Command::Clear,
            "export" => Command::Export(arg.map(PathBuf::from)),
            "debug" => Command::Debug,
            "status" => Command::Status,
            "quit" | "exit" => Command::Quit,
            _ => Command::Unknown(trimmed.to_string()),
        }
    }
}

/// Help text listing every command
pub const HELP_TEXT: &str = "Commands:
  /help            Show this help
  /prompts         List the standard prompts
  /use <key>       Load a standard prompt; press Enter on an empty line to send it
  /clear           Clear the chat history and start a new session
  /export [dir]    Save the transcript as a text file
  /debug           Probe the agent API and show diagnostics
  /status          Re-check the connection
  /quit            Exit
Anything else is sent to the agent.";

/// Input after length checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitedInput {
    /// Text to send, at most [`MAX_INPUT_CHARS`] characters
    pub text: String,
    /// Characters in the original input
    pub original_chars: usize,
    /// Input was cut down
    pub truncated: bool,
}

impl LimitedInput {
    /// Apply the input cap
    pub fn new(input: &str) -> Self {
        let original_chars = input.chars().count();
        let text: String = input.chars().take(MAX_INPUT_CHARS).collect();
        Self {
            truncated: original_chars > MAX_INPUT_CHARS,
            text,
            original_chars,
        }
    }

    /// Whether the length warning applies
    pub fn near_limit(&self) -> bool {
        self.original_chars > WARN_INPUT_CHARS
    }
}
