//! ANSI rendering of transcript entries

use clause_core::{ConnectionState, Message, Role};
use colored::Colorize;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("static regex"));
static ITALIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").expect("static regex"));
static H2_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^##\s+(.*)$").expect("static regex"));
static H1_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#\s+(.*)$").expect("static regex"));
static NUMBERED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\.\s+(.*)$").expect("static regex"));
static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-\s+(.*)$").expect("static regex"));

/// Placeholder shown while an exchange is in flight
pub const THINKING_TEXT: &str = "AI Agent is analyzing...";

fn inline(text: &str) -> String {
    let bolded = BOLD_RE.replace_all(text, |caps: &Captures| caps[1].bold().to_string());
    ITALIC_RE
        .replace_all(&bolded, |caps: &Captures| caps[1].italic().to_string())
        .into_owned()
}

fn format_line(line: &str) -> String {
    if let Some(caps) = H2_RE.captures(line) {
        return inline(&caps[1]).bold().to_string();
    }
    if let Some(caps) = H1_RE.captures(line) {
        return inline(&caps[1]).bold().underline().to_string();
    }
    if let Some(caps) = NUMBERED_RE.captures(line) {
        return format!("  {}. {}", &caps[1], inline(&caps[2]));
    }
    if let Some(caps) = BULLET_RE.captures(line) {
        return format!("  • {}", inline(&caps[1]));
    }
    inline(line)
}

/// Apply the lightweight markup used by agent replies
///
/// Handles `**bold**`, `*italic*`, `#`/`##` headings, `N.` items and `- `
/// bullets. Everything else passes through unchanged.
pub fn format_agent_text(text: &str) -> String {
    text.lines().map(format_line).collect::<Vec<_>>().join("\n")
}

/// Header line plus body for one message
pub fn render_message(message: &Message) -> String {
    let header = format!("[{}] {}:", message.timestamp, message.role.label());
    let header = match (message.role, message.is_error) {
        (_, true) => header.red().bold(),
        (Role::User, false) => header.green().bold(),
        (Role::Agent, false) => header.bright_blue().bold(),
    };

    let body = match message.role {
        Role::Agent if message.is_error => message.text.red().to_string(),
        Role::Agent => format_agent_text(&message.text),
        Role::User => message.text.clone(),
    };
    format!("{}\n{}\n", header, body)
}

/// The in-flight indicator line
pub fn render_thinking() -> String {
    format!("⋯ {}", THINKING_TEXT).bright_black().italic().to_string()
}

/// Status line colored by state
pub fn render_status(state: ConnectionState) -> String {
    let label = format!("● {}", state.label());
    match state {
        ConnectionState::Connected => label.green().to_string(),
        ConnectionState::Connecting => label.yellow().to_string(),
        ConnectionState::Error => label.red().to_string(),
        ConnectionState::Unknown => label.bright_black().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_markup_is_stripped_to_plain_text() {
        plain();
        let text = "# Summary\n## Risks\n1. Auto-renewal\n- **Cap** on *liability*\nPlain line";
        assert_eq!(
            format_agent_text(text),
            "Summary\nRisks\n  1. Auto-renewal\n  • Cap on liability\nPlain line"
        );
    }

    #[test]
    fn test_unmatched_markup_passes_through() {
        plain();
        assert_eq!(format_agent_text("###  deep heading"), "###  deep heading");
        assert_eq!(format_agent_text("-no space"), "-no space");
        assert_eq!(format_agent_text("2.5 million"), "2.5 million");
    }

    #[test]
    fn test_render_message_layout() {
        plain();
        let mut message = Message::new(Role::Agent, "**Done**", false);
        message.timestamp = "09:30".to_string();
        assert_eq!(render_message(&message), "[09:30] AI Agent:\nDone\n");

        let mut user = Message::new(Role::User, "**raw**", false);
        user.timestamp = "09:31".to_string();
        assert_eq!(render_message(&user), "[09:31] User:\n**raw**\n");
    }

    #[test]
    fn test_thinking_and_status_lines() {
        plain();
        assert_eq!(render_thinking(), "⋯ AI Agent is analyzing...");
        assert_eq!(
            render_status(ConnectionState::Connected),
            "● Connected to AI Agent"
        );
    }
}
