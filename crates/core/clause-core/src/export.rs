//! Plain-text transcript export

use crate::conversation::Conversation;
use crate::Result;
use chrono::{DateTime, Local, TimeZone};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Render the export artifact
///
/// Only real messages are walked; the thinking placeholder is not a message
/// and never shows up here.
pub fn render_transcript<Tz>(conversation: &Conversation, generated_at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::from("License Analysis Chat Export\n");
    let _ = writeln!(out, "Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "Session ID: {}", conversation.session().id);
    let _ = write!(out, "\n{}\n\n", "=".repeat(50));

    for message in conversation.messages() {
        let _ = write!(
            out,
            "[{}] {}:\n{}\n\n",
            message.timestamp,
            message.role.label(),
            message.text
        );
    }
    out
}

/// `license-chat-<epoch-ms>.txt`
pub fn export_file_name(epoch_ms: i64) -> String {
    format!("license-chat-{}.txt", epoch_ms)
}

/// Write the transcript into `dir` and return the file path
pub fn write_export(conversation: &Conversation, dir: &Path) -> Result<PathBuf> {
    let now = Local::now();
    let path = dir.join(export_file_name(now.timestamp_millis()));
    std::fs::create_dir_all(dir)?;
    std::fs::write(&path, render_transcript(conversation, &now))?;
    tracing::info!(path = %path.display(), messages = conversation.messages().count(), "Exported transcript");
    Ok(path)
}
