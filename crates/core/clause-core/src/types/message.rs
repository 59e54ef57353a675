//! Transcript message types

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person at the keyboard
    User,
    /// The remote AI agent (also used for locally generated notices)
    Agent,
}

impl Role {
    /// Label used in exports and on screen
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Agent => "AI Agent",
        }
    }
}

/// One chat message
///
/// Messages are never edited after creation; the transcript only hands out
/// shared references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Author
    pub role: Role,

    /// Raw text, unformatted
    pub text: String,

    /// Local wall-clock time of creation, `HH:MM`
    pub timestamp: String,

    /// Rendered as an error bubble
    pub is_error: bool,
}

impl Message {
    /// Create a message stamped with the current local time
    pub fn new(role: Role, text: impl Into<String>, is_error: bool) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Local::now().format("%H:%M").to_string(),
            is_error,
        }
    }
}

/// Opaque reference to a transcript entry, used to remove it later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageHandle(pub(crate) u64);

/// One slot in the transcript
///
/// The thinking placeholder is its own variant so that anything walking
/// messages (export, listing) cannot pick it up by accident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEntry {
    /// A real message
    Message {
        /// Removal handle
        handle: MessageHandle,
        /// The message itself
        message: Message,
    },
    /// "AI Agent is analyzing..." indicator shown while a request is in flight
    Thinking {
        /// Removal handle
        handle: MessageHandle,
    },
}

impl TranscriptEntry {
    /// Handle of this entry
    pub fn handle(&self) -> MessageHandle {
        match self {
            TranscriptEntry::Message { handle, .. } | TranscriptEntry::Thinking { handle } => {
                *handle
            }
        }
    }

    /// The message, unless this is the placeholder
    pub fn as_message(&self) -> Option<&Message> {
        match self {
            TranscriptEntry::Message { message, .. } => Some(message),
            TranscriptEntry::Thinking { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_labels() {
        assert_eq!(Role::User.label(), "User");
        assert_eq!(Role::Agent.label(), "AI Agent");
    }

    #[test]
    fn test_message_timestamp_format() {
        let msg = Message::new(Role::User, "hello", false);
        assert_eq!(msg.timestamp.len(), 5);
        assert_eq!(msg.timestamp.as_bytes()[2], b':');
    }

    #[test]
    fn test_placeholder_is_not_a_message() {
        let entry = TranscriptEntry::Thinking {
            handle: MessageHandle(7),
        };
        assert!(entry.as_message().is_none());
        assert_eq!(entry.handle(), MessageHandle(7));
    }

    #[test]
    fn test_message_serializes_camel_case() {
        let msg = Message {
            role: Role::Agent,
            text: "ok".to_string(),
            timestamp: "09:30".to_string(),
            is_error: true,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "agent");
        assert_eq!(json["isError"], true);
    }
}
