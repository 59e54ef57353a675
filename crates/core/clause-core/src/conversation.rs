//! Conversation session: transcript, session identity and the in-flight flag

use crate::types::{Message, MessageHandle, Role, Session, TranscriptEntry};

/// Greeting appended at startup and after every clear
pub const WELCOME_MESSAGE: &str = "Hello! I'm your AI agent for software license analysis. I can help you with:

• **License compliance assessment** - Evaluate agreements against your policies
• **Risk analysis and recommendations** - Identify potential legal and business risks
• **Contract term extraction** - Pull out key provisions and obligations
• **Legal clause interpretation** - Explain complex legal language

You can type a custom message or pick one of the standard prompts (/prompts). Feel free to paste contract text directly, or ask questions about licensing strategies.";

/// One chat conversation
///
/// `busy` lives here rather than in global state so independent conversations
/// can coexist. Check-and-set happens in [`try_send`](Self::try_send) with no
/// suspension point in between.
#[derive(Debug, Clone)]
pub struct Conversation {
    session: Session,
    entries: Vec<TranscriptEntry>,
    busy: bool,
    next_handle: u64,
}

impl Conversation {
    /// Start with a fresh session and an empty transcript
    pub fn new() -> Self {
        Self {
            session: Session::new(),
            entries: Vec::new(),
            busy: false,
            next_handle: 0,
        }
    }

    /// Current session
    pub fn session(&self) -> &Session {
        &self.session
    }

    fn issue_handle(&mut self) -> MessageHandle {
        let handle = MessageHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    /// Append a message; text is stored as given
    pub fn append_message(&mut self, role: Role, text: impl Into<String>, is_error: bool) -> MessageHandle {
        let handle = self.issue_handle();
        self.entries.push(TranscriptEntry::Message {
            handle,
            message: Message::new(role, text, is_error),
        });
        handle
    }

    /// Append the transient "thinking" placeholder
    pub fn append_thinking(&mut self) -> MessageHandle {
        let handle = self.issue_handle();
        self.entries.push(TranscriptEntry::Thinking { handle });
        handle
    }

    /// Remove an entry; no-op when it is already gone
    pub fn remove_message(&mut self, handle: MessageHandle) {
        self.entries.retain(|entry| entry.handle() != handle);
    }

    /// Drop the transcript and start a new session
    ///
    /// Asking the user for confirmation is up to the caller.
    pub fn reset(&mut self) {
        let previous = self.session.id.clone();
        self.entries.clear();
        self.session = Session::new();
        tracing::info!(previous = %previous, session = %self.session.id, "Conversation reset");
    }

    /// Claim the single in-flight slot
    ///
    /// Returns false, changing nothing, when an exchange is already running or
    /// the input is blank.
    pub fn try_send(&mut self, input: &str) -> bool {
        if self.busy || input.trim().is_empty() {
            return false;
        }
        self.busy = true;
        true
    }

    /// Release the in-flight slot
    pub fn end_send(&mut self) {
        self.busy = false;
    }

    /// Whether an exchange is in flight
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// All entries including the placeholder, oldest first
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Real messages only, oldest first
    pub fn messages(&self) -> impl Iterator<Item = &Message> + '_ {
        self.entries.iter().filter_map(TranscriptEntry::as_message)
    }

    /// Look up a message by handle
    pub fn message(&self, handle: MessageHandle) -> Option<&Message> {
        self.entries
            .iter()
            .find(|entry| entry.handle() == handle)
            .and_then(TranscriptEntry::as_message)
    }

    /// Whether the placeholder is currently shown
    pub fn is_thinking(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| matches!(entry, TranscriptEntry::Thinking { .. }))
    }

    /// Number of entries including the placeholder
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the transcript is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
