//! Chat controller: runs exchanges against an agent and tracks connection state
//!
//! One exchange moves `idle -> sending -> idle`. While sending, the user
//! message and the thinking placeholder are in the transcript and `busy` is
//! set; any path out of the exchange (reply, failure, cancellation, panic)
//! clears both through [`InFlightGuard`].

use crate::conversation::{Conversation, WELCOME_MESSAGE};
use crate::export;
use crate::normalizer::{describe_failure, NormalizedResult};
use crate::prompts::PromptCatalog;
use crate::types::{AgentApi, ConnectionState, DiagnosticsReport, Message, MessageHandle, Role};
use crate::Result;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Shown when an exchange dies outside the agent client, e.g. a panicked task
pub const CONNECTIVITY_ERROR_MESSAGE: &str =
    "I'm sorry, I'm having trouble connecting right now. Please check your connection and try again.";

/// What happened to a submitted input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeOutcome {
    /// Input was blank or another exchange is in flight; nothing changed
    Rejected,
    /// The agent-authored reply that was appended (may be an error bubble)
    Replied(Message),
}

fn apology(description: &str) -> String {
    format!(
        "I apologize, but I encountered an error: {}. Please try again.",
        description
    )
}

/// Clears the in-flight state when dropped
struct InFlightGuard {
    conversation: Arc<RwLock<Conversation>>,
    placeholder: MessageHandle,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut conv = self
            .conversation
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        conv.remove_message(self.placeholder);
        conv.end_send();
    }
}

/// Front door for a surface: owns the conversation and the agent handle
///
/// Cloning is cheap and clones share state, so a surface can run an exchange
/// on a background task and keep accepting input; new sends are refused
/// until it settles. Locks are never held across an await.
#[derive(Clone)]
pub struct ChatController {
    conversation: Arc<RwLock<Conversation>>,
    status: Arc<RwLock<ConnectionState>>,
    agent: Arc<dyn AgentApi>,
    catalog: PromptCatalog,
}

impl ChatController {
    /// Create a controller with a new conversation opened by the welcome message
    pub fn new(agent: Arc<dyn AgentApi>) -> Self {
        let mut conversation = Conversation::new();
        conversation.append_message(Role::Agent, WELCOME_MESSAGE, false);
        Self {
            conversation: Arc::new(RwLock::new(conversation)),
            status: Arc::new(RwLock::new(ConnectionState::Unknown)),
            agent,
            catalog: PromptCatalog::standard(),
        }
    }

    fn conversation(&self) -> RwLockReadGuard<'_, Conversation> {
        self.conversation
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn conversation_mut(&self) -> RwLockWriteGuard<'_, Conversation> {
        self.conversation
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_status(&self, state: ConnectionState) {
        *self
            .status
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = state;
    }

    /// Read-only access to the conversation
    pub fn with_conversation<R>(&self, f: impl FnOnce(&Conversation) -> R) -> R {
        f(&self.conversation())
    }

    /// Current connection state
    pub fn status(&self) -> ConnectionState {
        *self
            .status
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Whether an exchange is in flight
    pub fn is_busy(&self) -> bool {
        self.conversation().is_busy()
    }

    /// Agent base URL
    pub fn endpoint(&self) -> String {
        self.agent.endpoint()
    }

    /// Prompt catalog used for prefill
    pub fn catalog(&self) -> &PromptCatalog {
        &self.catalog
    }

    /// Template text for a catalog key
    pub fn prompt(&self, key: &str) -> Result<&'static str> {
        self.catalog.require(key)
    }

    /// Run one exchange for `input`
    pub async fn submit(&self, input: &str) -> ExchangeOutcome {
        let text = input.trim();
        let placeholder = {
            let mut conv = self.conversation_mut();
            if !conv.try_send(text) {
                tracing::debug!(busy = conv.is_busy(), "Send refused");
                return ExchangeOutcome::Rejected;
            }
            conv.append_message(Role::User, text, false);
            conv.append_thinking()
        };
        let _guard = InFlightGuard {
            conversation: self.conversation.clone(),
            placeholder,
        };
        self.set_status(ConnectionState::Connecting);

        tracing::info!(chars = text.chars().count(), "Sending message to agent");
        let (reply, is_error, state) = match self.agent.send(text).await {
            Ok(NormalizedResult::Success(reply)) => (reply, false, ConnectionState::Connected),
            Ok(NormalizedResult::Failure(description)) => {
                (apology(&description), true, ConnectionState::Error)
            }
            Err(err) => {
                if err.is_http_status() {
                    tracing::warn!(error = %err, "Agent returned an error status");
                } else {
                    tracing::error!(error = %err, "Chat exchange failed");
                }
                let failure = describe_failure(&err, &self.agent.endpoint());
                (apology(failure.text()), true, ConnectionState::Error)
            }
        };

        let message = {
            let mut conv = self.conversation_mut();
            conv.remove_message(placeholder);
            let handle = conv.append_message(Role::Agent, reply, is_error);
            conv.message(handle).cloned()
        };
        self.set_status(state);

        match message {
            Some(message) => ExchangeOutcome::Replied(message),
            None => ExchangeOutcome::Rejected,
        }
    }

    /// Probe the agent's health endpoints and record the result
    pub async fn check_connection(&self) -> ConnectionState {
        self.set_status(ConnectionState::Connecting);
        let state = self.agent.probe_health().await;
        self.set_status(state);
        tracing::info!(status = %state, "Connection check finished");
        state
    }

    /// Run the diagnostics battery and append its report as an agent message
    pub async fn run_diagnostics(&self) -> DiagnosticsReport {
        let notice = format!(
            "🔧 **Testing agent API**\n\nProbing {} ...",
            self.agent.endpoint()
        );
        self.conversation_mut()
            .append_message(Role::Agent, notice, false);

        let report = self.agent.run_diagnostics().await;
        tracing::info!(probes = report.records.len(), "Diagnostics finished");
        self.conversation_mut()
            .append_message(Role::Agent, report.render(), false);
        report
    }

    /// Start over: fresh session, empty transcript, welcome message
    pub fn clear(&self) {
        let mut conv = self.conversation_mut();
        conv.reset();
        conv.append_message(Role::Agent, WELCOME_MESSAGE, false);
    }

    /// Write the transcript export into `dir`
    pub fn export(&self, dir: &Path) -> Result<PathBuf> {
        export::write_export(&self.conversation(), dir)
    }
}
