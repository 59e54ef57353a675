//! ClauseChat Core
//!
//! Conversation core for a chat client that talks to a remote
//! license-analysis agent. It includes:
//!
//! - Reply normalizer for the heterogeneous payloads agents return
//! - Conversation session with a single in-flight exchange
//! - Chat controller driving exchanges, health checks and diagnostics
//! - Standard prompt catalog and plain-text transcript export
//!
//! Transports implement [`AgentApi`]; surfaces drive a [`ChatController`].
//!
//! # Example
//!
//! ```no_run
//! use clause_core::*;
//! use std::sync::Arc;
//!
//! async fn ask(agent: Arc<dyn AgentApi>) {
//!     let controller = ChatController::new(agent);
//!     if let ExchangeOutcome::Replied(reply) = controller.submit("Summarize the EULA").await {
//!         println!("{}", reply.text);
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod controller;
pub mod conversation;
pub mod error;
pub mod export;
pub mod normalizer;
pub mod prompts;
pub mod types;
pub mod utils;

// Re-export main types
pub use config::{load_env, load_env_from_path, ChatConfig, DEFAULT_HEALTH_PATHS};
pub use controller::{ChatController, ExchangeOutcome, CONNECTIVITY_ERROR_MESSAGE};
pub use conversation::{Conversation, WELCOME_MESSAGE};
pub use error::{ClauseError, Result, TransportError};
pub use export::{export_file_name, render_transcript, write_export};
pub use normalizer::{
    describe_failure, NormalizedResult, Normalizer, NormalizerConfig, ReplyShape,
    UNRECOGNIZED_FORMAT_MESSAGE,
};
pub use prompts::PromptCatalog;
pub use types::*;
pub use utils::{init_logging, subscribe_logs, LogEvent};
