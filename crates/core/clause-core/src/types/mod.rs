//! Core type definitions for ClauseChat

pub mod agent;
pub mod connection;
pub mod diagnostics;
pub mod message;
pub mod session;

// Re-export commonly used types
pub use agent::*;
pub use connection::*;
pub use diagnostics::*;
pub use message::*;
pub use session::*;
