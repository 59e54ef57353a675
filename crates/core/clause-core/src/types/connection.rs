//! Connection status reported to the user

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the client currently believes about agent reachability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    /// Nothing attempted yet
    #[default]
    Unknown,
    /// A request or probe is in flight
    Connecting,
    /// Last request or probe succeeded
    Connected,
    /// Last request or probe failed
    Error,
}

impl ConnectionState {
    /// Status line text
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Unknown => "AI Agent Status Unknown",
            ConnectionState::Connecting => "Connecting to AI Agent...",
            ConnectionState::Connected => "Connected to AI Agent",
            ConnectionState::Error => "Connection Error",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
