//! Agent API seam between the conversation core and a transport

use super::{ConnectionState, DiagnosticsReport};
use crate::error::TransportError;
use crate::normalizer::NormalizedResult;
use async_trait::async_trait;

/// A remote conversational agent
///
/// Implementations own the transport and the reply normalizer; callers only
/// see display-ready results.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AgentApi: Send + Sync {
    /// Base URL of the agent, used in troubleshooting text
    fn endpoint(&self) -> String;

    /// Send one user message and normalize the reply
    async fn send(&self, message: &str) -> std::result::Result<NormalizedResult, TransportError>;

    /// Best-effort reachability check
    async fn probe_health(&self) -> ConnectionState;

    /// Run the diagnostics battery; never fails
    async fn run_diagnostics(&self) -> DiagnosticsReport;
}
