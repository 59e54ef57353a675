//! HTTP client for a remote license-analysis agent
//!
//! Speaks the agent's OpenAI-style chat endpoint with a static bearer token,
//! probes health paths, and runs the diagnostics battery.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod diagnostics;

pub use diagnostics::{default_battery, ProbeSpec, DIAGNOSTIC_TEST_MESSAGE};

use async_trait::async_trait;
use clause_core::{
    AgentApi, ChatConfig, ConnectionState, DiagnosticsReport, NormalizedResult, Normalizer,
    TransportError, UNREADABLE_BODY,
};
use reqwest::{Client, Response};
use serde::Serialize;
use std::sync::OnceLock;

/// Path of the chat completion endpoint, relative to the agent base URL
pub const CHAT_PATH: &str = "/api/v1/chat/completions";

/// Shared HTTP client for connection pooling
static HTTP_CLIENT: OnceLock<Client> = OnceLock::new();

/// Get or initialize the shared HTTP client
///
/// No request timeout is configured; a slow agent is waited on.
fn get_http_client() -> Client {
    HTTP_CLIENT
        .get_or_init(|| {
            Client::builder()
                .pool_max_idle_per_host(8)
                .pool_idle_timeout(std::time::Duration::from_secs(300))
                .tcp_keepalive(std::time::Duration::from_secs(60))
                .build()
                .unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "Falling back to default HTTP client");
                    Client::new()
                })
        })
        .clone()
}

/// One chat turn as the agent expects it
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage<'a> {
    /// Always `user` from this client
    pub role: &'a str,
    /// Message text
    pub content: &'a str,
}

/// Request body for the chat endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    /// Single-turn message list
    pub messages: Vec<ChatMessage<'a>>,
    /// Replies are awaited whole
    pub stream: bool,
    /// Ask for tool call details in the reply
    pub include_functions_info: bool,
    /// Ask for retrieved chunks in the reply
    pub include_retrieval_info: bool,
    /// Ask for triggered guardrails in the reply
    pub include_guardrails_info: bool,
}

impl<'a> ChatRequest<'a> {
    /// Envelope for one user message
    pub fn user(content: &'a str) -> Self {
        Self {
            messages: vec![ChatMessage {
                role: "user",
                content,
            }],
            stream: false,
            include_functions_info: true,
            include_retrieval_info: true,
            include_guardrails_info: true,
        }
    }
}

/// Agent client with a shared connection pool
pub struct AgentClient {
    client: Client,
    config: ChatConfig,
    normalizer: Normalizer,
    battery: Vec<ProbeSpec>,
}

impl AgentClient {
    /// Create a client from a validated config
    pub fn new(config: ChatConfig) -> Self {
        let normalizer = Normalizer::new(config.normalizer.clone());
        Self {
            client: get_http_client(),
            config,
            normalizer,
            battery: default_battery(),
        }
    }

    /// Replace the diagnostics battery
    pub fn with_battery(mut self, battery: Vec<ProbeSpec>) -> Self {
        self.battery = battery;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.config.api_key)
    }

    /// POST the chat envelope and normalize the reply
    pub async fn send_message(&self, message: &str) -> Result<NormalizedResult, TransportError> {
        let url = self.config.url_for(CHAT_PATH);
        tracing::info!(
            url = %url,
            api_key = %self.config.api_key_summary(),
            "Sending chat request"
        );

        let resp = self
            .client
            .post(&url)
            .header("Authorization", self.bearer())
            .header("Content-Type", "application/json")
            .json(&ChatRequest::user(message))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(url = %url, error = %e, "Chat request failed");
                TransportError::network(e.to_string())
            })?;

        let payload = read_json(resp).await?;
        Ok(self.normalizer.normalize(&payload))
    }

    /// Try each health path in order; the first 2xx wins
    pub async fn check_health(&self) -> ConnectionState {
        for path in &self.config.health_paths {
            let url = self.config.url_for(path);
            match self
                .client
                .get(&url)
                .header("Authorization", self.bearer())
                .send()
                .await
            {
                Ok(resp) if resp.status().is_success() => {
                    tracing::info!(url = %url, status = resp.status().as_u16(), "Health check passed");
                    return ConnectionState::Connected;
                }
                Ok(resp) => {
                    tracing::debug!(url = %url, status = resp.status().as_u16(), "Health path not healthy");
                }
                Err(e) => {
                    tracing::debug!(url = %url, error = %e, "Health path unreachable");
                }
            }
        }

        tracing::warn!(
            endpoint = %self.config.endpoint,
            paths = self.config.health_paths.len(),
            "No health path answered with success"
        );
        ConnectionState::Error
    }
}

/// Check the status, then decode the body as JSON
async fn read_json(resp: Response) -> Result<serde_json::Value, TransportError> {
    let status = resp.status();
    tracing::debug!(status = status.as_u16(), "Agent responded");

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Error body could not be read");
            UNREADABLE_BODY.to_string()
        });
        tracing::warn!(status = status.as_u16(), body = %body, "Agent returned error status");
        return Err(TransportError::status(
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
            body,
        ));
    }

    let body = resp
        .text()
        .await
        .map_err(|e| TransportError::network(e.to_string()))?;
    serde_json::from_str(&body).map_err(|e| {
        tracing::warn!(error = %e, "Agent reply was not valid JSON");
        TransportError::decode(e.to_string())
    })
}

#[async_trait]
impl AgentApi for AgentClient {
    fn endpoint(&self) -> String {
        self.config.endpoint.clone()
    }

    async fn send(&self, message: &str) -> Result<NormalizedResult, TransportError> {
        self.send_message(message).await
    }

    async fn probe_health(&self) -> ConnectionState {
        self.check_health().await
    }

    async fn run_diagnostics(&self) -> DiagnosticsReport {
        diagnostics::run_battery(&self.client, &self.config, &self.bearer(), &self.battery).await
    }
}
