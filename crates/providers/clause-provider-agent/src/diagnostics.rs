//! Diagnostics battery: a fixed sequence of authenticated probes

use crate::{ChatRequest, CHAT_PATH};
use clause_core::{BodyPreview, ChatConfig, DiagnosticsReport, ProbeOutcome, ProbeRecord};
use reqwest::{Client, Method, StatusCode};

/// Message sent by the chat probe
pub const DIAGNOSTIC_TEST_MESSAGE: &str =
    "Hello! This is a test message to verify the API connection.";

/// One probe in the battery
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeSpec {
    /// HTTP method
    pub method: Method,
    /// Path suffix appended to the endpoint
    pub path: String,
    /// JSON body, sent for POST probes
    pub body: Option<serde_json::Value>,
}

impl ProbeSpec {
    /// GET probe without a body
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
        }
    }
}

/// Chat POST with the test message, then `/docs` and `/openapi.json`
pub fn default_battery() -> Vec<ProbeSpec> {
    let chat_body = serde_json::to_value(ChatRequest::user(DIAGNOSTIC_TEST_MESSAGE)).ok();
    vec![
        ProbeSpec {
            method: Method::POST,
            path: CHAT_PATH.to_string(),
            body: chat_body,
        },
        ProbeSpec::get("/docs"),
        ProbeSpec::get("/openapi.json"),
    ]
}

/// Run every probe in order; failures are recorded, never returned
pub(crate) async fn run_battery(
    client: &Client,
    config: &ChatConfig,
    bearer: &str,
    battery: &[ProbeSpec],
) -> DiagnosticsReport {
    tracing::info!(
        endpoint = %config.endpoint,
        api_key = %config.api_key_summary(),
        probes = battery.len(),
        "Running diagnostics"
    );

    let mut records = Vec::with_capacity(battery.len());
    for spec in battery {
        let url = config.url_for(&spec.path);
        let outcome = probe(client, &url, bearer, spec).await;
        records.push(ProbeRecord {
            method: spec.method.to_string(),
            url,
            outcome,
        });
    }
    DiagnosticsReport { records }
}

async fn probe(client: &Client, url: &str, bearer: &str, spec: &ProbeSpec) -> ProbeOutcome {
    let mut request = client
        .request(spec.method.clone(), url)
        .header("Authorization", bearer)
        .header("Content-Type", "application/json");
    if let Some(body) = &spec.body {
        request = request.json(body);
    }

    let resp = match request.send().await {
        Ok(resp) => resp,
        Err(e) => {
            tracing::debug!(url = %url, error = %e, "Probe failed");
            return ProbeOutcome::Failed(e.to_string());
        }
    };

    let status = resp.status();
    tracing::debug!(url = %url, status = status.as_u16(), "Probe answered");
    let preview = if status == StatusCode::NOT_FOUND {
        None
    } else {
        Some(match resp.text().await {
            Ok(body) => BodyPreview::from_body(&body),
            Err(_) => BodyPreview::Unreadable,
        })
    };

    ProbeOutcome::Response {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or("").to_string(),
        ok: status.is_success(),
        preview,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_battery_order() {
        let battery = default_battery();
        let probes: Vec<(String, &str)> = battery
            .iter()
            .map(|p| (p.method.to_string(), p.path.as_str()))
            .collect();
        assert_eq!(
            probes,
            vec![
                ("POST".to_string(), CHAT_PATH),
                ("GET".to_string(), "/docs"),
                ("GET".to_string(), "/openapi.json"),
            ]
        );

        let body = battery[0].body.as_ref().unwrap();
        assert_eq!(body["messages"][0]["content"], DIAGNOSTIC_TEST_MESSAGE);
    }

    #[tokio::test]
    async fn test_unreachable_probe_is_recorded() {
        // Bind then drop so nothing is listening on the port
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let config = ChatConfig::new(format!("http://127.0.0.1:{}", port), "k").unwrap();
        let report = run_battery(
            &Client::new(),
            &config,
            "Bearer k",
            &[ProbeSpec::get("/docs")],
        )
        .await;

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].url, format!("http://127.0.0.1:{}/docs", port));
        assert!(matches!(report.records[0].outcome, ProbeOutcome::Failed(_)));
    }
}
