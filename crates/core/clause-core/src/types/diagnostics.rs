//! Diagnostics report returned by an agent probe battery

use crate::utils::truncate_chars;
use serde::Serialize;

/// Characters of response body kept in a preview
pub const PREVIEW_CHARS: usize = 200;

/// Stands in for a response body that could not be read
pub const UNREADABLE_BODY: &str = "[Could not read response body]";

/// What could be read from a probe response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPreview {
    /// First [`PREVIEW_CHARS`] characters, `...` appended if cut
    Text(String),
    /// Reading the body failed
    Unreadable,
}

impl BodyPreview {
    /// Build a preview from a full body
    pub fn from_body(body: &str) -> Self {
        BodyPreview::Text(truncate_chars(body, PREVIEW_CHARS))
    }
}

/// Result of one probe request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// The server answered
    Response {
        /// HTTP status code
        status: u16,
        /// Reason phrase
        status_text: String,
        /// 2xx status
        ok: bool,
        /// Body preview; skipped for 404
        preview: Option<BodyPreview>,
    },
    /// No response at all
    Failed(String),
}

/// One line item of the diagnostics report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeRecord {
    /// HTTP method
    pub method: String,
    /// Full URL
    pub url: String,
    /// What happened
    pub outcome: ProbeOutcome,
}

impl ProbeRecord {
    fn render_lines(&self, out: &mut Vec<String>) {
        match &self.outcome {
            ProbeOutcome::Response {
                status,
                status_text,
                ok,
                preview,
            } => {
                let mark = if *ok { "✅" } else { "⚠️" };
                out.push(format!(
                    "{} **{} {}** - Status: {} {}",
                    mark, self.method, self.url, status, status_text
                ));
                match preview {
                    Some(BodyPreview::Text(text)) => out.push(format!("   📋 Response: {}", text)),
                    Some(BodyPreview::Unreadable) => {
                        out.push(format!("   📋 Response: {}", UNREADABLE_BODY))
                    }
                    None => {}
                }
            }
            ProbeOutcome::Failed(err) => {
                out.push(format!("❌ **{} {}** - Error: {}", self.method, self.url, err));
            }
        }
    }
}

/// Ordered results of a probe battery
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosticsReport {
    /// One record per probe, in the order run
    pub records: Vec<ProbeRecord>,
}

impl DiagnosticsReport {
    /// Render as a chat message
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        for record in &self.records {
            record.render_lines(&mut lines);
        }

        format!(
            "🔍 **Enhanced Debug Results:**\n\n{}\n\n**Next Steps:**\n\
             1. Look for 200/405 status codes (these indicate valid endpoints)\n\
             2. Check response content for API structure hints\n\
             3. Run /status to re-check connectivity",
            lines.join("\n")
        )
    }
}
