//! Agent reply normalizer
//!
//! Agents behind the chat endpoint do not agree on a reply schema. The
//! normalizer classifies each payload into one of the shapes in [`shapes`],
//! renders it to a single display string, and appends content moderation
//! notes when the agent reports triggered guardrails.
//!
//! Priority is strict: chat completion, then direct string fields, then
//! retrieval results, then a fixed fallback message. A well-formed payload
//! in an unknown shape is still a success.

pub mod retrieval;
pub mod shapes;

pub use shapes::ReplyShape;

use crate::error::TransportError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Text used when a payload matches no known shape
pub const UNRECOGNIZED_FORMAT_MESSAGE: &str = "Analysis completed, but the response format was unexpected. \
The agent may have processed your request but returned data in an unrecognized format.";

/// Phrases that mark a reasoning field as the model narrating to itself
pub const DEFAULT_MONOLOGUE_MARKERS: &[&str] = &["We don't have", "The user asks"];

/// Shown instead of a reasoning field that contains a monologue marker
pub const DEFAULT_GUIDANCE_MESSAGE: &str = "**Contract Analysis Response:**\n\n\
I notice you're requesting analysis of a software license agreement, but no specific document was provided. \
Based on the contract clauses in my knowledge base, I can provide guidance on key negotiation points:\n\n\
**Key Areas to Focus On:**\n\
• License Grant & Scope\n\
• User/Seat Definitions\n\
• Fees & Price Adjustments\n\
• Support & Maintenance SLAs\n\
• Warranty & Defect Resolution\n\
• IP Indemnification\n\
• Liability Limitations\n\
• Termination Rights\n\
• Data Protection\n\n\
**To provide specific analysis:** Please upload your license agreement document or paste the license text, \
and I'll identify specific clauses that need negotiation, suggest modifications, and highlight non-negotiable terms.\n\n\
**Sample Analysis Available:** I have detailed contract clause examples for arbitration, amendments, approvals, \
and applicable law that I can reference for your specific license terms.";

/// Outcome of interpreting one exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "text", rename_all = "lowercase")]
pub enum NormalizedResult {
    /// Display text for the agent's answer
    Success(String),
    /// Description of why the exchange failed
    Failure(String),
}

impl NormalizedResult {
    /// Whether this is the success variant
    pub fn is_success(&self) -> bool {
        matches!(self, NormalizedResult::Success(_))
    }

    /// Text of either variant
    pub fn text(&self) -> &str {
        match self {
            NormalizedResult::Success(text) | NormalizedResult::Failure(text) => text,
        }
    }
}

/// Tunables for quirks of a specific upstream agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Substring markers; any hit replaces the reasoning text
    pub monologue_markers: Vec<String>,
    /// Replacement for reasoning text that hit a marker
    pub guidance_message: String,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            monologue_markers: DEFAULT_MONOLOGUE_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            guidance_message: DEFAULT_GUIDANCE_MESSAGE.to_string(),
        }
    }
}

/// Converts agent replies into display text
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    /// Create a normalizer with the given quirk settings
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Interpret a decoded reply; always a success
    pub fn normalize(&self, payload: &Value) -> NormalizedResult {
        let shape = ReplyShape::classify(payload);
        tracing::debug!(shape = shape.name(), "Classified agent reply");

        let mut text = self.render(shape);
        append_moderation_notes(&mut text, payload);
        NormalizedResult::Success(text)
    }

    fn render(&self, shape: ReplyShape<'_>) -> String {
        match shape {
            ReplyShape::ChatCompletion {
                content: Some(content),
                ..
            } => content.to_string(),
            ReplyShape::ChatCompletion {
                content: None,
                reasoning: Some(reasoning),
            } => {
                if self.is_monologue(reasoning) {
                    tracing::debug!("Reasoning field looks like internal monologue, substituting guidance");
                    self.config.guidance_message.clone()
                } else {
                    reasoning.to_string()
                }
            }
            ReplyShape::ChatCompletion {
                content: None,
                reasoning: None,
            } => {
                tracing::warn!("Chat completion reply had no usable content");
                String::new()
            }
            ReplyShape::Direct(text) => text.to_string(),
            ReplyShape::Retrieval(items) => retrieval::render_digest(items),
            ReplyShape::Unrecognized => {
                tracing::warn!("Agent reply matched no known shape");
                UNRECOGNIZED_FORMAT_MESSAGE.to_string()
            }
        }
    }

    fn is_monologue(&self, text: &str) -> bool {
        self.config
            .monologue_markers
            .iter()
            .any(|marker| !marker.is_empty() && text.contains(marker.as_str()))
    }
}

/// Build the failure result for an exchange whose transport failed
///
/// The reply is never run through the shape logic; the description embeds the
/// raw transport error (status, reason phrase and body for HTTP errors).
pub fn describe_failure(error: &TransportError, endpoint: &str) -> NormalizedResult {
    NormalizedResult::Failure(format!(
        "API connection failed: {}\n\nPlease check:\n\
         1. Agent endpoint: {}\n\
         2. API key is valid\n\
         3. Agent is running\n\n\
         Run /debug for detailed diagnostics.",
        error, endpoint
    ))
}

fn guardrail_field(entry: &Value, key: &str) -> String {
    match entry.get(key) {
        Some(Value::String(s)) => s.clone(),
        None | Some(Value::Null) => "unknown".to_string(),
        Some(other) => other.to_string(),
    }
}

/// Append a moderation section when `guardrails.triggered_guardrails` is non-empty
pub fn append_moderation_notes(text: &mut String, payload: &Value) {
    let Some(triggered) = payload
        .get("guardrails")
        .and_then(|g| g.get("triggered_guardrails"))
        .and_then(Value::as_array)
        .filter(|list| !list.is_empty())
    else {
        return;
    };

    text.push_str("\n\n**Content Moderation Notes:**\n");
    for entry in triggered {
        text.push_str(&format!(
            "- {}: {}\n",
            guardrail_field(entry, "rule_name"),
            guardrail_field(entry, "message")
        ));
    }
}
