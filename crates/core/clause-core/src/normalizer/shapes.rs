//! Recognized agent reply shapes
//!
//! Classification only validates structure. Turning a shape into text is the
//! normalizer's job.

use serde_json::Value;

/// The closed set of reply layouts the normalizer understands
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyShape<'a> {
    /// OpenAI-style `choices[0].message` object
    ChatCompletion {
        /// `content`, when a string that is non-empty after trimming
        content: Option<&'a str>,
        /// `reasoning_content`, same rule
        reasoning: Option<&'a str>,
    },
    /// A top-level `message`/`content`/`response` string, or a bare string payload
    Direct(&'a str),
    /// Non-empty `retrieval.retrieved_data` array
    Retrieval(&'a [Value]),
    /// Nothing above matched
    Unrecognized,
}

impl<'a> ReplyShape<'a> {
    /// Classify a payload, checking shapes in priority order
    pub fn classify(payload: &'a Value) -> Self {
        if let Some(message) = completion_message(payload) {
            return ReplyShape::ChatCompletion {
                content: non_blank_str(message.get("content")),
                reasoning: non_blank_str(message.get("reasoning_content")),
            };
        }

        if let Some(text) = direct_text(payload) {
            return ReplyShape::Direct(text);
        }

        if let Some(items) = retrieved_data(payload) {
            return ReplyShape::Retrieval(items);
        }

        ReplyShape::Unrecognized
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            ReplyShape::ChatCompletion { .. } => "chat_completion",
            ReplyShape::Direct(_) => "direct",
            ReplyShape::Retrieval(_) => "retrieval",
            ReplyShape::Unrecognized => "unrecognized",
        }
    }
}

fn completion_message(payload: &Value) -> Option<&serde_json::Map<String, Value>> {
    payload.get("choices")?.get(0)?.get("message")?.as_object()
}

fn non_blank_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn direct_text(payload: &Value) -> Option<&str> {
    if let Value::String(text) = payload {
        return Some(text);
    }
    ["message", "content", "response"]
        .iter()
        .find_map(|key| payload.get(*key).and_then(Value::as_str).filter(|s| !s.is_empty()))
}

fn retrieved_data(payload: &Value) -> Option<&[Value]> {
    payload
        .get("retrieval")?
        .get("retrieved_data")?
        .as_array()
        .map(Vec::as_slice)
        .filter(|items| !items.is_empty())
}
