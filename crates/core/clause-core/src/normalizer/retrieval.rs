//! Rendering of retrieval-only replies as a clause digest

use crate::utils::{capitalize_first, truncate_chars};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::fmt::Write as _;

/// Clause text is cut to this many characters in the digest
pub const CLAUSE_PREVIEW_CHARS: usize = 300;

static CLAUSE_TYPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"clause_type:\s*([^,\n]+)").expect("static regex"));
static CLAUSE_TEXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)clause_text:\s*(.+?)(?:,clause_type:|$)").expect("static regex"));

/// A clause pulled out of a chunk's `page_content`
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    /// Label such as `arbitration`
    pub clause_type: String,
    /// Clause body, trimmed
    pub text: String,
    /// Source document
    pub filename: Option<String>,
    /// Relevance score
    pub score: Option<f64>,
}

/// Source label for a chunk; agents are not consistent about its type
fn source_label(item: &Value) -> Option<String> {
    match item.get("filename")? {
        Value::Null => None,
        Value::String(name) => Some(name.clone()),
        other => Some(other.to_string()),
    }
}

/// Extract type and text from one chunk; `None` when either is missing
///
/// Only `page_content` must be a string. An odd `filename` is shown as its
/// JSON text and a non-numeric `score` is treated as absent.
pub fn parse_clause(item: &Value) -> Option<Clause> {
    let page_content = item.get("page_content").and_then(Value::as_str)?;
    let clause_type = CLAUSE_TYPE_RE
        .captures(page_content)?
        .get(1)?
        .as_str()
        .trim()
        .to_string();
    let text = CLAUSE_TEXT_RE
        .captures(page_content)?
        .get(1)?
        .as_str()
        .trim()
        .to_string();

    Some(Clause {
        clause_type,
        text,
        filename: source_label(item),
        score: item.get("score").and_then(Value::as_f64),
    })
}

/// Group clauses by exact type, keeping first-seen order of types
pub fn group_clauses(items: &[Value]) -> Vec<(String, Vec<Clause>)> {
    let mut groups: Vec<(String, Vec<Clause>)> = Vec::new();
    for clause in items.iter().filter_map(parse_clause) {
        match groups.iter_mut().find(|(kind, _)| *kind == clause.clause_type) {
            Some((_, members)) => members.push(clause),
            None => groups.push((clause.clause_type.clone(), vec![clause])),
        }
    }
    groups
}

/// Render the digest for a non-empty `retrieved_data` array
pub fn render_digest(items: &[Value]) -> String {
    let groups = group_clauses(items);
    let mut out = String::from("Based on the retrieved contract clauses, here is the analysis:\n\n");

    for (kind, clauses) in &groups {
        let _ = write!(out, "**{} Clauses:**\n\n", capitalize_first(kind));
        for (idx, clause) in clauses.iter().enumerate() {
            let source = clause.filename.as_deref().unwrap_or("unknown source");
            let relevance = clause
                .score
                .map(|s| format!("{:.1}", s))
                .unwrap_or_else(|| "n/a".to_string());
            let _ = write!(
                out,
                "{}. **Source:** {} (Relevance: {})\n   **Content:** {}\n\n",
                idx + 1,
                source,
                relevance,
                truncate_chars(&clause.text, CLAUSE_PREVIEW_CHARS)
            );
        }
    }

    out.push_str("\n**Analysis Summary:**\n");
    let _ = write!(
        out,
        "Found {} relevant contract clauses across {} different clause types.",
        items.len(),
        groups.len()
    );
    out
}
