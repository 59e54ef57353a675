//! Redacted echo of tracing events into the terminal

use clause_core::{subscribe_logs, LogEvent};
use colored::Colorize;
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

static REDACTIONS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"(?i)bearer\s+[A-Za-z0-9._~+/=-]{8,}").expect("static regex"),
            "Bearer REDACTED",
        ),
        (
            Regex::new(r"sk-[A-Za-z0-9]{20,}").expect("static regex"),
            "sk-REDACTED",
        ),
        (
            Regex::new(r"(?i)api[_-]?key\s*[:=]?\s*[A-Za-z0-9_-]{12,}").expect("static regex"),
            "api_key=REDACTED",
        ),
        (
            Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("static regex"),
            "email@redacted",
        ),
    ]
});

/// Mask credentials and e-mail addresses in a log line
pub fn redact(message: &str) -> String {
    REDACTIONS
        .iter()
        .fold(message.to_string(), |msg, (re, rep)| {
            re.replace_all(&msg, *rep).into_owned()
        })
}

/// Whether an event passes the case-insensitive target/message filter
pub fn matches_filter(event: &LogEvent, filter: Option<&str>) -> bool {
    match filter {
        None => true,
        Some(f) => {
            let f = f.to_lowercase();
            event.message.to_lowercase().contains(&f) || event.target.to_lowercase().contains(&f)
        }
    }
}

/// One printable line
pub fn format_event(event: &LogEvent) -> String {
    format!(
        "[{}][{}] [{}] {}",
        event.time,
        event.level,
        event.target,
        redact(&event.message)
    )
    .bright_black()
    .to_string()
}

/// Print log events until the channel closes
///
/// Returns `None` when logging was never initialized.
pub fn spawn(filter: Option<String>) -> Option<JoinHandle<()>> {
    let mut rx = subscribe_logs()?;
    Some(tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if matches_filter(&event, filter.as_deref()) {
                        eprintln!("{}", format_event(&event));
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    eprintln!("{}", format!("[log tail] skipped {} events", skipped).yellow());
                }
                Err(RecvError::Closed) => break,
            }
        }
    }))
}
