//! Tracing setup and the in-process log feed used by the terminal log tail

use once_cell::sync::OnceCell;
use serde::Serialize;
use std::fmt::Write as _;
use tokio::sync::broadcast;
use tracing::field::{Field, Visit};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Env var consulted when `RUST_LOG` is unset
pub const LOG_LEVEL_VAR: &str = "CLAUSE_LOG_LEVEL";

/// Events kept for a slow log tail before it starts skipping
const FEED_CAPACITY: usize = 256;

/// One tracing event, flattened for display
#[derive(Clone, Debug, Serialize)]
pub struct LogEvent {
    /// Level name (`INFO`, `WARN`, ...)
    pub level: String,
    /// Module path of the emitting code
    pub target: String,
    /// Message followed by its structured fields as `key=value`
    pub message: String,
    /// RFC 3339 timestamp
    pub time: String,
}

static LOG_FEED: OnceCell<broadcast::Sender<LogEvent>> = OnceCell::new();

/// Subscribe to log events; `None` until [`init_logging`] has run
pub fn subscribe_logs() -> Option<broadcast::Receiver<LogEvent>> {
    LOG_FEED.get().map(|tx| tx.subscribe())
}

#[derive(Default)]
struct EventText {
    message: String,
    fields: String,
}

impl EventText {
    fn push_field(&mut self, name: &str, value: std::fmt::Arguments<'_>) {
        let _ = write!(self.fields, " {}={}", name, value);
    }

    fn finish(self) -> String {
        let mut text = self.message;
        text.push_str(&self.fields);
        text
    }
}

impl Visit for EventText {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.push_field(field.name(), format_args!("{}", value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.push_field(field.name(), format_args!("{:?}", value));
        }
    }
}

struct FeedLayer {
    tx: broadcast::Sender<LogEvent>,
}

impl<S> Layer<S> for FeedLayer
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut text = EventText::default();
        event.record(&mut text);
        let meta = event.metadata();
        // No receivers is the normal case when the log tail is off
        let _ = self.tx.send(LogEvent {
            level: meta.level().to_string(),
            target: meta.target().to_string(),
            message: text.finish(),
            time: chrono::Utc::now().to_rfc3339(),
        });
    }
}

/// Install the global subscriber
///
/// `RUST_LOG` wins over `CLAUSE_LOG_LEVEL`; the default level is `info`.
/// Output goes to stderr so it never interleaves with the transcript on stdout.
/// Calling it twice is harmless.
pub fn init_logging() {
    let level = std::env::var(LOG_LEVEL_VAR).unwrap_or_else(|_| "info".to_string());
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into());

    let tx = LOG_FEED
        .get_or_init(|| broadcast::channel(FEED_CAPACITY).0)
        .clone();

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(FeedLayer { tx })
        .try_init();
}
