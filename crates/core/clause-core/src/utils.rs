//! Utility functions and helpers

pub mod logger;
pub mod text;

// Re-export commonly used utilities
pub use self::logger::{init_logging, subscribe_logs, LogEvent};
pub use self::text::{capitalize_first, truncate_chars};
