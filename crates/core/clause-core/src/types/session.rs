//! Session identity

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Highest millisecond stamp handed out so far in this process
static LAST_ISSUED_MS: AtomicI64 = AtomicI64::new(0);

/// Opaque session identifier, `session_<epoch-ms>_<9 base36 chars>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Issue a new id that no earlier call in this process has returned
    ///
    /// The millisecond part is strictly increasing across calls, even when
    /// two ids are minted within the same millisecond.
    pub fn fresh() -> Self {
        let now = Utc::now().timestamp_millis();
        let mut prev = LAST_ISSUED_MS.load(Ordering::Relaxed);
        let stamp = loop {
            let next = now.max(prev + 1);
            match LAST_ISSUED_MS.compare_exchange_weak(prev, next, Ordering::SeqCst, Ordering::Relaxed)
            {
                Ok(_) => break next,
                Err(actual) => prev = actual,
            }
        };

        let mut rng = rand::thread_rng();
        let suffix: String = (0..9)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();

        SessionId(format!("session_{}_{}", stamp, suffix))
    }

    /// Borrow as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One continuous conversation context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Identifier, fresh per reset
    pub id: SessionId,
    /// When the session started
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Start a new session
    pub fn new() -> Self {
        Self {
            id: SessionId::fresh(),
            created_at: Utc::now(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
