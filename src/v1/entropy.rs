use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Source of the per-request values that make a signature unique.
pub trait Entropy: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn nonce(&self) -> String;

    fn timestamp(&self) -> i64 {
        self.now().timestamp()
    }
}

/// Wall clock and a fresh v4 UUID per request.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemEntropy;

impl Entropy for SystemEntropy {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn nonce(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Fixed clock and nonce, for reproducible signatures.
#[derive(Clone, Debug)]
pub struct FixedEntropy {
    pub now: DateTime<Utc>,
    pub nonce: String,
}

impl FixedEntropy {
    pub fn new(timestamp: i64, nonce: impl Into<String>) -> Self {
        FixedEntropy {
            now: DateTime::from_timestamp(timestamp, 0).unwrap_or_default(),
            nonce: nonce.into(),
        }
    }
}

impl Entropy for FixedEntropy {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn nonce(&self) -> String {
        self.nonce.clone()
    }
}
