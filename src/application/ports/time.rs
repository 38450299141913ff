// src/application/ports/time.rs
use chrono::{DateTime, Utc};

/// Time source. Injected so expiry checks stay deterministic under test.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
