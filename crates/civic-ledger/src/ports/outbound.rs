//! Outbound Ports (Driven Ports)
//!
//! The ledger needs one thing from its host: the current time. The
//! settlement layer supplies it in production; tests use a manual clock.

use shared_types::Timestamp;

/// Source of the current unix time in seconds.
pub trait TimeSource: Send + Sync {
    /// Current time.
    fn now(&self) -> Timestamp;
}

impl<T: TimeSource + ?Sized> TimeSource for std::sync::Arc<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
