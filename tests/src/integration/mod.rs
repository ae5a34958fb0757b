//! Cross-crate integration tests.

pub mod flows;
pub mod persistence;

use civic_ledger::prelude::*;
use std::sync::Arc;

pub const ADMIN: Address = Address::new([0xAD; 20]);
pub const OFFICER: Address = Address::new([0x0F; 20]);
pub const CITIZEN: Address = Address::new([0xCC; 20]);
pub const T0: Timestamp = 1_700_000_000;

/// Ledger on a manual clock starting at `T0`.
pub fn deploy() -> (CivicLedgerService<Arc<ManualClock>>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(T0));
    let config = LedgerConfig::builder()
        .admin(ADMIN)
        .event_channel_capacity(64)
        .build()
        .expect("valid config");
    let ledger = CivicLedgerService::new(config, Arc::clone(&clock)).expect("valid config");
    (ledger, clock)
}
