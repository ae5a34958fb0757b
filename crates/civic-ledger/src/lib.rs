//! # Civic Ledger - Issue Lifecycle Ledger
//!
//! Tamper-evident record of civic issues (potholes, broken lights, ...) from
//! report to closure. The ledger stores only 32-byte commitments; the actual
//! location, description and media live off-chain.
//!
//! ## Lifecycle
//!
//! ```text
//! CREATED --assign_issue--> ASSIGNED --submit_resolution--> RESOLUTION_SUBMITTED
//!                                                               |
//!                                            confirm_resolution v
//!                                                             CLOSED
//! ```
//!
//! | Operation | Who | Requires |
//! |-----------|-----|----------|
//! | `grant_officer` / `revoke_officer` | Admin | - |
//! | `create_issue` | anyone | unused, non-zero id |
//! | `assign_issue` | Admin | CREATED, officer role, deadline in the future |
//! | `submit_resolution` | assigned officer | ASSIGNED |
//! | `confirm_resolution` | reporter | RESOLUTION_SUBMITTED |
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Status only moves forward, one step at a time | `domain/invariants.rs` - `check_transition()` |
//! | Fields set at a step are never changed afterwards | `domain/invariants.rs` - `check_transition()` |
//! | Record fields agree with status | `domain/invariants.rs` - `check_issue_consistency()` |
//! | Ids are never reused | `domain/store.rs` - `IssueStore::require_unused()` |
//! | Failed operations write nothing and emit nothing | `service.rs` - `CivicLedgerService::execute()` |
//! | Event sequences are contiguous and in commit order | `events.rs` - `EventLog::append()` |
//!
//! ## Usage Example
//!
//! ```ignore
//! use civic_ledger::prelude::*;
//!
//! let ledger = CivicLedgerService::new(LedgerConfig::new(admin), SystemClock)?;
//! ledger.grant_officer(admin, officer)?;
//! ledger.create_issue(citizen, Hash::of_label("issue-1"), geo, meta, media)?;
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::adapters::{JsonSnapshotFile, ManualClock, SystemClock};
    pub use crate::config::{LedgerConfig, LedgerConfigBuilder};
    pub use crate::domain::{Issue, IssueStatus, LedgerSnapshot, Role};
    pub use crate::errors::{ConfigError, ErrorKind, LedgerError, SnapshotError};
    pub use crate::events::{EventRecord, LedgerEvent};
    pub use crate::ports::{CivicLedgerApi, TimeSource};
    pub use crate::service::{CivicLedgerService, LedgerStats};

    pub use shared_types::{Address, Hash, IssueId, Timestamp, SECONDS_PER_DAY};
}

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use config::LedgerConfig;
pub use errors::{ErrorKind, LedgerError};
pub use service::CivicLedgerService;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
