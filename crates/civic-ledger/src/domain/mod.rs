//! # Domain Layer (Inner Hexagon)
//!
//! Pure ledger logic: no I/O, no clocks, no locking.
//!
//! - `entities`: `Issue`, `IssueStatus`, `Role`
//! - `roles`: `RoleRegistry`
//! - `store`: `IssueStore`
//! - `lifecycle`: `LifecycleController`, the state machine
//! - `invariants`: invariant checks used by the controller and restore
//! - `snapshot`: serializable image of the whole ledger

pub mod entities;
pub mod invariants;
pub mod lifecycle;
pub mod roles;
pub mod snapshot;
pub mod store;

pub use entities::{Issue, IssueStatus, Role};
pub use invariants::{
    check_issue_consistency, check_status_sequence, check_transition, InvariantViolation,
};
pub use lifecycle::LifecycleController;
pub use roles::RoleRegistry;
pub use snapshot::{LedgerSnapshot, SNAPSHOT_VERSION};
pub use store::IssueStore;
