//! Civic-Admin: Civic Ledger admin CLI
//!
//! Drives a ledger persisted as a JSON snapshot file. Each invocation loads
//! the snapshot, performs one operation as `--caller`, and saves it back.

pub mod cli;
pub mod commands;
