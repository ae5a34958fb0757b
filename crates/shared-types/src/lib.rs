//! # Shared Types Crate
//!
//! Primitive value types used across the Civic Ledger workspace.
//!
//! ## Design Principles
//!
//! - **Fixed-size commitments**: the ledger never stores raw content, only
//!   32-byte Keccak-256 commitments (`Hash`).
//! - **Hex on the wire**: `Address` and `Hash` serialize as `0x`-prefixed
//!   lowercase hex so snapshots and event dumps stay human-readable.
//! - **Deterministic labels**: `Hash::of_label("issue-1")` yields the same
//!   identifier the deployment tooling derives with `keccak256(utf8(label))`.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
