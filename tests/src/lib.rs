//! # Civic Ledger Test Suite
//!
//! Workspace-level tests that drive the ledger the way a host would.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── flows.rs         # Full issue lifecycle, live event subscription
//!     └── persistence.rs   # Snapshot file round trips and tampering
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p cl-tests
//! cargo test -p cl-tests integration::flows
//! ```

#![allow(dead_code)]

pub mod integration;
