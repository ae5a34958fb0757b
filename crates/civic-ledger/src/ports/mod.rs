//! Ports Layer
//!
//! - Driving port (inbound): `CivicLedgerApi`, the operations callers invoke
//! - Driven port (outbound): `TimeSource`, the host's notion of "now"

pub mod inbound;
pub mod outbound;

pub use inbound::CivicLedgerApi;
pub use outbound::TimeSource;
