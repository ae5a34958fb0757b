//! # Adapters Layer (Outer Hexagon)
//!
//! - `clock`: `TimeSource` implementations
//! - `snapshot_file`: JSON snapshot persistence on the local filesystem

pub mod clock;
pub mod snapshot_file;

pub use clock::{ManualClock, SystemClock};
pub use snapshot_file::JsonSnapshotFile;
