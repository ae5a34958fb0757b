//! # Error Types
//!
//! All error types for the civic ledger.

use crate::domain::entities::IssueStatus;
use crate::domain::invariants::InvariantViolation;
use serde::{Deserialize, Serialize};
use shared_types::{Address, IssueId};
use thiserror::Error;

// =============================================================================
// LEDGER ERRORS
// =============================================================================

/// Errors returned by ledger operations.
///
/// Every error aborts the whole operation: no state is written and no event
/// is appended.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Caller lacks the role or identity required for the operation.
    #[error("unauthorized: {caller} may not {action}")]
    Unauthorized {
        caller: Address,
        action: &'static str,
    },

    /// Issue exists but is not in the status the transition requires.
    #[error("invalid state for issue {id}: expected {expected}, found {current}")]
    InvalidState {
        id: IssueId,
        expected: IssueStatus,
        current: IssueStatus,
    },

    /// Referenced issue does not exist.
    #[error("issue not found: {0}")]
    NotFound(IssueId),

    /// Creation with an identifier already in use.
    #[error("duplicate issue id: {0}")]
    DuplicateId(IssueId),

    /// Malformed or out-of-range argument.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl LedgerError {
    /// Classifies the error for counting and matching.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::InvalidState { .. } => ErrorKind::InvalidState,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::DuplicateId(_) => ErrorKind::DuplicateId,
            Self::InvalidParameter(_) => ErrorKind::InvalidParameter,
        }
    }

    pub(crate) fn unauthorized(caller: Address, action: &'static str) -> Self {
        Self::Unauthorized { caller, action }
    }
}

/// Error taxonomy without payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ErrorKind {
    Unauthorized,
    InvalidState,
    NotFound,
    DuplicateId,
    InvalidParameter,
}

// =============================================================================
// CONFIG ERRORS
// =============================================================================

/// Errors raised while building or validating a `LedgerConfig`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The admin identity was not supplied.
    #[error("admin address is required")]
    MissingAdmin,

    /// The admin identity is the zero address.
    #[error("admin address must not be the zero address")]
    ZeroAdmin,

    /// The event channel cannot hold any record.
    #[error("event channel capacity must be greater than zero")]
    ZeroChannelCapacity,

    /// An environment variable held an unparsable value.
    #[error("invalid value for {var}: {reason}")]
    InvalidEnv { var: &'static str, reason: String },
}

// =============================================================================
// SNAPSHOT ERRORS
// =============================================================================

/// Errors raised while restoring or persisting a ledger snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Snapshot written by an incompatible format version.
    #[error("unsupported snapshot version: {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Snapshot admin is the zero address.
    #[error("snapshot admin must not be the zero address")]
    ZeroAdmin,

    /// The same issue id appears twice.
    #[error("duplicate issue in snapshot: {0}")]
    DuplicateIssue(IssueId),

    /// An issue record is inconsistent with its status.
    #[error("inconsistent issue {id}: {violation}")]
    InconsistentIssue {
        id: IssueId,
        violation: InvariantViolation,
    },

    /// Event sequence numbers are not contiguous from zero.
    #[error("event sequence gap: expected {expected}, found {found}")]
    SequenceGap { expected: u64, found: u64 },

    /// An event record is timestamped before its predecessor.
    #[error("event {sequence} is timestamped before the event preceding it")]
    TimestampRegression { sequence: u64 },

    /// Replaying the event log rejected a record.
    #[error("event {sequence} cannot be replayed: {error}")]
    ReplayRejected {
        sequence: u64,
        #[source]
        error: LedgerError,
    },

    /// An issue record differs from the one the event log produces.
    #[error("issue {0} does not match the event log")]
    DivergentIssue(IssueId),

    /// The officer set differs from the one the event log produces.
    #[error("officer set does not match the event log")]
    DivergentOfficers,

    /// Reading or writing the snapshot file failed.
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot could not be (de)serialized.
    #[error("snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// =============================================================================
// TESTS
// =============================================================================
