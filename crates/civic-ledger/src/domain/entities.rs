//! # Core Domain Entities
//!
//! The issue record, its lifecycle status, and account roles.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Hash, IssueId, Timestamp};
use std::fmt;

// =============================================================================
// ROLE
// =============================================================================

/// Role held by an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// The single, fixed administrator.
    Admin,
    /// Account allowed to be assigned issues.
    Officer,
    /// Any other account (citizens).
    None,
}

// =============================================================================
// ISSUE STATUS
// =============================================================================

/// Lifecycle status of an issue.
///
/// Declaration order is the lifecycle order; `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueStatus {
    Created,
    Assigned,
    ResolutionSubmitted,
    Closed,
}

impl IssueStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Created,
        Self::Assigned,
        Self::ResolutionSubmitted,
        Self::Closed,
    ];

    /// Wire code reported to indexers.
    ///
    /// Code 0 means "no issue" and code 4 is reserved by the deployed
    /// contract ABI; neither is ever produced here.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Created => 1,
            Self::Assigned => 2,
            Self::ResolutionSubmitted => 3,
            Self::Closed => 5,
        }
    }

    /// Inverse of [`IssueStatus::code`].
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Created),
            2 => Some(Self::Assigned),
            3 => Some(Self::ResolutionSubmitted),
            5 => Some(Self::Closed),
            _ => None,
        }
    }

    /// The only legal successor, or `None` for the terminal status.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Created => Some(Self::Assigned),
            Self::Assigned => Some(Self::ResolutionSubmitted),
            Self::ResolutionSubmitted => Some(Self::Closed),
            Self::Closed => None,
        }
    }

    /// True for CLOSED.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Upper-case name as used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Assigned => "ASSIGNED",
            Self::ResolutionSubmitted => "RESOLUTION_SUBMITTED",
            Self::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ISSUE
// =============================================================================

/// A civic-infrastructure issue report.
///
/// Fields set by a transition are `None` until that transition commits and
/// never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Unique identifier.
    pub id: IssueId,
    /// Account that created the issue.
    pub reporter: Address,
    /// Commitment to off-chain geolocation.
    pub geo_hash: Hash,
    /// Commitment to off-chain metadata.
    pub meta_hash: Hash,
    /// Commitment to off-chain media.
    pub media_hash: Hash,
    /// Current lifecycle status.
    pub status: IssueStatus,
    /// Officer responsible, set at assignment.
    pub assigned_officer: Option<Address>,
    /// Service-level deadline, set at assignment.
    pub sla_due_at: Option<Timestamp>,
    /// Commitment to resolution media, set at submission.
    pub resolution_media_hash: Option<Hash>,
    /// Commitment to proof of resolution, set at submission.
    pub proof_hash: Option<Hash>,
    pub created_at: Timestamp,
    pub assigned_at: Option<Timestamp>,
    pub resolved_at: Option<Timestamp>,
    pub confirmed_at: Option<Timestamp>,
}

impl Issue {
    /// Creates a freshly reported issue in CREATED status.
    #[must_use]
    pub fn new(
        id: IssueId,
        reporter: Address,
        geo_hash: Hash,
        meta_hash: Hash,
        media_hash: Hash,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            reporter,
            geo_hash,
            meta_hash,
            media_hash,
            status: IssueStatus::Created,
            assigned_officer: None,
            sla_due_at: None,
            resolution_media_hash: None,
            proof_hash: None,
            created_at,
            assigned_at: None,
            resolved_at: None,
            confirmed_at: None,
        }
    }

    /// True once a resolution was submitted after the SLA deadline.
    ///
    /// Late submissions are accepted; this is how the breach is observed.
    #[must_use]
    pub fn sla_breached(&self) -> bool {
        match (self.resolved_at, self.sla_due_at) {
            (Some(resolved), Some(due)) => resolved > due,
            _ => false,
        }
    }

    /// True when assigned, still unresolved, and `now` is past the deadline.
    #[must_use]
    pub fn is_overdue(&self, now: Timestamp) -> bool {
        self.status == IssueStatus::Assigned && self.sla_due_at.is_some_and(|due| now > due)
    }

    /// True once the issue reached its terminal status.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.status.is_terminal()
    }
}

// =============================================================================
// TESTS
// =============================================================================
