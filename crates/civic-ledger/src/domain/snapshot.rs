//! # Ledger Snapshot
//!
//! Serializable image of the full ledger state: admin, officers, issues and
//! the event log. Restoring re-validates everything, so a hand-edited or
//! truncated snapshot is rejected instead of producing a ledger that breaks
//! its own invariants.
//!
//! The event log is authoritative: restore replays it into an empty
//! controller and requires the result to equal the stored officers and
//! issues exactly.

use crate::domain::entities::Issue;
use crate::domain::invariants::check_issue_consistency;
use crate::domain::lifecycle::LifecycleController;
use crate::domain::roles::RoleRegistry;
use crate::domain::store::IssueStore;
use crate::errors::SnapshotError;
use crate::events::{EventRecord, LedgerEvent};
use serde::{Deserialize, Serialize};
use shared_types::Address;
use std::collections::BTreeSet;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Persisted ledger state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: u32,
    pub admin: Address,
    pub officers: Vec<Address>,
    pub issues: Vec<Issue>,
    pub events: Vec<EventRecord>,
}

impl LedgerSnapshot {
    /// Captures the state of `controller` and its event records.
    #[must_use]
    pub fn capture(controller: &LifecycleController, events: &[EventRecord]) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            admin: controller.roles().admin(),
            officers: controller.roles().officers().copied().collect(),
            issues: controller.issues().iter().cloned().collect(),
            events: events.to_vec(),
        }
    }

    /// Empty ledger administered by `admin`.
    #[must_use]
    pub fn genesis(admin: Address) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            admin,
            officers: Vec::new(),
            issues: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Validates the snapshot and rebuilds the controller.
    ///
    /// Returns the controller together with the event records.
    pub fn restore(self) -> Result<(LifecycleController, Vec<EventRecord>), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        if self.admin.is_zero() {
            return Err(SnapshotError::ZeroAdmin);
        }

        let mut store = IssueStore::new();
        for issue in self.issues {
            check_issue_consistency(&issue).map_err(|violation| {
                SnapshotError::InconsistentIssue {
                    id: issue.id,
                    violation,
                }
            })?;
            let id = issue.id;
            store
                .insert(issue)
                .map_err(|_| SnapshotError::DuplicateIssue(id))?;
        }

        let mut previous_timestamp = 0;
        for (expected, record) in (0u64..).zip(&self.events) {
            if record.sequence != expected {
                return Err(SnapshotError::SequenceGap {
                    expected,
                    found: record.sequence,
                });
            }
            if record.timestamp < previous_timestamp {
                return Err(SnapshotError::TimestampRegression {
                    sequence: record.sequence,
                });
            }
            previous_timestamp = record.timestamp;
        }

        let replayed = replay(self.admin, &self.events)?;
        for issue in store.iter() {
            if replayed.get_issue(&issue.id).ok() != Some(issue) {
                return Err(SnapshotError::DivergentIssue(issue.id));
            }
        }
        if let Some(extra) = replayed.issues().iter().find(|i| !store.contains(&i.id)) {
            return Err(SnapshotError::DivergentIssue(extra.id));
        }
        let officers: BTreeSet<Address> = self.officers.iter().copied().collect();
        if officers.len() != self.officers.len()
            || !officers.iter().eq(replayed.roles().officers())
        {
            return Err(SnapshotError::DivergentOfficers);
        }

        let roles = RoleRegistry::from_parts(self.admin, self.officers);
        Ok((LifecycleController::from_parts(roles, store), self.events))
    }
}

/// Re-applies `events` to an empty ledger, each at its recorded time and on
/// behalf of the only account allowed to have produced it.
fn replay(admin: Address, events: &[EventRecord]) -> Result<LifecycleController, SnapshotError> {
    let mut ctl = LifecycleController::new(admin);
    for record in events {
        let now = record.timestamp;
        let applied = match record.event.clone() {
            LedgerEvent::OfficerGranted { officer } => ctl.grant_officer(admin, officer),
            LedgerEvent::OfficerRevoked { officer } => ctl.revoke_officer(admin, officer),
            LedgerEvent::IssueCreated {
                id,
                reporter,
                geo_hash,
                meta_hash,
                media_hash,
            } => ctl.create_issue(reporter, now, id, geo_hash, meta_hash, media_hash),
            LedgerEvent::IssueAssigned {
                id,
                officer,
                sla_due_at,
            } => ctl.assign_issue(admin, now, id, officer, sla_due_at),
            LedgerEvent::ResolutionSubmitted {
                id,
                resolution_media_hash,
                proof_hash,
            } => ctl
                .get_issue(&id)
                .map(|issue| issue.assigned_officer.unwrap_or(Address::ZERO))
                .and_then(|officer| {
                    ctl.submit_resolution(officer, now, id, resolution_media_hash, proof_hash)
                }),
            LedgerEvent::ResolutionConfirmed { id } => ctl
                .get_issue(&id)
                .map(|issue| issue.reporter)
                .and_then(|reporter| ctl.confirm_resolution(reporter, now, id)),
        };
        applied.map_err(|error| SnapshotError::ReplayRejected {
            sequence: record.sequence,
            error,
        })?;
    }
    Ok(ctl)
}

// =============================================================================
// TESTS
// =============================================================================
