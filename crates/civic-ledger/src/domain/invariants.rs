//! # Domain Invariants
//!
//! Checks for the issue invariants:
//!
//! | Invariant | Check |
//! |-----------|-------|
//! | Fields present exactly when their transition has happened | `check_issue_consistency()` |
//! | Status advances one step at a time, never backwards | `check_transition()`, `check_status_sequence()` |
//! | Reporter, creation commitments and officer are immutable | `check_transition()` |
//! | CLOSED is terminal | `check_transition()` |
//! | Transition times never run backwards | `check_issue_consistency()` |
//!
//! The controller runs `check_transition` as a debug assertion on every
//! commit; snapshot restore runs `check_issue_consistency` on every record.

use crate::domain::entities::{Issue, IssueStatus};
use thiserror::Error;

/// A broken issue invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// A field that must be set in this status is missing.
    #[error("{field} must be set in status {status}")]
    MissingField {
        field: &'static str,
        status: IssueStatus,
    },

    /// A field that belongs to a later transition is already set.
    #[error("{field} must be unset in status {status}")]
    PrematureField {
        field: &'static str,
        status: IssueStatus,
    },

    /// Deadline does not lie strictly after the assignment time.
    #[error("sla_due_at {due} must be after assigned_at {assigned}")]
    DeadlineNotAfterAssignment { due: u64, assigned: u64 },

    /// A transition time precedes the time of an earlier transition.
    #[error("{later} {later_at} precedes {earlier} {earlier_at}")]
    TimestampOrder {
        earlier: &'static str,
        earlier_at: u64,
        later: &'static str,
        later_at: u64,
    },

    /// Status moved other than one step forward.
    #[error("illegal status change {from} -> {to}")]
    IllegalStatusChange { from: IssueStatus, to: IssueStatus },

    /// A write-once field changed value.
    #[error("immutable field {0} changed")]
    ImmutableFieldChanged(&'static str),
}

/// Verifies that the optional fields of `issue` match its status.
pub fn check_issue_consistency(issue: &Issue) -> Result<(), InvariantViolation> {
    let status = issue.status;
    let assigned = status >= IssueStatus::Assigned;
    let resolved = status >= IssueStatus::ResolutionSubmitted;
    let closed = status >= IssueStatus::Closed;

    expect_field("assigned_officer", issue.assigned_officer.is_some(), assigned, status)?;
    expect_field("sla_due_at", issue.sla_due_at.is_some(), assigned, status)?;
    expect_field("assigned_at", issue.assigned_at.is_some(), assigned, status)?;
    expect_field(
        "resolution_media_hash",
        issue.resolution_media_hash.is_some(),
        resolved,
        status,
    )?;
    expect_field("proof_hash", issue.proof_hash.is_some(), resolved, status)?;
    expect_field("resolved_at", issue.resolved_at.is_some(), resolved, status)?;
    expect_field("confirmed_at", issue.confirmed_at.is_some(), closed, status)?;

    if let (Some(due), Some(assigned)) = (issue.sla_due_at, issue.assigned_at) {
        if due <= assigned {
            return Err(InvariantViolation::DeadlineNotAfterAssignment { due, assigned });
        }
    }

    let stamps = [
        ("created_at", Some(issue.created_at)),
        ("assigned_at", issue.assigned_at),
        ("resolved_at", issue.resolved_at),
        ("confirmed_at", issue.confirmed_at),
    ];
    let mut reached = stamps
        .iter()
        .filter_map(|(field, at)| at.map(|at| (*field, at)));
    if let Some(mut previous) = reached.next() {
        for current in reached {
            if current.1 < previous.1 {
                return Err(InvariantViolation::TimestampOrder {
                    earlier: previous.0,
                    earlier_at: previous.1,
                    later: current.0,
                    later_at: current.1,
                });
            }
            previous = current;
        }
    }

    Ok(())
}

fn expect_field(
    field: &'static str,
    present: bool,
    required: bool,
    status: IssueStatus,
) -> Result<(), InvariantViolation> {
    match (present, required) {
        (false, true) => Err(InvariantViolation::MissingField { field, status }),
        (true, false) => Err(InvariantViolation::PrematureField { field, status }),
        _ => Ok(()),
    }
}

/// Verifies a committed transition from `before` to `after`.
///
/// `before == None` means `after` is a newly created issue.
pub fn check_transition(before: Option<&Issue>, after: &Issue) -> Result<(), InvariantViolation> {
    check_issue_consistency(after)?;

    let Some(before) = before else {
        return if after.status == IssueStatus::Created {
            Ok(())
        } else {
            Err(InvariantViolation::IllegalStatusChange {
                from: IssueStatus::Created,
                to: after.status,
            })
        };
    };

    if before.status.next() != Some(after.status) {
        return Err(InvariantViolation::IllegalStatusChange {
            from: before.status,
            to: after.status,
        });
    }

    unchanged("id", before.id == after.id)?;
    unchanged("reporter", before.reporter == after.reporter)?;
    unchanged("geo_hash", before.geo_hash == after.geo_hash)?;
    unchanged("meta_hash", before.meta_hash == after.meta_hash)?;
    unchanged("media_hash", before.media_hash == after.media_hash)?;
    unchanged("created_at", before.created_at == after.created_at)?;
    unchanged_once_set("assigned_officer", before.assigned_officer, after.assigned_officer)?;
    unchanged_once_set("sla_due_at", before.sla_due_at, after.sla_due_at)?;
    unchanged_once_set("assigned_at", before.assigned_at, after.assigned_at)?;
    unchanged_once_set(
        "resolution_media_hash",
        before.resolution_media_hash,
        after.resolution_media_hash,
    )?;
    unchanged_once_set("proof_hash", before.proof_hash, after.proof_hash)?;
    unchanged_once_set("resolved_at", before.resolved_at, after.resolved_at)?;

    Ok(())
}

fn unchanged(field: &'static str, equal: bool) -> Result<(), InvariantViolation> {
    if equal {
        Ok(())
    } else {
        Err(InvariantViolation::ImmutableFieldChanged(field))
    }
}

fn unchanged_once_set<T: PartialEq>(
    field: &'static str,
    before: Option<T>,
    after: Option<T>,
) -> Result<(), InvariantViolation> {
    match before {
        Some(value) if after.as_ref() != Some(&value) => {
            Err(InvariantViolation::ImmutableFieldChanged(field))
        }
        _ => Ok(()),
    }
}

/// Verifies that `observed` is a subsequence of the lifecycle order with no
/// repeats and no reversals.
pub fn check_status_sequence(observed: &[IssueStatus]) -> Result<(), InvariantViolation> {
    for pair in observed.windows(2) {
        if pair[1] <= pair[0] {
            return Err(InvariantViolation::IllegalStatusChange {
                from: pair[0],
                to: pair[1],
            });
        }
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
