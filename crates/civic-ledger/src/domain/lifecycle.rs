//! # Lifecycle Controller
//!
//! Validates and applies every state transition.
//!
//! ```text
//! CREATED ──assign──▶ ASSIGNED ──submit──▶ RESOLUTION_SUBMITTED ──confirm──▶ CLOSED
//!  (any)              (Admin)             (assigned officer)               (reporter)
//! ```
//!
//! Each operation evaluates all of its preconditions against the current
//! state, builds the successor record, and only then writes. A failed
//! precondition leaves the registry and the store untouched.
//!
//! Time is an input (`now`), never read here.

use crate::domain::entities::{Issue, IssueStatus};
use crate::domain::invariants::check_transition;
use crate::domain::roles::RoleRegistry;
use crate::domain::store::IssueStore;
use crate::errors::LedgerError;
use crate::events::LedgerEvent;
use shared_types::{Address, Hash, IssueId, Timestamp};

/// Role registry and issue store, mutated only through transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleController {
    roles: RoleRegistry,
    issues: IssueStore,
}

impl LifecycleController {
    /// Creates an empty ledger administered by `admin`.
    #[must_use]
    pub fn new(admin: Address) -> Self {
        Self {
            roles: RoleRegistry::new(admin),
            issues: IssueStore::new(),
        }
    }

    pub(crate) fn from_parts(roles: RoleRegistry, issues: IssueStore) -> Self {
        Self { roles, issues }
    }

    /// Read access to the role registry.
    #[must_use]
    pub fn roles(&self) -> &RoleRegistry {
        &self.roles
    }

    /// Read access to the issue store.
    #[must_use]
    pub fn issues(&self) -> &IssueStore {
        &self.issues
    }

    // =========================================================================
    // ROLE MANAGEMENT
    // =========================================================================

    /// Admin grants the Officer role to `officer`.
    pub fn grant_officer(
        &mut self,
        caller: Address,
        officer: Address,
    ) -> Result<LedgerEvent, LedgerError> {
        self.roles.grant_officer(&caller, officer)?;
        Ok(LedgerEvent::OfficerGranted { officer })
    }

    /// Admin revokes the Officer role from `officer`.
    ///
    /// Issues already assigned to `officer` stay assigned to it.
    pub fn revoke_officer(
        &mut self,
        caller: Address,
        officer: Address,
    ) -> Result<LedgerEvent, LedgerError> {
        self.roles.revoke_officer(&caller, officer)?;
        Ok(LedgerEvent::OfficerRevoked { officer })
    }

    // =========================================================================
    // ISSUE TRANSITIONS
    // =========================================================================

    /// Any account files a new issue.
    pub fn create_issue(
        &mut self,
        caller: Address,
        now: Timestamp,
        id: IssueId,
        geo_hash: Hash,
        meta_hash: Hash,
        media_hash: Hash,
    ) -> Result<LedgerEvent, LedgerError> {
        if id.is_zero() {
            return Err(LedgerError::InvalidParameter(
                "issue id must not be zero".to_string(),
            ));
        }
        self.issues.require_unused(&id)?;

        let issue = Issue::new(id, caller, geo_hash, meta_hash, media_hash, now);
        debug_assert_eq!(check_transition(None, &issue), Ok(()));
        self.issues.insert(issue)?;

        Ok(LedgerEvent::IssueCreated {
            id,
            reporter: caller,
            geo_hash,
            meta_hash,
            media_hash,
        })
    }

    /// Admin assigns a CREATED issue to an officer under a deadline.
    pub fn assign_issue(
        &mut self,
        caller: Address,
        now: Timestamp,
        id: IssueId,
        officer: Address,
        sla_due_at: Timestamp,
    ) -> Result<LedgerEvent, LedgerError> {
        self.roles.require_admin(&caller, "assign issues")?;
        let current = self.issues.get(&id)?;
        if !self.roles.is_officer(&officer) {
            return Err(LedgerError::InvalidParameter(format!(
                "{officer} does not hold the officer role"
            )));
        }
        require_status(current, IssueStatus::Created)?;
        if sla_due_at <= now {
            return Err(LedgerError::InvalidParameter(format!(
                "sla_due_at {sla_due_at} must be after the current time {now}"
            )));
        }

        let mut next = current.clone();
        next.status = IssueStatus::Assigned;
        next.assigned_officer = Some(officer);
        next.sla_due_at = Some(sla_due_at);
        next.assigned_at = Some(now);
        self.commit(next)?;

        Ok(LedgerEvent::IssueAssigned {
            id,
            officer,
            sla_due_at,
        })
    }

    /// The assigned officer submits proof of resolution.
    ///
    /// Submissions after the deadline are accepted; see [`Issue::sla_breached`].
    pub fn submit_resolution(
        &mut self,
        caller: Address,
        now: Timestamp,
        id: IssueId,
        resolution_media_hash: Hash,
        proof_hash: Hash,
    ) -> Result<LedgerEvent, LedgerError> {
        let current = self.issues.get(&id)?;
        if current.assigned_officer != Some(caller) {
            return Err(LedgerError::unauthorized(
                caller,
                "submit a resolution for an issue not assigned to it",
            ));
        }
        require_status(current, IssueStatus::Assigned)?;

        let mut next = current.clone();
        next.status = IssueStatus::ResolutionSubmitted;
        next.resolution_media_hash = Some(resolution_media_hash);
        next.proof_hash = Some(proof_hash);
        next.resolved_at = Some(now);
        self.commit(next)?;

        Ok(LedgerEvent::ResolutionSubmitted {
            id,
            resolution_media_hash,
            proof_hash,
        })
    }

    /// The reporter confirms the submitted resolution, closing the issue.
    pub fn confirm_resolution(
        &mut self,
        caller: Address,
        now: Timestamp,
        id: IssueId,
    ) -> Result<LedgerEvent, LedgerError> {
        let current = self.issues.get(&id)?;
        if current.reporter != caller {
            return Err(LedgerError::unauthorized(
                caller,
                "confirm a resolution for an issue it did not report",
            ));
        }
        require_status(current, IssueStatus::ResolutionSubmitted)?;

        let mut next = current.clone();
        next.status = IssueStatus::Closed;
        next.confirmed_at = Some(now);
        self.commit(next)?;

        Ok(LedgerEvent::ResolutionConfirmed { id })
    }

    /// Full record for `id`.
    pub fn get_issue(&self, id: &IssueId) -> Result<&Issue, LedgerError> {
        self.issues.get(id)
    }

    fn commit(&mut self, next: Issue) -> Result<(), LedgerError> {
        debug_assert_eq!(
            check_transition(self.issues.get(&next.id).ok(), &next),
            Ok(())
        );
        self.issues.commit(next)
    }
}

fn require_status(issue: &Issue, expected: IssueStatus) -> Result<(), LedgerError> {
    if issue.status == expected {
        Ok(())
    } else {
        Err(LedgerError::InvalidState {
            id: issue.id,
            expected,
            current: issue.status,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
