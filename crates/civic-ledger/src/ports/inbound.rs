//! Inbound Ports (Driving Ports)
//!
//! The operations external callers invoke. `caller` is the authenticated
//! identity supplied by the host's signing layer; the ledger trusts it and
//! performs authorization against it.

use shared_types::{Address, Hash, IssueId, Timestamp};

use crate::domain::{Issue, IssueStatus, Role};
use crate::errors::LedgerError;
use crate::events::EventRecord;

/// Primary civic ledger API (Driving Port)
///
/// Mutating operations return the committed event record. On error nothing
/// was written and no event was appended.
pub trait CivicLedgerApi: Send + Sync {
    /// Admin grants the Officer role. Idempotent.
    fn grant_officer(&self, caller: Address, officer: Address) -> Result<EventRecord, LedgerError>;

    /// Admin revokes the Officer role. Idempotent.
    fn revoke_officer(&self, caller: Address, officer: Address)
        -> Result<EventRecord, LedgerError>;

    /// Any account files a new issue with its three commitments.
    fn create_issue(
        &self,
        caller: Address,
        id: IssueId,
        geo_hash: Hash,
        meta_hash: Hash,
        media_hash: Hash,
    ) -> Result<EventRecord, LedgerError>;

    /// Admin assigns a CREATED issue to an officer; `sla_due_at` must be in
    /// the future.
    fn assign_issue(
        &self,
        caller: Address,
        id: IssueId,
        officer: Address,
        sla_due_at: Timestamp,
    ) -> Result<EventRecord, LedgerError>;

    /// The assigned officer submits resolution commitments.
    fn submit_resolution(
        &self,
        caller: Address,
        id: IssueId,
        resolution_media_hash: Hash,
        proof_hash: Hash,
    ) -> Result<EventRecord, LedgerError>;

    /// The reporter confirms the resolution, closing the issue.
    fn confirm_resolution(&self, caller: Address, id: IssueId) -> Result<EventRecord, LedgerError>;

    /// Full issue record.
    fn get_issue(&self, id: IssueId) -> Result<Issue, LedgerError>;

    fn is_admin(&self, account: Address) -> bool;

    fn is_officer(&self, account: Address) -> bool;

    /// Highest role held by `account`; the admin reports `Admin` even if it
    /// was also granted the officer role.
    fn role_of(&self, account: Address) -> Role;

    /// The fixed Admin identity.
    fn admin(&self) -> Address;

    /// Current officers in ascending address order.
    fn officers(&self) -> Vec<Address>;

    fn issue_count(&self) -> usize;

    /// Issues currently in `status`, in identifier order.
    fn issues_by_status(&self, status: IssueStatus) -> Vec<Issue>;

    /// Event records with `sequence >= from`.
    fn events_since(&self, from: u64) -> Vec<EventRecord>;
}
