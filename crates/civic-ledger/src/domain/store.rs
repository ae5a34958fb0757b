//! # Issue Store
//!
//! Identifier-keyed issue records. Identifiers are never reused: records are
//! never deleted, and inserting an existing id fails.

use crate::domain::entities::{Issue, IssueStatus};
use crate::errors::LedgerError;
use shared_types::IssueId;
use std::collections::BTreeMap;

/// Mapping from issue identifier to issue record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueStore {
    issues: BTreeMap<IssueId, Issue>,
}

impl IssueStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up an issue, failing with `NotFound`.
    pub fn get(&self, id: &IssueId) -> Result<&Issue, LedgerError> {
        self.issues.get(id).ok_or(LedgerError::NotFound(*id))
    }

    #[must_use]
    pub fn contains(&self, id: &IssueId) -> bool {
        self.issues.contains_key(id)
    }

    /// Fails with `DuplicateId` if `id` is already in use.
    pub fn require_unused(&self, id: &IssueId) -> Result<(), LedgerError> {
        if self.contains(id) {
            Err(LedgerError::DuplicateId(*id))
        } else {
            Ok(())
        }
    }

    /// Inserts a new issue.
    pub(crate) fn insert(&mut self, issue: Issue) -> Result<(), LedgerError> {
        self.require_unused(&issue.id)?;
        self.issues.insert(issue.id, issue);
        Ok(())
    }

    /// Replaces an existing record with its validated successor.
    pub(crate) fn commit(&mut self, issue: Issue) -> Result<(), LedgerError> {
        let slot = self
            .issues
            .get_mut(&issue.id)
            .ok_or(LedgerError::NotFound(issue.id))?;
        *slot = issue;
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// All issues in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.issues.values()
    }

    /// Issues currently in `status`.
    pub fn by_status(&self, status: IssueStatus) -> impl Iterator<Item = &Issue> {
        self.issues.values().filter(move |issue| issue.status == status)
    }
}
