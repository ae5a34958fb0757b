//! # Role Registry
//!
//! Tracks the single Admin (fixed at construction) and the Officer set.

use crate::domain::entities::Role;
use crate::errors::LedgerError;
use shared_types::Address;
use std::collections::BTreeSet;

/// Admin identity plus the set of accounts holding the Officer role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRegistry {
    admin: Address,
    officers: BTreeSet<Address>,
}

impl RoleRegistry {
    /// Creates a registry with `admin` and no officers.
    #[must_use]
    pub fn new(admin: Address) -> Self {
        Self {
            admin,
            officers: BTreeSet::new(),
        }
    }

    /// Rebuilds a registry from persisted parts.
    pub(crate) fn from_parts(admin: Address, officers: impl IntoIterator<Item = Address>) -> Self {
        Self {
            admin,
            officers: officers.into_iter().collect(),
        }
    }

    /// The Admin identity.
    #[must_use]
    pub fn admin(&self) -> Address {
        self.admin
    }

    #[must_use]
    pub fn is_admin(&self, account: &Address) -> bool {
        *account == self.admin
    }

    #[must_use]
    pub fn is_officer(&self, account: &Address) -> bool {
        self.officers.contains(account)
    }

    /// Role of `account`. Admin takes precedence if it also holds Officer.
    #[must_use]
    pub fn role_of(&self, account: &Address) -> Role {
        if self.is_admin(account) {
            Role::Admin
        } else if self.is_officer(account) {
            Role::Officer
        } else {
            Role::None
        }
    }

    /// Officers in ascending address order.
    pub fn officers(&self) -> impl Iterator<Item = &Address> {
        self.officers.iter()
    }

    /// Fails with `Unauthorized` unless `caller` is the Admin.
    pub fn require_admin(&self, caller: &Address, action: &'static str) -> Result<(), LedgerError> {
        if self.is_admin(caller) {
            Ok(())
        } else {
            Err(LedgerError::unauthorized(*caller, action))
        }
    }

    /// Grants the Officer role. Idempotent.
    ///
    /// Returns whether the set changed.
    pub fn grant_officer(&mut self, caller: &Address, account: Address) -> Result<bool, LedgerError> {
        self.require_admin(caller, "grant the officer role")?;
        if account.is_zero() {
            return Err(LedgerError::InvalidParameter(
                "officer must not be the zero address".to_string(),
            ));
        }
        Ok(self.officers.insert(account))
    }

    /// Revokes the Officer role. Idempotent.
    ///
    /// Returns whether the set changed.
    pub fn revoke_officer(&mut self, caller: &Address, account: Address) -> Result<bool, LedgerError> {
        self.require_admin(caller, "revoke the officer role")?;
        Ok(self.officers.remove(&account))
    }
}

// =============================================================================
// TESTS
// =============================================================================
