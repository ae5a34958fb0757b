//! # Civic Ledger Service
//!
//! Implements [`CivicLedgerApi`] on top of the pure [`LifecycleController`].
//!
//! ## Concurrency
//!
//! One mutex guards the controller and the event log together. An operation
//! reads the clock, evaluates every precondition, writes, and appends its
//! event while holding the lock, so operations are linearizable and the event
//! order is the commit order.
//!
//! ## Failure
//!
//! The controller checks everything before it writes. A rejected operation
//! leaves the ledger untouched, appends no event, and is counted in
//! [`LedgerStats`] by [`ErrorKind`].

use crate::config::LedgerConfig;
use crate::domain::entities::{Issue, IssueStatus, Role};
use crate::domain::lifecycle::LifecycleController;
use crate::domain::snapshot::LedgerSnapshot;
use crate::errors::{ConfigError, ErrorKind, LedgerError, SnapshotError};
use crate::events::{EventLog, EventRecord, LedgerEvent};
use crate::ports::inbound::CivicLedgerApi;
use crate::ports::outbound::TimeSource;

use civic_telemetry::{log_issue_event, log_role_event};
use parking_lot::Mutex;
use serde::Serialize;
use shared_types::{Address, Hash, IssueId, Timestamp};
use std::collections::BTreeMap;
use tokio::sync::broadcast;
use tracing::{info, instrument, warn};

// =============================================================================
// STATISTICS
// =============================================================================

/// Operation counters since the service was constructed.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerStats {
    pub officers_granted: u64,
    pub officers_revoked: u64,
    pub issues_created: u64,
    pub issues_assigned: u64,
    pub resolutions_submitted: u64,
    pub resolutions_confirmed: u64,
    /// Rejected operations by error kind.
    pub rejected: BTreeMap<ErrorKind, u64>,
}

impl LedgerStats {
    /// Accepted operations of every kind.
    #[must_use]
    pub fn total_accepted(&self) -> u64 {
        self.officers_granted
            + self.officers_revoked
            + self.issues_created
            + self.issues_assigned
            + self.resolutions_submitted
            + self.resolutions_confirmed
    }

    #[must_use]
    pub fn total_rejected(&self) -> u64 {
        self.rejected.values().sum()
    }

    /// Rejections of one kind.
    #[must_use]
    pub fn rejected(&self, kind: ErrorKind) -> u64 {
        self.rejected.get(&kind).copied().unwrap_or(0)
    }

    fn record_accepted(&mut self, event: &LedgerEvent) {
        let counter = match event {
            LedgerEvent::OfficerGranted { .. } => &mut self.officers_granted,
            LedgerEvent::OfficerRevoked { .. } => &mut self.officers_revoked,
            LedgerEvent::IssueCreated { .. } => &mut self.issues_created,
            LedgerEvent::IssueAssigned { .. } => &mut self.issues_assigned,
            LedgerEvent::ResolutionSubmitted { .. } => &mut self.resolutions_submitted,
            LedgerEvent::ResolutionConfirmed { .. } => &mut self.resolutions_confirmed,
        };
        *counter += 1;
    }

    fn record_rejected(&mut self, kind: ErrorKind) {
        *self.rejected.entry(kind).or_insert(0) += 1;
    }
}

// =============================================================================
// SERVICE
// =============================================================================

struct LedgerState {
    controller: LifecycleController,
    log: EventLog,
}

/// The civic ledger service.
pub struct CivicLedgerService<C: TimeSource> {
    config: LedgerConfig,
    clock: C,
    state: Mutex<LedgerState>,
    stats: Mutex<LedgerStats>,
}

impl<C: TimeSource> CivicLedgerService<C> {
    /// Deploys an empty ledger administered by `config.admin`.
    pub fn new(config: LedgerConfig, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            admin = %config.admin,
            event_channel_capacity = config.event_channel_capacity,
            "Civic ledger deployed"
        );
        let state = LedgerState {
            controller: LifecycleController::new(config.admin),
            log: EventLog::new(config.event_channel_capacity),
        };
        Ok(Self {
            config,
            clock,
            state: Mutex::new(state),
            stats: Mutex::new(LedgerStats::default()),
        })
    }

    /// Rebuilds a ledger from a snapshot after validating it.
    ///
    /// The admin comes from the snapshot. A zero `event_channel_capacity` is
    /// raised to one.
    pub fn restore(
        snapshot: LedgerSnapshot,
        event_channel_capacity: usize,
        clock: C,
    ) -> Result<Self, SnapshotError> {
        let (controller, records) = snapshot.restore()?;
        let config = LedgerConfig {
            admin: controller.roles().admin(),
            event_channel_capacity: event_channel_capacity.max(1),
        };
        info!(
            admin = %config.admin,
            issues = controller.issues().len(),
            events = records.len(),
            "Civic ledger restored"
        );
        let state = LedgerState {
            controller,
            log: EventLog::from_records(records, config.event_channel_capacity),
        };
        Ok(Self {
            config,
            clock,
            state: Mutex::new(state),
            stats: Mutex::new(LedgerStats::default()),
        })
    }

    #[must_use]
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Current time as seen by the ledger.
    #[must_use]
    pub fn now(&self) -> Timestamp {
        let state = self.state.lock();
        self.clock.now().max(state.log.last_timestamp())
    }

    /// Captures the full ledger state.
    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        let state = self.state.lock();
        LedgerSnapshot::capture(&state.controller, state.log.records())
    }

    /// Subscribes to records committed from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EventRecord> {
        self.state.lock().log.subscribe()
    }

    #[must_use]
    pub fn stats(&self) -> LedgerStats {
        self.stats.lock().clone()
    }

    /// Event records concerning issue `id`, in commit order.
    #[must_use]
    pub fn issue_history(&self, id: IssueId) -> Vec<EventRecord> {
        self.state.lock().log.for_issue(id).cloned().collect()
    }

    /// Assigned issues whose deadline has passed without a resolution.
    #[must_use]
    pub fn overdue_issues(&self) -> Vec<Issue> {
        let state = self.state.lock();
        let now = self.clock.now().max(state.log.last_timestamp());
        state
            .controller
            .issues()
            .by_status(IssueStatus::Assigned)
            .filter(|issue| issue.is_overdue(now))
            .cloned()
            .collect()
    }

    /// Runs one transition under the lock and commits its event.
    fn execute<F>(&self, caller: Address, apply: F) -> Result<EventRecord, LedgerError>
    where
        F: FnOnce(&mut LifecycleController, Timestamp) -> Result<LedgerEvent, LedgerError>,
    {
        let mut state = self.state.lock();
        // Commit times never run backwards, even if the clock does.
        let now = self.clock.now().max(state.log.last_timestamp());

        match apply(&mut state.controller, now) {
            Ok(event) => {
                let record = state.log.append(now, event);
                drop(state);
                self.stats.lock().record_accepted(&record.event);
                log_committed(caller, &record);
                Ok(record)
            }
            Err(err) => {
                drop(state);
                self.stats.lock().record_rejected(err.kind());
                warn!(caller = %caller, kind = ?err.kind(), error = %err, "Operation rejected");
                Err(err)
            }
        }
    }
}

fn log_committed(caller: Address, record: &EventRecord) {
    match &record.event {
        LedgerEvent::OfficerGranted { officer } => {
            log_role_event!(info, "Officer granted", officer, by = %caller, sequence = record.sequence);
        }
        LedgerEvent::OfficerRevoked { officer } => {
            log_role_event!(info, "Officer revoked", officer, by = %caller, sequence = record.sequence);
        }
        LedgerEvent::IssueCreated { id, .. } => {
            log_issue_event!(info, "lifecycle", "Issue created", id, reporter = %caller, sequence = record.sequence);
        }
        LedgerEvent::IssueAssigned {
            id,
            officer,
            sla_due_at,
        } => {
            log_issue_event!(
                info,
                "lifecycle",
                "Issue assigned",
                id,
                officer = %officer,
                sla_due_at = *sla_due_at,
                sequence = record.sequence
            );
        }
        LedgerEvent::ResolutionSubmitted { id, .. } => {
            log_issue_event!(info, "lifecycle", "Resolution submitted", id, officer = %caller, sequence = record.sequence);
        }
        LedgerEvent::ResolutionConfirmed { id } => {
            log_issue_event!(info, "lifecycle", "Issue closed", id, reporter = %caller, sequence = record.sequence);
        }
    }
}

impl<C: TimeSource> CivicLedgerApi for CivicLedgerService<C> {
    #[instrument(skip_all, fields(caller = %caller, officer = %officer))]
    fn grant_officer(&self, caller: Address, officer: Address) -> Result<EventRecord, LedgerError> {
        self.execute(caller, |ctl, _| ctl.grant_officer(caller, officer))
    }

    #[instrument(skip_all, fields(caller = %caller, officer = %officer))]
    fn revoke_officer(
        &self,
        caller: Address,
        officer: Address,
    ) -> Result<EventRecord, LedgerError> {
        self.execute(caller, |ctl, _| ctl.revoke_officer(caller, officer))
    }

    #[instrument(skip_all, fields(caller = %caller, issue_id = %id))]
    fn create_issue(
        &self,
        caller: Address,
        id: IssueId,
        geo_hash: Hash,
        meta_hash: Hash,
        media_hash: Hash,
    ) -> Result<EventRecord, LedgerError> {
        self.execute(caller, |ctl, now| {
            ctl.create_issue(caller, now, id, geo_hash, meta_hash, media_hash)
        })
    }

    #[instrument(skip_all, fields(caller = %caller, issue_id = %id, officer = %officer, sla_due_at = sla_due_at))]
    fn assign_issue(
        &self,
        caller: Address,
        id: IssueId,
        officer: Address,
        sla_due_at: Timestamp,
    ) -> Result<EventRecord, LedgerError> {
        self.execute(caller, |ctl, now| {
            ctl.assign_issue(caller, now, id, officer, sla_due_at)
        })
    }

    #[instrument(skip_all, fields(caller = %caller, issue_id = %id))]
    fn submit_resolution(
        &self,
        caller: Address,
        id: IssueId,
        resolution_media_hash: Hash,
        proof_hash: Hash,
    ) -> Result<EventRecord, LedgerError> {
        self.execute(caller, |ctl, now| {
            ctl.submit_resolution(caller, now, id, resolution_media_hash, proof_hash)
        })
    }

    #[instrument(skip_all, fields(caller = %caller, issue_id = %id))]
    fn confirm_resolution(&self, caller: Address, id: IssueId) -> Result<EventRecord, LedgerError> {
        self.execute(caller, |ctl, now| ctl.confirm_resolution(caller, now, id))
    }

    fn get_issue(&self, id: IssueId) -> Result<Issue, LedgerError> {
        self.state.lock().controller.get_issue(&id).cloned()
    }

    fn is_admin(&self, account: Address) -> bool {
        self.state.lock().controller.roles().is_admin(&account)
    }

    fn is_officer(&self, account: Address) -> bool {
        self.state.lock().controller.roles().is_officer(&account)
    }

    fn role_of(&self, account: Address) -> Role {
        self.state.lock().controller.roles().role_of(&account)
    }

    fn admin(&self) -> Address {
        self.config.admin
    }

    fn officers(&self) -> Vec<Address> {
        self.state
            .lock()
            .controller
            .roles()
            .officers()
            .copied()
            .collect()
    }

    fn issue_count(&self) -> usize {
        self.state.lock().controller.issues().len()
    }

    fn issues_by_status(&self, status: IssueStatus) -> Vec<Issue> {
        self.state
            .lock()
            .controller
            .issues()
            .by_status(status)
            .cloned()
            .collect()
    }

    fn events_since(&self, from: u64) -> Vec<EventRecord> {
        self.state.lock().log.since(from).to_vec()
    }
}

impl<C: TimeSource> std::fmt::Debug for CivicLedgerService<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("CivicLedgerService")
            .field("admin", &self.config.admin)
            .field("issues", &state.controller.issues().len())
            .field("log", &state.log)
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
