//! # Event Log
//!
//! Append-only record of every committed operation, for off-chain indexers.
//!
//! Records are numbered from 0 with no gaps; the order is the commit order.
//! Live consumers can subscribe to a broadcast channel; a lagging or absent
//! subscriber never affects the log itself.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Hash, IssueId, Timestamp};
use tokio::sync::broadcast;

// =============================================================================
// EVENTS
// =============================================================================

/// An event emitted by a successful operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum LedgerEvent {
    OfficerGranted {
        officer: Address,
    },
    OfficerRevoked {
        officer: Address,
    },
    IssueCreated {
        id: IssueId,
        reporter: Address,
        geo_hash: Hash,
        meta_hash: Hash,
        media_hash: Hash,
    },
    IssueAssigned {
        id: IssueId,
        officer: Address,
        sla_due_at: Timestamp,
    },
    ResolutionSubmitted {
        id: IssueId,
        resolution_media_hash: Hash,
        proof_hash: Hash,
    },
    ResolutionConfirmed {
        id: IssueId,
    },
}

impl LedgerEvent {
    /// Event name as seen by indexers.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::OfficerGranted { .. } => "OfficerGranted",
            Self::OfficerRevoked { .. } => "OfficerRevoked",
            Self::IssueCreated { .. } => "IssueCreated",
            Self::IssueAssigned { .. } => "IssueAssigned",
            Self::ResolutionSubmitted { .. } => "ResolutionSubmitted",
            Self::ResolutionConfirmed { .. } => "ResolutionConfirmed",
        }
    }

    /// Issue the event concerns; `None` for role events.
    #[must_use]
    pub const fn issue_id(&self) -> Option<IssueId> {
        match self {
            Self::OfficerGranted { .. } | Self::OfficerRevoked { .. } => None,
            Self::IssueCreated { id, .. }
            | Self::IssueAssigned { id, .. }
            | Self::ResolutionSubmitted { id, .. }
            | Self::ResolutionConfirmed { id } => Some(*id),
        }
    }
}

/// A committed event with its position and commit time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the log, starting at 0.
    pub sequence: u64,
    /// Commit time.
    pub timestamp: Timestamp,
    #[serde(flatten)]
    pub event: LedgerEvent,
}

// =============================================================================
// EVENT LOG
// =============================================================================

/// Append-only event log with live fan-out.
pub struct EventLog {
    records: Vec<EventRecord>,
    sender: broadcast::Sender<EventRecord>,
}

impl EventLog {
    /// Creates an empty log whose live channel buffers `capacity` records per
    /// subscriber.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero; `LedgerConfig::validate` rejects that.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            records: Vec::new(),
            sender,
        }
    }

    /// Rebuilds a log from records whose sequences were already validated.
    pub(crate) fn from_records(records: Vec<EventRecord>, capacity: usize) -> Self {
        let mut log = Self::new(capacity);
        log.records = records;
        log
    }

    /// Appends `event` and publishes it to live subscribers.
    pub fn append(&mut self, timestamp: Timestamp, event: LedgerEvent) -> EventRecord {
        let record = EventRecord {
            sequence: self.records.len() as u64,
            timestamp,
            event,
        };
        self.records.push(record.clone());

        // No receivers is fine: the log itself is the source of truth.
        let delivered = self.sender.send(record.clone()).unwrap_or(0);
        tracing::trace!(
            sequence = record.sequence,
            event = record.event.name(),
            delivered,
            "Event appended"
        );
        record
    }

    /// Subscribes to records appended from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EventRecord> {
        self.sender.subscribe()
    }

    /// All records in commit order.
    #[must_use]
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Records with `sequence >= from`.
    #[must_use]
    pub fn since(&self, from: u64) -> &[EventRecord] {
        let start = usize::try_from(from).map_or(self.records.len(), |i| i.min(self.records.len()));
        &self.records[start..]
    }

    /// Records concerning issue `id`, in commit order.
    pub fn for_issue(&self, id: IssueId) -> impl Iterator<Item = &EventRecord> {
        self.records
            .iter()
            .filter(move |record| record.event.issue_id() == Some(id))
    }

    /// Commit time of the latest record; 0 for an empty log.
    #[must_use]
    pub fn last_timestamp(&self) -> Timestamp {
        self.records.last().map_or(0, |record| record.timestamp)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl std::fmt::Debug for EventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLog")
            .field("records", &self.records.len())
            .field("subscribers", &self.sender.receiver_count())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
