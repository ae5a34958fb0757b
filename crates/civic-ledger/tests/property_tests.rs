//! Property-based tests using proptest.
//!
//! Random operation sequences from a small pool of actors and ids, so that
//! valid and invalid calls interleave. After every call the ledger must
//! still satisfy its invariants.

use civic_ledger::domain::{check_issue_consistency, check_status_sequence, check_transition};
use civic_ledger::prelude::*;
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;

const T0: Timestamp = 1_700_000_000;

fn actor(index: u8) -> Address {
    match index % 4 {
        0 => Address::new([0xAD; 20]),
        1 => Address::new([0x0F; 20]),
        2 => Address::new([0x0E; 20]),
        _ => Address::new([0xCC; 20]),
    }
}

fn issue(index: u8) -> IssueId {
    Hash::of_label(&format!("issue-{}", index % 3))
}

#[derive(Debug, Clone)]
enum Op {
    Grant { caller: u8, officer: u8 },
    Revoke { caller: u8, officer: u8 },
    Create { caller: u8, id: u8, salt: u8 },
    Assign { caller: u8, id: u8, officer: u8, due_in: i8 },
    Submit { caller: u8, id: u8, salt: u8 },
    Confirm { caller: u8, id: u8 },
    Tick { seconds: u8 },
}

// ============================================================================
// Custom Strategies
// ============================================================================

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<u8>(), any::<u8>()).prop_map(|(caller, officer)| Op::Grant { caller, officer }),
        (any::<u8>(), any::<u8>()).prop_map(|(caller, officer)| Op::Revoke { caller, officer }),
        (any::<u8>(), any::<u8>(), any::<u8>())
            .prop_map(|(caller, id, salt)| Op::Create { caller, id, salt }),
        (any::<u8>(), any::<u8>(), any::<u8>(), any::<i8>()).prop_map(
            |(caller, id, officer, due_in)| Op::Assign {
                caller,
                id,
                officer,
                due_in
            }
        ),
        (any::<u8>(), any::<u8>(), any::<u8>())
            .prop_map(|(caller, id, salt)| Op::Submit { caller, id, salt }),
        (any::<u8>(), any::<u8>()).prop_map(|(caller, id)| Op::Confirm { caller, id }),
        any::<u8>().prop_map(|seconds| Op::Tick { seconds }),
    ]
}

fn apply(
    ledger: &CivicLedgerService<Arc<ManualClock>>,
    clock: &ManualClock,
    op: &Op,
) -> Option<Result<EventRecord, LedgerError>> {
    let salted = |salt: u8| Hash::new([salt; 32]);
    let result = match *op {
        Op::Grant { caller, officer } => ledger.grant_officer(actor(caller), actor(officer)),
        Op::Revoke { caller, officer } => ledger.revoke_officer(actor(caller), actor(officer)),
        Op::Create { caller, id, salt } => {
            ledger.create_issue(actor(caller), issue(id), salted(salt), salted(salt), salted(salt))
        }
        Op::Assign {
            caller,
            id,
            officer,
            due_in,
        } => {
            let due = clock.now().saturating_add_signed(i64::from(due_in));
            ledger.assign_issue(actor(caller), issue(id), actor(officer), due)
        }
        Op::Submit { caller, id, salt } => {
            ledger.submit_resolution(actor(caller), issue(id), salted(salt), salted(salt))
        }
        Op::Confirm { caller, id } => ledger.confirm_resolution(actor(caller), issue(id)),
        Op::Tick { seconds } => {
            clock.advance(u64::from(seconds));
            return None;
        }
    };
    Some(result)
}

// ============================================================================
// Ledger Properties
// ============================================================================

proptest! {
    /// Property: failures change nothing; successes append exactly one record
    #[test]
    fn failed_operations_leave_no_trace(ops in prop::collection::vec(arb_op(), 1..60)) {
        let clock = Arc::new(ManualClock::new(T0));
        let ledger = CivicLedgerService::new(LedgerConfig::new(actor(0)), Arc::clone(&clock)).unwrap();

        for op in &ops {
            let before = ledger.snapshot();
            match apply(&ledger, &clock, op) {
                None | Some(Err(_)) => {
                    prop_assert_eq!(ledger.snapshot(), before);
                }
                Some(Ok(record)) => {
                    let after = ledger.snapshot();
                    prop_assert_eq!(record.sequence, before.events.len() as u64);
                    prop_assert_eq!(after.events.len(), before.events.len() + 1);
                    prop_assert_eq!(after.events.last(), Some(&record));
                }
            }
        }
    }

    /// Property: statuses only move forward and committed fields never change
    #[test]
    fn issues_only_move_forward(ops in prop::collection::vec(arb_op(), 1..80)) {
        let clock = Arc::new(ManualClock::new(T0));
        let ledger = CivicLedgerService::new(LedgerConfig::new(actor(0)), Arc::clone(&clock)).unwrap();
        let mut seen: BTreeMap<IssueId, Issue> = BTreeMap::new();
        let mut history: BTreeMap<IssueId, Vec<IssueStatus>> = BTreeMap::new();

        for op in &ops {
            apply(&ledger, &clock, op);
            for current in ledger.snapshot().issues {
                prop_assert_eq!(check_issue_consistency(&current), Ok(()));
                let previous = seen.get(&current.id);
                if previous != Some(&current) {
                    prop_assert_eq!(check_transition(previous, &current), Ok(()));
                }

                let statuses = history.entry(current.id).or_default();
                if statuses.last() != Some(&current.status) {
                    statuses.push(current.status);
                }
                seen.insert(current.id, current);
            }
        }

        for statuses in history.values() {
            prop_assert_eq!(check_status_sequence(statuses), Ok(()));
        }
    }

    /// Property: any reachable state survives a snapshot round trip
    #[test]
    fn snapshot_round_trip(ops in prop::collection::vec(arb_op(), 0..40)) {
        let clock = Arc::new(ManualClock::new(T0));
        let ledger = CivicLedgerService::new(LedgerConfig::new(actor(0)), Arc::clone(&clock)).unwrap();
        for op in &ops {
            apply(&ledger, &clock, op);
        }

        let snapshot = ledger.snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: LedgerSnapshot = serde_json::from_str(&json).unwrap();
        let restored = CivicLedgerService::restore(parsed, 16, Arc::clone(&clock)).unwrap();
        prop_assert_eq!(restored.snapshot(), snapshot);
    }
}
