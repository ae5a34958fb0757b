//! # Persistence Tests
//!
//! Ledger state written to a snapshot file and restored into a fresh
//! service must behave exactly like the original, and tampered files must be
//! refused.

#[cfg(test)]
mod tests {
    use super::super::{deploy, ADMIN, CITIZEN, OFFICER, T0};
    use civic_ledger::prelude::*;
    use std::sync::Arc;

    fn populated() -> (CivicLedgerService<Arc<ManualClock>>, Arc<ManualClock>) {
        let (ledger, clock) = deploy();
        ledger.grant_officer(ADMIN, OFFICER).unwrap();
        ledger
            .create_issue(
                CITIZEN,
                Hash::of_label("issue-1"),
                Hash::of_label("geo"),
                Hash::of_label("meta"),
                Hash::of_label("media"),
            )
            .unwrap();
        ledger
            .assign_issue(ADMIN, Hash::of_label("issue-1"), OFFICER, T0 + SECONDS_PER_DAY)
            .unwrap();
        (ledger, clock)
    }

    #[test]
    fn test_file_round_trip_continues_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let file = JsonSnapshotFile::new(dir.path().join("ledger.json"));
        let (ledger, clock) = populated();
        file.save(&ledger.snapshot()).unwrap();

        let restored = CivicLedgerService::restore(file.load().unwrap(), 8, clock).unwrap();
        assert_eq!(restored.snapshot(), ledger.snapshot());
        assert!(restored.is_officer(OFFICER));

        let record = restored
            .submit_resolution(
                OFFICER,
                Hash::of_label("issue-1"),
                Hash::of_label("after"),
                Hash::of_label("proof"),
            )
            .unwrap();
        assert_eq!(record.sequence, 3);
        restored
            .confirm_resolution(CITIZEN, Hash::of_label("issue-1"))
            .unwrap();
        assert!(restored.get_issue(Hash::of_label("issue-1")).unwrap().is_closed());
    }

    #[test]
    fn test_snapshot_json_is_readable_by_indexers() {
        let (ledger, _) = populated();
        let json = serde_json::to_value(ledger.snapshot()).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["issues"][0]["status"], "ASSIGNED");
        assert_eq!(json["events"][2]["event"], "IssueAssigned");
        assert_eq!(json["events"][2]["sla_due_at"], T0 + SECONDS_PER_DAY);
    }

    #[test]
    fn test_tampered_status_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let (ledger, clock) = populated();
        JsonSnapshotFile::new(&path).save(&ledger.snapshot()).unwrap();

        // Claim the issue is closed without a resolution on record.
        let mut json: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        json["issues"][0]["status"] = serde_json::json!("CLOSED");
        std::fs::write(&path, serde_json::to_vec(&json).unwrap()).unwrap();

        let snapshot = JsonSnapshotFile::new(&path).load().unwrap();
        let err = CivicLedgerService::restore(snapshot, 8, clock).unwrap_err();
        assert!(matches!(err, SnapshotError::InconsistentIssue { .. }));
    }

    #[test]
    fn test_dropped_event_is_refused() {
        let (ledger, clock) = populated();
        let mut snapshot = ledger.snapshot();
        snapshot.events.remove(0);
        let err = CivicLedgerService::restore(snapshot, 8, clock).unwrap_err();
        assert!(matches!(err, SnapshotError::SequenceGap { expected: 0, found: 1 }));
    }

    #[test]
    fn test_truncated_event_tail_is_refused() {
        let (ledger, clock) = populated();
        let mut snapshot = ledger.snapshot();
        snapshot.events.pop();
        let err = CivicLedgerService::restore(snapshot, 8, clock).unwrap_err();
        assert!(
            matches!(err, SnapshotError::DivergentIssue(id) if id == Hash::of_label("issue-1"))
        );
    }

    #[test]
    fn test_rewritten_event_payload_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let (ledger, clock) = populated();
        JsonSnapshotFile::new(&path).save(&ledger.snapshot()).unwrap();

        // Point the assignment event at someone who never held the role.
        let mut json: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        json["events"][2]["officer"] = serde_json::to_value(CITIZEN).unwrap();
        std::fs::write(&path, serde_json::to_vec(&json).unwrap()).unwrap();

        let snapshot = JsonSnapshotFile::new(&path).load().unwrap();
        let err = CivicLedgerService::restore(snapshot, 8, clock).unwrap_err();
        assert!(matches!(err, SnapshotError::ReplayRejected { sequence: 2, .. }));
    }

    #[test]
    fn test_backdated_assignment_is_refused() {
        let (ledger, clock) = populated();
        let mut snapshot = ledger.snapshot();
        snapshot.issues[0].assigned_at = Some(T0 - 1);
        let err = CivicLedgerService::restore(snapshot, 8, clock).unwrap_err();
        assert!(matches!(err, SnapshotError::InconsistentIssue { .. }));
    }
}
