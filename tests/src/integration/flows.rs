//! # Integration Test Flows
//!
//! The full report-to-closure flow as a host drives it, observed both through
//! the query API and through a live event subscription.
//!
//! ## Flow Tested
//!
//! 1. Admin grants the officer role
//! 2. Citizen files an issue
//! 3. Admin assigns it with a 7-day deadline
//! 4. Officer submits resolution commitments
//! 5. Citizen confirms; the issue is CLOSED (wire code 5)

#[cfg(test)]
mod tests {
    use super::super::{deploy, ADMIN, CITIZEN, OFFICER, T0};
    use civic_ledger::prelude::*;
    use std::time::Duration;
    use tokio::time::timeout;

    fn b32(label: &str) -> Hash {
        Hash::of_label(label)
    }

    // =============================================================================
    // END-TO-END LIFECYCLE
    // =============================================================================

    #[test]
    fn test_creates_assigns_resolves_confirms() {
        let (ledger, clock) = deploy();
        ledger.grant_officer(ADMIN, OFFICER).unwrap();

        let issue_id = b32("issue-1");
        let created = ledger
            .create_issue(CITIZEN, issue_id, b32("geohash"), b32("meta"), b32("media"))
            .unwrap();
        assert_eq!(created.event.name(), "IssueCreated");

        clock.advance(3_600);
        let sla_due_at = clock.now() + 7 * SECONDS_PER_DAY;
        let assigned = ledger
            .assign_issue(ADMIN, issue_id, OFFICER, sla_due_at)
            .unwrap();
        assert_eq!(assigned.event.name(), "IssueAssigned");

        clock.advance(SECONDS_PER_DAY);
        let submitted = ledger
            .submit_resolution(OFFICER, issue_id, b32("res-media"), b32("proof"))
            .unwrap();
        assert_eq!(submitted.event.name(), "ResolutionSubmitted");

        clock.advance(60);
        let confirmed = ledger.confirm_resolution(CITIZEN, issue_id).unwrap();
        assert_eq!(confirmed.event.name(), "ResolutionConfirmed");

        let issue = ledger.get_issue(issue_id).unwrap();
        assert_eq!(issue.status.code(), 5);
        assert_eq!(issue.reporter, CITIZEN);
        assert_eq!(issue.geo_hash, b32("geohash"));
        assert_eq!(issue.meta_hash, b32("meta"));
        assert_eq!(issue.media_hash, b32("media"));
        assert_eq!(issue.assigned_officer, Some(OFFICER));
        assert_eq!(issue.sla_due_at, Some(sla_due_at));
        assert_eq!(issue.resolution_media_hash, Some(b32("res-media")));
        assert_eq!(issue.proof_hash, Some(b32("proof")));
        assert_eq!(issue.created_at, T0);
        assert_eq!(issue.assigned_at, Some(T0 + 3_600));
        assert_eq!(issue.resolved_at, Some(T0 + 3_600 + SECONDS_PER_DAY));
        assert_eq!(issue.confirmed_at, Some(T0 + 3_600 + SECONDS_PER_DAY + 60));
        assert!(!issue.sla_breached());

        let history = ledger.issue_history(issue_id);
        let timestamps: Vec<_> = history.iter().map(|r| r.timestamp).collect();
        assert!(timestamps.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(history.len(), 4);
    }

    #[test]
    fn test_independent_issues_progress_independently() {
        let (ledger, _) = deploy();
        ledger.grant_officer(ADMIN, OFFICER).unwrap();
        for label in ["a", "b", "c"] {
            ledger
                .create_issue(CITIZEN, b32(label), b32("geo"), b32("meta"), b32("media"))
                .unwrap();
        }
        ledger
            .assign_issue(ADMIN, b32("b"), OFFICER, T0 + SECONDS_PER_DAY)
            .unwrap();

        assert_eq!(ledger.issues_by_status(IssueStatus::Created).len(), 2);
        assert_eq!(ledger.issues_by_status(IssueStatus::Assigned).len(), 1);
        assert_eq!(
            ledger.get_issue(b32("a")).unwrap().status,
            IssueStatus::Created
        );
    }

    #[test]
    fn test_stats_track_outcomes() {
        let (ledger, _) = deploy();
        ledger.grant_officer(ADMIN, OFFICER).unwrap();
        ledger
            .create_issue(CITIZEN, b32("a"), b32("geo"), b32("meta"), b32("media"))
            .unwrap();
        let _ = ledger.create_issue(CITIZEN, b32("a"), b32("geo"), b32("meta"), b32("media"));
        let _ = ledger.confirm_resolution(CITIZEN, b32("a"));

        let stats = ledger.stats();
        assert_eq!(stats.officers_granted, 1);
        assert_eq!(stats.issues_created, 1);
        assert_eq!(stats.rejected(ErrorKind::DuplicateId), 1);
        assert_eq!(stats.rejected(ErrorKind::InvalidState), 1);
    }

    // =============================================================================
    // LIVE SUBSCRIPTION
    // =============================================================================

    #[tokio::test]
    async fn test_subscriber_receives_lifecycle_in_commit_order() {
        let (ledger, _) = deploy();
        let mut rx = ledger.subscribe();

        ledger.grant_officer(ADMIN, OFFICER).unwrap();
        ledger
            .create_issue(CITIZEN, b32("x"), b32("geo"), b32("meta"), b32("media"))
            .unwrap();
        // Rejected: must not reach the subscriber.
        let _ = ledger.confirm_resolution(OFFICER, b32("x"));
        ledger
            .assign_issue(ADMIN, b32("x"), OFFICER, T0 + 10)
            .unwrap();

        let mut names = Vec::new();
        for expected in 0..3u64 {
            let record = timeout(Duration::from_secs(1), rx.recv())
                .await
                .expect("record within timeout")
                .expect("channel open");
            assert_eq!(record.sequence, expected);
            names.push(record.event.name());
        }
        assert_eq!(names, ["OfficerGranted", "IssueCreated", "IssueAssigned"]);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_subscriber_across_threads() {
        let (ledger, _) = deploy();
        let ledger = std::sync::Arc::new(ledger);
        let mut rx = ledger.subscribe();

        let writer = {
            let ledger = std::sync::Arc::clone(&ledger);
            tokio::task::spawn_blocking(move || {
                for i in 0..10 {
                    ledger
                        .create_issue(
                            CITIZEN,
                            b32(&format!("issue-{i}")),
                            b32("geo"),
                            b32("meta"),
                            b32("media"),
                        )
                        .unwrap();
                }
            })
        };

        for expected in 0..10u64 {
            let record = timeout(Duration::from_secs(5), rx.recv())
                .await
                .expect("record within timeout")
                .expect("channel open");
            assert_eq!(record.sequence, expected);
        }
        writer.await.unwrap();
        assert_eq!(ledger.issue_count(), 10);
    }
}
