//! Command execution against the snapshot file.
//!
//! Every mutating command loads the snapshot, performs one operation and
//! saves the new snapshot. A rejected operation leaves the file untouched.

use crate::cli::{Cli, Command};
use anyhow::{bail, Context, Result};
use civic_ledger::config::DEFAULT_EVENT_CHANNEL_CAPACITY;
use civic_ledger::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

type Ledger = CivicLedgerService<Arc<dyn TimeSource>>;

/// Runs `cli` and returns the JSON document to print.
pub fn run(cli: &Cli) -> Result<Value> {
    let file = JsonSnapshotFile::new(&cli.state);
    let clock: Arc<dyn TimeSource> = match cli.now {
        Some(now) => Arc::new(ManualClock::new(now)),
        None => Arc::new(SystemClock),
    };

    match &cli.command {
        Command::Deploy { admin, force } => deploy(&file, *admin, *force, clock),
        Command::GrantOfficer { caller, officer } => {
            mutate(&file, clock, |l| l.grant_officer(caller.address, *officer))
        }
        Command::RevokeOfficer { caller, officer } => {
            mutate(&file, clock, |l| l.revoke_officer(caller.address, *officer))
        }
        Command::CreateIssue {
            caller,
            id,
            geo,
            meta,
            media,
        } => mutate(&file, clock, |l| {
            l.create_issue(caller.address, *id, *geo, *meta, *media)
        }),
        Command::AssignIssue {
            caller,
            id,
            officer,
            deadline,
        } => mutate(&file, clock, |l| {
            let due = deadline.due_at(l.now());
            l.assign_issue(caller.address, *id, *officer, due)
        }),
        Command::SubmitResolution {
            caller,
            id,
            media,
            proof,
        } => mutate(&file, clock, |l| {
            l.submit_resolution(caller.address, *id, *media, *proof)
        }),
        Command::ConfirmResolution { caller, id } => {
            mutate(&file, clock, |l| l.confirm_resolution(caller.address, *id))
        }
        Command::GetIssue { id } => {
            let ledger = open(&file, clock)?;
            let issue = ledger.get_issue(*id)?;
            let now = ledger.now();
            Ok(json!({
                "issue": issue,
                "status_code": issue.status.code(),
                "sla_breached": issue.sla_breached(),
                "overdue": issue.is_overdue(now),
            }))
        }
        Command::Events { since, issue } => {
            let ledger = open(&file, clock)?;
            let records: Vec<EventRecord> = match issue {
                Some(id) => ledger
                    .issue_history(*id)
                    .into_iter()
                    .filter(|r| r.sequence >= *since)
                    .collect(),
                None => ledger.events_since(*since),
            };
            Ok(serde_json::to_value(records)?)
        }
        Command::Summary => {
            let ledger = open(&file, clock)?;
            let counts: serde_json::Map<String, Value> = IssueStatus::ALL
                .iter()
                .map(|s| (s.as_str().to_string(), json!(ledger.issues_by_status(*s).len())))
                .collect();
            Ok(json!({
                "admin": ledger.admin(),
                "officers": ledger.officers(),
                "issues": ledger.issue_count(),
                "by_status": counts,
                "overdue": ledger.overdue_issues().iter().map(|i| i.id).collect::<Vec<_>>(),
                "events": ledger.events_since(0).len(),
            }))
        }
    }
}

fn deploy(
    file: &JsonSnapshotFile,
    admin: Address,
    force: bool,
    clock: Arc<dyn TimeSource>,
) -> Result<Value> {
    if file.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite it",
            file.path().display()
        );
    }
    let ledger = CivicLedgerService::new(LedgerConfig::new(admin), clock)
        .context("invalid ledger configuration")?;
    save(file, &ledger)?;
    info!(admin = %admin, state = %file.path().display(), "Ledger deployed");
    Ok(json!({
        "admin": admin,
        "state": file.path().display().to_string(),
    }))
}

fn open(file: &JsonSnapshotFile, clock: Arc<dyn TimeSource>) -> Result<Ledger> {
    let snapshot = file.load().with_context(|| {
        format!(
            "failed to load ledger state from {} (run `civic-admin deploy` first)",
            file.path().display()
        )
    })?;
    CivicLedgerService::restore(snapshot, DEFAULT_EVENT_CHANNEL_CAPACITY, clock)
        .context("ledger state is invalid")
}

fn save(file: &JsonSnapshotFile, ledger: &Ledger) -> Result<()> {
    file.save(&ledger.snapshot())
        .with_context(|| format!("failed to save ledger state to {}", file.path().display()))
}

fn mutate<F>(file: &JsonSnapshotFile, clock: Arc<dyn TimeSource>, operation: F) -> Result<Value>
where
    F: FnOnce(&Ledger) -> Result<EventRecord, LedgerError>,
{
    let ledger = open(file, clock)?;
    let record = operation(&ledger)?;
    save(file, &ledger)?;
    Ok(serde_json::to_value(record)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    const ADMIN: Address = Address::new([0xAD; 20]);
    const OFFICER: Address = Address::new([0x0F; 20]);
    const CITIZEN: Address = Address::new([0xCC; 20]);

    fn exec(state: &std::path::Path, args: &[&str]) -> Result<Value> {
        let mut argv = vec![
            "civic-admin".to_string(),
            "--state".to_string(),
            state.display().to_string(),
            "--now".to_string(),
            "1000".to_string(),
        ];
        argv.extend(args.iter().map(|a| (*a).to_string()));
        run(&Cli::try_parse_from(argv)?)
    }

    #[test]
    fn test_full_flow_through_cli() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("ledger.json");
        let (admin, officer, citizen) = (ADMIN.to_hex(), OFFICER.to_hex(), CITIZEN.to_hex());

        let out = exec(&state, &["deploy", "--admin", &admin]).unwrap();
        assert_eq!(out["admin"], admin);

        exec(&state, &["grant-officer", "--caller", &admin, "--officer", &officer]).unwrap();
        let created = exec(
            &state,
            &[
                "create-issue",
                "--caller",
                &citizen,
                "--id",
                "label:issue-1",
                "--geo",
                "label:geo",
                "--meta",
                "label:meta",
                "--media",
                "label:media",
            ],
        )
        .unwrap();
        assert_eq!(created["event"], "IssueCreated");
        assert_eq!(created["sequence"], 1);

        exec(
            &state,
            &[
                "assign-issue",
                "--caller",
                &admin,
                "--id",
                "label:issue-1",
                "--officer",
                &officer,
                "--sla-days",
                "7",
            ],
        )
        .unwrap();
        exec(
            &state,
            &[
                "submit-resolution",
                "--caller",
                &officer,
                "--id",
                "label:issue-1",
                "--media",
                "label:after",
                "--proof",
                "label:proof",
            ],
        )
        .unwrap();
        exec(
            &state,
            &[
                "confirm-resolution",
                "--caller",
                &citizen,
                "--id",
                "label:issue-1",
            ],
        )
        .unwrap();

        let issue = exec(&state, &["get-issue", "--id", "label:issue-1"]).unwrap();
        assert_eq!(issue["issue"]["status"], "CLOSED");
        assert_eq!(issue["status_code"], 5);
        assert_eq!(issue["issue"]["sla_due_at"], 1000 + 7 * 86_400);

        let events = exec(&state, &["events", "--since", "2"]).unwrap();
        assert_eq!(events.as_array().map(Vec::len), Some(3));

        let summary = exec(&state, &["summary"]).unwrap();
        assert_eq!(summary["by_status"]["CLOSED"], 1);
    }

    #[test]
    fn test_rejected_operation_keeps_file() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("ledger.json");
        let (admin, citizen) = (ADMIN.to_hex(), CITIZEN.to_hex());
        exec(&state, &["deploy", "--admin", &admin]).unwrap();
        let before = std::fs::read(&state).unwrap();

        let err = exec(&state, &["grant-officer", "--caller", &citizen, "--officer", &citizen])
            .unwrap_err();
        assert!(err.downcast_ref::<LedgerError>().is_some());
        assert_eq!(std::fs::read(&state).unwrap(), before);
    }

    #[test]
    fn test_deploy_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("ledger.json");
        let admin = ADMIN.to_hex();
        exec(&state, &["deploy", "--admin", &admin]).unwrap();
        assert!(exec(&state, &["deploy", "--admin", &admin]).is_err());
        assert!(exec(&state, &["deploy", "--admin", &admin, "--force"]).is_ok());
    }

    #[test]
    fn test_commands_require_deployed_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("missing.json");
        assert!(exec(&state, &["summary"]).is_err());
    }
}
