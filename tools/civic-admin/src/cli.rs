//! Command-line arguments.

use clap::{Args, Parser, Subcommand};
use shared_types::{Address, Hash, Timestamp};
use std::path::PathBuf;

/// Civic Ledger admin CLI
#[derive(Parser, Debug)]
#[command(name = "civic-admin", version)]
#[command(about = "Deploy a civic ledger and drive issue transitions against a snapshot file")]
pub struct Cli {
    /// Ledger snapshot file
    #[arg(long, env = "CL_STATE_FILE", default_value = "civic-ledger.json", global = true)]
    pub state: PathBuf,

    /// Override the current time (unix seconds) instead of the wall clock
    #[arg(long, global = true)]
    pub now: Option<Timestamp>,

    /// Log level filter (overrides CL_LOG_LEVEL; RUST_LOG still wins when set)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new, empty ledger administered by `--admin`
    Deploy {
        #[arg(long, value_parser = parse_address)]
        admin: Address,

        /// Overwrite an existing snapshot file
        #[arg(long)]
        force: bool,
    },

    /// Grant the officer role (admin only)
    GrantOfficer {
        #[command(flatten)]
        caller: CallerArg,
        #[arg(long, value_parser = parse_address)]
        officer: Address,
    },

    /// Revoke the officer role (admin only)
    RevokeOfficer {
        #[command(flatten)]
        caller: CallerArg,
        #[arg(long, value_parser = parse_address)]
        officer: Address,
    },

    /// File a new issue
    CreateIssue {
        #[command(flatten)]
        caller: CallerArg,
        #[arg(long, value_parser = parse_hash)]
        id: Hash,
        #[arg(long, value_parser = parse_hash)]
        geo: Hash,
        #[arg(long, value_parser = parse_hash)]
        meta: Hash,
        #[arg(long, value_parser = parse_hash)]
        media: Hash,
    },

    /// Assign a created issue to an officer (admin only)
    AssignIssue {
        #[command(flatten)]
        caller: CallerArg,
        #[arg(long, value_parser = parse_hash)]
        id: Hash,
        #[arg(long, value_parser = parse_address)]
        officer: Address,
        #[command(flatten)]
        deadline: DeadlineArgs,
    },

    /// Submit resolution commitments (assigned officer only)
    SubmitResolution {
        #[command(flatten)]
        caller: CallerArg,
        #[arg(long, value_parser = parse_hash)]
        id: Hash,
        #[arg(long, value_parser = parse_hash)]
        media: Hash,
        #[arg(long, value_parser = parse_hash)]
        proof: Hash,
    },

    /// Confirm a submitted resolution (reporter only)
    ConfirmResolution {
        #[command(flatten)]
        caller: CallerArg,
        #[arg(long, value_parser = parse_hash)]
        id: Hash,
    },

    /// Print one issue
    GetIssue {
        #[arg(long, value_parser = parse_hash)]
        id: Hash,
    },

    /// Print event records
    Events {
        /// First sequence number to print
        #[arg(long, default_value_t = 0)]
        since: u64,

        /// Only records concerning this issue
        #[arg(long, value_parser = parse_hash)]
        issue: Option<Hash>,
    },

    /// Print admin, officers and issue counts by status
    Summary,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct CallerArg {
    /// Identity performing the operation
    #[arg(long = "caller", value_parser = parse_address)]
    pub address: Address,
}

#[derive(Args, Debug, Clone, Copy)]
#[group(id = "deadline", required = true, multiple = false)]
pub struct DeadlineArgs {
    /// Deadline as days from now
    #[arg(long)]
    pub sla_days: Option<u64>,

    /// Deadline as an absolute unix timestamp
    #[arg(long)]
    pub sla_due_at: Option<Timestamp>,
}

impl DeadlineArgs {
    /// Resolves the deadline against `now`.
    pub fn due_at(&self, now: Timestamp) -> Timestamp {
        match (self.sla_due_at, self.sla_days) {
            (Some(due), _) => due,
            (None, Some(days)) => now.saturating_add(days.saturating_mul(shared_types::SECONDS_PER_DAY)),
            (None, None) => now,
        }
    }
}

/// Parses a hex address.
pub fn parse_address(raw: &str) -> Result<Address, String> {
    raw.trim().parse::<Address>().map_err(|e| e.to_string())
}

/// Parses a 32-byte value: hex, or `label:<text>` for the Keccak-256 of the text.
pub fn parse_hash(raw: &str) -> Result<Hash, String> {
    match raw.strip_prefix("label:") {
        Some(label) => Ok(Hash::of_label(label)),
        None => raw.trim().parse::<Hash>().map_err(|e| e.to_string()),
    }
}
