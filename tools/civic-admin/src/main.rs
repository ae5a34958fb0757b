//! Civic-Admin: Civic Ledger admin CLI
//!
//! ```text
//! civic-admin deploy --admin 0x...
//! civic-admin grant-officer --caller 0x<admin> --officer 0x...
//! civic-admin create-issue --caller 0x... --id label:pothole-17 \
//!     --geo label:geo --meta label:meta --media label:media
//! civic-admin assign-issue --caller 0x<admin> --id label:pothole-17 \
//!     --officer 0x... --sla-days 7
//! civic-admin events --since 0
//! ```

use anyhow::{Context, Result};
use clap::Parser;

use civic_admin::cli::Cli;
use civic_admin::commands;
use civic_telemetry::{init_telemetry, TelemetryConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut telemetry = TelemetryConfig::from_env();
    if let Some(level) = &cli.log_level {
        telemetry = telemetry.with_log_level(level.clone());
    }
    let _guard = init_telemetry(&telemetry).context("failed to initialize logging")?;

    let output = commands::run(&cli)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
