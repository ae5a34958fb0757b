//! Structured logging helpers.
//!
//! Ledger log records carry consistent fields so indexers and log pipelines
//! can correlate them with the event log:
//! - `subsystem`: component name (roles, lifecycle, snapshot, ...)
//! - `issue_id`: issue identifier, when the record concerns one issue

/// Log an issue-related event with standard fields.
///
/// ```rust,ignore
/// log_issue_event!(info, "lifecycle", "Issue assigned", id, officer = %officer);
/// ```
#[macro_export]
macro_rules! log_issue_event {
    ($level:ident, $subsystem:expr, $msg:expr, $issue_id:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = $subsystem,
            issue_id = %$issue_id,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a role-registry event with standard fields.
#[macro_export]
macro_rules! log_role_event {
    ($level:ident, $msg:expr, $account:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = "roles",
            account = %$account,
            $($($field)*,)?
            $msg
        )
    };
}
