use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use ts_core::Id;
use ts_models::TimesheetStatus;
use ts_queries::ApproverTab;

/// Top-level parser for the `tsa` binary
#[derive(Debug, Parser)]
#[command(name = "tsa", version, about = "Timesheet approvals over a JSON snapshot")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Snapshot file holding timesheets and approver candidates
    #[arg(short, long, global = true, env = "TSA_SNAPSHOT", default_value = "timesheets.json")]
    pub snapshot: PathBuf,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Totals for one timesheet, or every timesheet of an employee
    Summary {
        /// Timesheet id
        #[arg(long, conflicts_with = "employee")]
        id: Option<Id>,
        /// Employee id
        #[arg(long)]
        employee: Option<Id>,
    },
    /// Search an employee's timesheets
    Search {
        #[arg(long)]
        employee: Id,
        /// Only this status, e.g. "Sent for Approval"
        #[arg(long)]
        status: Option<TimesheetStatus>,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// One tab of an approver's queue
    Approvals {
        /// Approver email
        #[arg(long)]
        approver: String,
        #[arg(long, default_value = "all")]
        tab: ApproverTab,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Task rows of one timesheet
    Export {
        #[arg(long)]
        id: Id,
    },
}

/// Shared search and paging flags
#[derive(Debug, Clone, Args)]
pub struct FilterArgs {
    /// Case-insensitive text to search for
    #[arg(long)]
    pub text: Option<String>,
    /// Exact date (YYYY-MM-DD)
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub on: Option<NaiveDate>,
    #[arg(long, requires = "to")]
    pub from: Option<NaiveDate>,
    #[arg(long, requires = "from")]
    pub to: Option<NaiveDate>,
    /// Newest first
    #[arg(long)]
    pub desc: bool,
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    /// Defaults to TSA_PAGE_SIZE
    #[arg(long)]
    pub per_page: Option<usize>,
}
