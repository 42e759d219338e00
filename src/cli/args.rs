use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Run banking commands against an in-memory ledger
#[derive(Parser, Debug)]
#[command(name = "bank-ledger")]
#[command(about = "Run banking commands against an in-memory ledger", long_about = None)]
pub struct CliArgs {
    /// Command script to replay; the interactive menu runs when omitted
    #[arg(value_name = "SCRIPT", help = "Path to a CSV command script")]
    pub script: Option<PathBuf>,

    /// Ledger backend holding accounts and loans
    #[arg(
        long = "backend",
        value_name = "BACKEND",
        default_value = "local",
        help = "Ledger backend: 'local' for single-threaded or 'shared' for per-account locking"
    )]
    pub backend: Backend,

    /// Report written to stdout after a script finishes
    #[arg(
        long = "report",
        value_name = "REPORT",
        default_value = "accounts",
        help = "Report to write after a script: 'accounts', 'loans' or 'history'"
    )]
    pub report: ReportKind,

    /// Default log level for this crate, overridden by RUST_LOG
    #[arg(
        long = "log-level",
        value_name = "LEVEL",
        default_value = "warn",
        help = "Log level written to stderr (error, warn, info, debug, trace)"
    )]
    pub log_level: String,
}

/// Available ledger backends
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    Local,
    Shared,
}

/// Reports that can follow a script run
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    Accounts,
    Loans,
    History,
}

impl CliArgs {
    /// Log filter directive used when RUST_LOG is not set
    pub fn log_filter(&self) -> String {
        format!("bank_ledger={}", self.log_level.to_lowercase())
    }
}
