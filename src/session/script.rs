//! Script replay
//!
//! Reads a CSV command script, runs every command through [`execute`] in file
//! order and finishes by writing one CSV report of the final ledger state.
//!
//! # Error Handling
//!
//! Only failing to open the script or to write the report is returned as an
//! error. Declined commands and malformed rows are logged at `warn` and
//! counted in the [`ScriptSummary`]; replay continues with the next row.

use crate::cli::ReportKind;
use crate::core::Ledger;
use crate::io::csv_format::{write_accounts_csv, write_history_csv, write_loans_csv};
use crate::io::ScriptReader;
use crate::session::execute;
use crate::types::{BankError, Command};
use std::io::Write;
use std::path::Path;

/// Counts of what happened to each script row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    pub applied: usize,
    pub declined: usize,
    pub malformed: usize,
}

impl ScriptSummary {
    pub fn total(&self) -> usize {
        self.applied + self.declined + self.malformed
    }
}

/// Replay a script file against `ledger` and write the selected report
///
/// # Errors
///
/// `IoError` when the script cannot be opened or the report cannot be written.
pub fn run_script(
    ledger: &mut dyn Ledger,
    script: &Path,
    report: ReportKind,
    output: &mut dyn Write,
) -> Result<ScriptSummary, BankError> {
    let reader = ScriptReader::open(script)?;
    let summary = replay(ledger, reader);

    tracing::info!(
        script = %script.display(),
        applied = summary.applied,
        declined = summary.declined,
        malformed = summary.malformed,
        "script finished"
    );

    write_report(ledger, report, output)?;
    Ok(summary)
}

/// Run parsed script rows in order, continuing past failures
///
/// Failures are counted by [`BankError::is_decline`]: business declines go to
/// `declined` and shell errors to `malformed`, whichever stage raised them.
pub fn replay<I>(ledger: &mut dyn Ledger, rows: I) -> ScriptSummary
where
    I: IntoIterator<Item = Result<Command, BankError>>,
{
    let mut summary = ScriptSummary::default();

    for row in rows {
        let (name, error) = match row {
            Ok(command) => {
                let name = command.name();
                match execute(ledger, command) {
                    Ok(receipt) => {
                        summary.applied += 1;
                        tracing::info!(command = name, %receipt, "command applied");
                        continue;
                    }
                    Err(e) => (Some(name), e),
                }
            }
            Err(e) => (None, e),
        };

        if error.is_decline() {
            summary.declined += 1;
            tracing::warn!(command = name, error = %error, "command declined");
        } else {
            summary.malformed += 1;
            tracing::warn!(command = name, error = %error, "skipping malformed row");
        }
    }

    summary
}

/// Write one report of the ledger's current state
pub fn write_report(
    ledger: &dyn Ledger,
    report: ReportKind,
    output: &mut dyn Write,
) -> Result<(), BankError> {
    match report {
        ReportKind::Accounts => write_accounts_csv(&ledger.accounts(), output),
        ReportKind::Loans => write_loans_csv(&ledger.loans(), output),
        ReportKind::History => write_history_csv(&ledger.accounts(), output),
    }
}
