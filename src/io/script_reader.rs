//! Command script reader with iterator interface
//!
//! Provides a streaming iterator over the commands of a CSV script. Row parsing
//! and conversion are delegated to the csv_format module.
//!
//! ```no_run
//! use bank_ledger::io::ScriptReader;
//! use std::path::Path;
//!
//! let reader = ScriptReader::open(Path::new("script.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(command) => println!("Running {}", command.name()),
//!         Err(e) => eprintln!("Skipping: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Failing to open the script is returned from `open()`
//! - Malformed rows are yielded as `ParseError` items carrying their line number,
//!   and iteration continues with the next row

use crate::io::csv_format::{convert_csv_command, CsvCommand};
use crate::types::{BankError, Command};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Streaming reader over script commands
#[derive(Debug)]
pub struct ScriptReader<R = File> {
    reader: csv::Reader<R>,
    record: StringRecord,
}

impl ScriptReader<File> {
    /// Open a script file
    ///
    /// The CSV reader is configured to:
    /// - Trim whitespace from all fields
    /// - Allow flexible field counts (trailing optional columns may be omitted)
    /// - Use an 8KB buffer
    pub fn open(path: &Path) -> Result<Self, BankError> {
        let file = File::open(path).map_err(|e| BankError::IoError {
            message: format!("Failed to open file '{}': {}", path.display(), e),
        })?;

        Ok(Self::from_reader(file))
    }
}

impl<R: Read> ScriptReader<R> {
    /// Read a script from any byte source
    pub fn from_reader(source: R) -> Self {
        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(source);

        Self {
            reader,
            record: StringRecord::new(),
        }
    }
}

/// Attach the row's line number to an error, keeping one that is already set
fn at_line(error: BankError, line: Option<u64>) -> BankError {
    match error {
        BankError::ParseError {
            line: existing,
            message,
        } => BankError::ParseError {
            line: existing.or(line),
            message,
        },
        other => BankError::ParseError {
            line,
            message: other.to_string(),
        },
    }
}

impl<R: Read> Iterator for ScriptReader<R> {
    type Item = Result<Command, BankError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(true) => {}
            Ok(false) => return None,
            Err(e) => return Some(Err(BankError::from(e))),
        }

        // Physical line where the record starts, counting blank lines and
        // line breaks inside quoted fields
        let line = self.record.position().map(|pos| pos.line());
        let headers = match self.reader.headers() {
            Ok(headers) => headers,
            Err(e) => return Some(Err(BankError::from(e))),
        };

        Some(
            self.record
                .deserialize::<CsvCommand>(Some(headers))
                .map_err(BankError::from)
                .and_then(convert_csv_command)
                .map_err(|e| at_line(e, line)),
        )
    }
}
