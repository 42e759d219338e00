//! I/O module
//!
//! Handles script parsing and report output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (row conversion, report serialization)
//! - `script_reader` - Streaming command reader with iterator interface

pub mod csv_format;
pub mod script_reader;

pub use csv_format::{
    convert_csv_command, write_accounts_csv, write_history_csv, write_loans_csv, CsvCommand,
};
pub use script_reader::ScriptReader;
