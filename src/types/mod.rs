//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account state and its guarded operations
//! - `loan`: Loan records and the payment rule
//! - `transaction`: Identifiers, PIN, transactions and the transaction log
//! - `command`: User requests and their receipts
//! - `error`: Error types for the bank ledger

pub mod account;
pub mod command;
pub mod error;
pub mod loan;
pub mod transaction;

pub use account::Account;
pub use command::{money, Command, Receipt};
pub use error::{BankError, Outcome};
pub use loan::Loan;
pub use transaction::{AccountId, LoanId, Pin, Transaction, TransactionKind, TransactionLog};
