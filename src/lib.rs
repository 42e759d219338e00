//! Bank Ledger Library
//! # Overview
//!
//! An in-memory banking ledger: PIN-protected accounts with an append-only
//! transaction history, and simple-interest loans. Every guarded operation
//! either applies completely or is declined with a [`BankError`] and changes
//! nothing.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Account, Loan, Transaction, Command, errors)
//! - [`core`] - Ledger backends:
//!   - [`core::Registry`] - Single-threaded registry of accounts and loans
//!   - [`core::SharedRegistry`] - Thread-safe registry with per-record locks
//!   - [`core::Ledger`] - Operation surface shared by both
//! - [`session`] - Command execution, the interactive menu and script replay
//! - [`io`] - CSV script reading and report writing
//! - [`cli`] - CLI arguments parsing
//!
//! # Operations
//!
//! - **Deposit**: Credit an account
//! - **Withdraw**: Debit an account (requires sufficient balance)
//! - **Transfer**: Debit the sender and credit the recipient; both PINs are checked
//! - **Loan payment**: Reduce a loan by the payment plus interest on what remains,
//!   optionally funded from an account
//! - **Balance / history inquiry**: PIN-gated reads

pub mod cli;
pub mod core;
pub mod io;
pub mod session;
pub mod types;

pub use core::{Ledger, Registry, SharedRegistry};
pub use session::{create_ledger, execute};
pub use types::{
    Account, AccountId, BankError, Command, Loan, LoanId, Outcome, Pin, Receipt, Transaction,
    TransactionKind,
};
