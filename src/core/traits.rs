//! Core trait for ledger backends
//!
//! This module defines the operation surface shared by the single-threaded
//! [`Registry`](crate::core::Registry) and the thread-safe
//! [`SharedRegistry`](crate::core::SharedRegistry), so the menu and the script
//! runner can work against either one.

use crate::types::{Account, Loan, Outcome, Pin, Transaction};
use rust_decimal::Decimal;

/// Ledger operations over accounts and loans
///
/// The trait is object-safe and returns owned values, so a backend can be held
/// as `Box<dyn Ledger>` and lock-based backends never hand out guards.
pub trait Ledger {
    /// Open a new account; identifiers are unique
    fn create_account(
        &mut self,
        id: &str,
        holder: &str,
        account_type: &str,
        pin: Pin,
    ) -> Outcome<()>;

    /// Snapshot of an account
    fn find_account(&self, id: &str) -> Outcome<Account>;

    /// Whether an account is registered under `id`
    fn contains_account(&self, id: &str) -> bool;

    /// Deposit into an account, returning the new balance
    fn deposit(&mut self, id: &str, amount: Decimal, pin: Pin) -> Outcome<Decimal>;

    /// Withdraw from an account, returning the new balance
    fn withdraw(&mut self, id: &str, amount: Decimal, pin: Pin) -> Outcome<Decimal>;

    /// Move funds between two accounts, returning the sender's new balance
    fn transfer(
        &mut self,
        from: &str,
        to: &str,
        amount: Decimal,
        pin: Pin,
        recipient_pin: Pin,
    ) -> Outcome<Decimal>;

    /// PIN-gated balance inquiry
    fn balance(&self, id: &str, pin: Pin) -> Outcome<Decimal>;

    /// PIN-gated transaction history
    fn history(&self, id: &str, pin: Pin) -> Outcome<Vec<Transaction>>;

    /// Whether `pin` matches the account's credential; false for unknown accounts
    fn verify_pin(&self, id: &str, pin: Pin) -> bool;

    /// Register a new loan; no eligibility check is made
    fn apply_for_loan(
        &mut self,
        id: &str,
        borrower: &str,
        principal: Decimal,
        rate: Decimal,
    ) -> Outcome<()>;

    /// Snapshot of a loan
    fn find_loan(&self, id: &str) -> Outcome<Loan>;

    fn contains_loan(&self, id: &str) -> bool;

    /// Pay a loan directly, returning the remaining balance
    fn make_loan_payment(&mut self, id: &str, amount: Decimal) -> Outcome<Decimal>;

    /// Pay a loan from an account, returning the remaining loan balance
    fn pay_loan_from_account(
        &mut self,
        loan_id: &str,
        account_id: &str,
        amount: Decimal,
        pin: Pin,
    ) -> Outcome<Decimal>;

    /// All accounts sorted by identifier
    fn accounts(&self) -> Vec<Account>;

    /// All loans sorted by identifier
    fn loans(&self) -> Vec<Loan>;
}
