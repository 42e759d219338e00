//! Transaction-related types for the bank ledger
//!
//! This module defines identifiers, the PIN credential, transaction records and
//! the append-only log every account keeps.

use super::error::BankError;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Account identifier (the account number chosen at creation)
pub type AccountId = String;

/// Loan identifier
pub type LoanId = String;

/// Four-digit account credential
///
/// Stored as its numeric value; comparison is exact equality. The `Debug`
/// output never shows the digits.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pin(u16);

impl Pin {
    /// Largest value a four-digit PIN can hold
    pub const MAX: u16 = 9999;

    /// Create a PIN from its numeric value
    ///
    /// # Errors
    ///
    /// Returns `InvalidPinFormat` if the value has more than four digits.
    pub fn new(value: u16) -> Result<Self, BankError> {
        if value > Self::MAX {
            return Err(BankError::InvalidPinFormat);
        }
        Ok(Pin(value))
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl FromStr for Pin {
    type Err = BankError;

    /// Parse exactly four ASCII digits, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim();
        if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(BankError::InvalidPinFormat);
        }
        let value = digits
            .parse::<u16>()
            .map_err(|_| BankError::InvalidPinFormat)?;
        Pin::new(value)
    }
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pin(****)")
    }
}

/// Kinds of balance-affecting events recorded on an account
///
/// A transfer is recorded as `Transfer` on the sender and as `Deposit` on the
/// recipient; there is no separate incoming-transfer kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    /// Credit to the account, including the credited side of a transfer
    Deposit,

    /// Cash taken out of the account
    Withdrawal,

    /// Debited side of a transfer to another account
    Transfer,

    /// Debit that funded a loan payment
    LoanPayment,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "DEPOSIT",
            TransactionKind::Withdrawal => "WITHDRAWAL",
            TransactionKind::Transfer => "TRANSFER",
            TransactionKind::LoanPayment => "LOAN_PAYMENT",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable record of one balance-affecting event
///
/// Only the owning account creates transactions; the amount is always positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    kind: TransactionKind,
    amount: Decimal,
}

impl Transaction {
    pub(crate) fn new(kind: TransactionKind, amount: Decimal) -> Self {
        Transaction { kind, amount }
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

/// Append-only, chronologically ordered transaction history
///
/// Entries can be read but never removed or rewritten. Appending is reserved to
/// the crate so that only guarded account operations can record history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionLog {
    entries: Vec<Transaction>,
}

impl TransactionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, kind: TransactionKind, amount: Decimal) {
        self.entries.push(Transaction::new(kind, amount));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&Transaction> {
        self.entries.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Transaction] {
        &self.entries
    }
}

impl<'a> IntoIterator for &'a TransactionLog {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
