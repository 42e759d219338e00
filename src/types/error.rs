//! Error types for the bank ledger
//!
//! Every guarded operation returns an [`Outcome`]: either the success value or a
//! [`BankError`] explaining why the request was declined. A declined request never
//! changes ledger state.
//!
//! # Error Categories
//!
//! - **Declines**: bad credential, bad amount, insufficient funds, unknown records,
//!   duplicate identifiers, loan payment rules
//! - **Arithmetic Errors**: overflow in balance calculations
//! - **Shell Errors**: file I/O, malformed script rows, malformed user input

use rust_decimal::Decimal;
use thiserror::Error;

/// Result of a guarded ledger operation
pub type Outcome<T> = Result<T, BankError>;

/// Main error type for the bank ledger
///
/// All variants are recoverable by the caller. Only the binary decides that an
/// I/O failure on the script or report is fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BankError {
    /// The supplied PIN does not match the account's stored credential
    #[error("Invalid PIN for account {account}")]
    InvalidCredential {
        /// Account whose credential was checked
        account: String,
    },

    /// Amount is zero or negative
    #[error("Invalid amount {amount} for {operation}")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
        /// Operation that was attempted
        operation: String,
    },

    /// Withdrawal, transfer or funded loan payment larger than the balance
    #[error("Insufficient funds in account {account}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Account being debited
        account: String,
        /// Balance at the time of the request
        balance: Decimal,
        /// Requested amount
        requested: Decimal,
    },

    #[error("Account {account} not found")]
    AccountNotFound { account: String },

    #[error("Loan {loan} not found")]
    LoanNotFound { loan: String },

    /// Payment plus interest would take the loan below zero
    #[error("Payment of {amount} plus interest {interest} exceeds the remaining balance {remaining} of loan {loan}")]
    PaymentExceedsBalance {
        loan: String,
        amount: Decimal,
        interest: Decimal,
        remaining: Decimal,
    },

    #[error("Loan {loan} is already paid off")]
    LoanPaidOff { loan: String },

    #[error("Account {account} already exists")]
    DuplicateAccount { account: String },

    #[error("Loan {loan} already exists")]
    DuplicateLoan { loan: String },

    /// Sender and recipient are the same account
    #[error("Cannot transfer from account {account} to itself")]
    SameAccountTransfer { account: String },

    #[error("Invalid interest rate {rate}")]
    InvalidRate { rate: Decimal },

    /// PIN text is not exactly four digits
    #[error("Invalid PIN format: expected 4 digits")]
    InvalidPinFormat,

    /// Arithmetic overflow would occur
    ///
    /// The operation is rejected to keep the balance representable.
    #[error("Arithmetic overflow in {operation} for {subject}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account or loan identifier
        subject: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError { message: String },

    /// CSV parsing error occurred
    ///
    /// The malformed row is skipped and the script continues.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        message: String,
    },

    #[error("Unknown command '{command}'")]
    InvalidCommand { command: String },

    #[error("{command} requires a value for '{field}'")]
    MissingField { command: String, field: String },
}

impl From<std::io::Error> for BankError {
    fn from(error: std::io::Error) -> Self {
        BankError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for BankError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        BankError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl BankError {
    pub fn invalid_credential(account: &str) -> Self {
        BankError::InvalidCredential {
            account: account.to_string(),
        }
    }

    pub fn invalid_amount(amount: Decimal, operation: &str) -> Self {
        BankError::InvalidAmount {
            amount,
            operation: operation.to_string(),
        }
    }

    pub fn insufficient_funds(account: &str, balance: Decimal, requested: Decimal) -> Self {
        BankError::InsufficientFunds {
            account: account.to_string(),
            balance,
            requested,
        }
    }

    pub fn account_not_found(account: &str) -> Self {
        BankError::AccountNotFound {
            account: account.to_string(),
        }
    }

    pub fn loan_not_found(loan: &str) -> Self {
        BankError::LoanNotFound {
            loan: loan.to_string(),
        }
    }

    pub fn payment_exceeds_balance(
        loan: &str,
        amount: Decimal,
        interest: Decimal,
        remaining: Decimal,
    ) -> Self {
        BankError::PaymentExceedsBalance {
            loan: loan.to_string(),
            amount,
            interest,
            remaining,
        }
    }

    pub fn loan_paid_off(loan: &str) -> Self {
        BankError::LoanPaidOff {
            loan: loan.to_string(),
        }
    }

    pub fn duplicate_account(account: &str) -> Self {
        BankError::DuplicateAccount {
            account: account.to_string(),
        }
    }

    pub fn duplicate_loan(loan: &str) -> Self {
        BankError::DuplicateLoan {
            loan: loan.to_string(),
        }
    }

    pub fn same_account_transfer(account: &str) -> Self {
        BankError::SameAccountTransfer {
            account: account.to_string(),
        }
    }

    pub fn arithmetic_overflow(operation: &str, subject: &str) -> Self {
        BankError::ArithmeticOverflow {
            operation: operation.to_string(),
            subject: subject.to_string(),
        }
    }

    pub fn invalid_command(command: &str) -> Self {
        BankError::InvalidCommand {
            command: command.to_string(),
        }
    }

    pub fn missing_field(command: &str, field: &str) -> Self {
        BankError::MissingField {
            command: command.to_string(),
            field: field.to_string(),
        }
    }

    /// Whether this error is a business decline rather than a shell problem
    pub fn is_decline(&self) -> bool {
        !matches!(
            self,
            BankError::IoError { .. }
                | BankError::ParseError { .. }
                | BankError::InvalidCommand { .. }
                | BankError::MissingField { .. }
                | BankError::InvalidPinFormat
        )
    }
}
