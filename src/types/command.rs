//! Requests and their confirmations
//!
//! A [`Command`] is one user request, whether it was typed at the menu or read
//! from a script. A [`Receipt`] is what an accepted command produced; its
//! `Display` is the confirmation shown to the user.

use super::transaction::{AccountId, LoanId, Pin, Transaction};
use rust_decimal::Decimal;
use std::fmt;

/// A single ledger request with all of its inputs
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateAccount {
        id: AccountId,
        holder: String,
        account_type: String,
        pin: Pin,
    },
    Deposit {
        id: AccountId,
        amount: Decimal,
        pin: Pin,
    },
    Withdraw {
        id: AccountId,
        amount: Decimal,
        pin: Pin,
    },
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: Decimal,
        pin: Pin,
        recipient_pin: Pin,
    },
    ApplyForLoan {
        id: LoanId,
        borrower: String,
        principal: Decimal,
        rate: Decimal,
    },
    /// Pay a loan directly, or from an account when `funding` is set
    LoanPayment {
        id: LoanId,
        amount: Decimal,
        funding: Option<(AccountId, Pin)>,
    },
    BalanceInquiry {
        id: AccountId,
        pin: Pin,
    },
    TransactionHistory {
        id: AccountId,
        pin: Pin,
    },
}

impl Command {
    /// Short operation name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateAccount { .. } => "open",
            Command::Deposit { .. } => "deposit",
            Command::Withdraw { .. } => "withdraw",
            Command::Transfer { .. } => "transfer",
            Command::ApplyForLoan { .. } => "loan",
            Command::LoanPayment { .. } => "repay",
            Command::BalanceInquiry { .. } => "balance",
            Command::TransactionHistory { .. } => "history",
        }
    }
}

/// Render an amount in currency units with two decimal places
pub fn money(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

/// Confirmation of an accepted command
#[derive(Debug, Clone, PartialEq)]
pub enum Receipt {
    AccountCreated {
        id: AccountId,
    },
    Deposited {
        id: AccountId,
        amount: Decimal,
        balance: Decimal,
    },
    Withdrawn {
        id: AccountId,
        amount: Decimal,
        balance: Decimal,
    },
    Transferred {
        to: AccountId,
        amount: Decimal,
        balance: Decimal,
    },
    LoanApproved {
        id: LoanId,
    },
    LoanPaid {
        amount: Decimal,
        remaining: Decimal,
    },
    Balance {
        id: AccountId,
        balance: Decimal,
    },
    History {
        id: AccountId,
        transactions: Vec<Transaction>,
    },
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Receipt::AccountCreated { id } => write!(f, "Account {} created successfully.", id),
            Receipt::Deposited {
                id,
                amount,
                balance,
            } => write!(
                f,
                "Deposited ${} into account {}. New balance: ${}",
                money(*amount),
                id,
                money(*balance)
            ),
            Receipt::Withdrawn {
                id,
                amount,
                balance,
            } => write!(
                f,
                "Withdrawn ${} from account {}. New balance: ${}",
                money(*amount),
                id,
                money(*balance)
            ),
            Receipt::Transferred {
                to,
                amount,
                balance,
            } => write!(
                f,
                "Transferred ${} to account {}. New balance: ${}",
                money(*amount),
                to,
                money(*balance)
            ),
            Receipt::LoanApproved { id } => {
                write!(f, "Loan application approved. Loan ID: {}", id)
            }
            Receipt::LoanPaid { amount, remaining } => write!(
                f,
                "Payment of ${} made. Remaining loan balance: ${}",
                money(*amount),
                money(*remaining)
            ),
            Receipt::Balance { id, balance } => {
                write!(f, "Account {} has a balance of ${}", id, money(*balance))
            }
            Receipt::History { id, transactions } => {
                if transactions.is_empty() {
                    return write!(f, "No transactions recorded for account {}.", id);
                }
                for (index, transaction) in transactions.iter().enumerate() {
                    if index > 0 {
                        writeln!(f)?;
                    }
                    write!(
                        f,
                        "Transaction Type: {}, Amount: ${}",
                        transaction.kind(),
                        money(transaction.amount())
                    )?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionKind;
    use rstest::rstest;

    #[rstest]
    #[case::created(
        Receipt::AccountCreated { id: "A1".to_string() },
        "Account A1 created successfully."
    )]
    #[case::deposited(
        Receipt::Deposited { id: "A1".to_string(), amount: Decimal::new(1005, 1), balance: Decimal::new(1005, 1) },
        "Deposited $100.50 into account A1. New balance: $100.50"
    )]
    #[case::transferred(
        Receipt::Transferred { to: "B2".to_string(), amount: Decimal::new(30, 0), balance: Decimal::new(70, 0) },
        "Transferred $30.00 to account B2. New balance: $70.00"
    )]
    #[case::loan_paid(
        Receipt::LoanPaid { amount: Decimal::new(100, 0), remaining: Decimal::new(800, 0) },
        "Payment of $100.00 made. Remaining loan balance: $800.00"
    )]
    #[case::balance(
        Receipt::Balance { id: "A1".to_string(), balance: Decimal::new(123449, 4) },
        "Account A1 has a balance of $12.34"
    )]
    #[case::empty_history(
        Receipt::History { id: "A1".to_string(), transactions: vec![] },
        "No transactions recorded for account A1."
    )]
    fn test_receipt_display(#[case] receipt: Receipt, #[case] expected: &str) {
        assert_eq!(receipt.to_string(), expected);
    }

    #[test]
    fn test_history_receipt_lists_one_line_per_transaction() {
        let receipt = Receipt::History {
            id: "A1".to_string(),
            transactions: vec![
                Transaction::new(TransactionKind::Deposit, Decimal::new(100, 0)),
                Transaction::new(TransactionKind::Transfer, Decimal::new(25, 0)),
            ],
        };

        assert_eq!(
            receipt.to_string(),
            "Transaction Type: DEPOSIT, Amount: $100.00\nTransaction Type: TRANSFER, Amount: $25.00"
        );
    }
}
