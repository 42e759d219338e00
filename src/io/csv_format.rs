//! CSV format handling for command scripts and reports
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvCommand structure for deserialization
//! - Conversion from CSV rows to [`Command`] values
//! - Account, loan and history report serialization
//!
//! Conversion and report functions do no file I/O of their own, which keeps them
//! easy to test against in-memory buffers.

use crate::types::{Account, BankError, Command, Loan, Pin};
use csv::Writer;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// One row of a command script
///
/// Header: `op,id,other,amount,pin,other_pin,name,label,rate`. Which columns
/// matter depends on `op`; unused ones may be empty or missing at the end of
/// the row.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct CsvCommand {
    pub op: String,
    pub id: String,
    #[serde(default)]
    pub other: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub pin: Option<String>,
    #[serde(default)]
    pub other_pin: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub rate: Option<String>,
}

/// Non-empty trimmed value of an optional column
fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

fn required<'a>(value: &'a Option<String>, op: &str, field: &str) -> Result<&'a str, BankError> {
    present(value).ok_or_else(|| BankError::missing_field(op, field))
}

fn parse_decimal(text: &str, field: &str) -> Result<Decimal, BankError> {
    Decimal::from_str(text).map_err(|_| BankError::ParseError {
        line: None,
        message: format!("Invalid {} '{}'", field, text),
    })
}

/// Convert a CsvCommand to a Command
///
/// This function:
/// - Matches the operation name case-insensitively
/// - Checks that the columns the operation needs are present
/// - Parses amounts and rates into `Decimal` and PINs into [`Pin`]
///
/// Amount signs are not checked here; the ledger declines non-positive
/// amounts itself.
///
/// # Errors
///
/// - `InvalidCommand` for an unknown operation
/// - `MissingField` when a needed column is empty
/// - `ParseError` for a malformed number, `InvalidPinFormat` for a bad PIN
pub fn convert_csv_command(record: CsvCommand) -> Result<Command, BankError> {
    let op = record.op.trim().to_lowercase();
    let id = record.id.trim();
    if id.is_empty() {
        return Err(BankError::missing_field(&op, "id"));
    }
    let id = id.to_string();

    let amount = || -> Result<Decimal, BankError> {
        parse_decimal(required(&record.amount, &op, "amount")?, "amount")
    };
    let pin = || -> Result<Pin, BankError> { required(&record.pin, &op, "pin")?.parse() };

    let command = match op.as_str() {
        "open" => Command::CreateAccount {
            id,
            holder: required(&record.name, &op, "name")?.to_string(),
            account_type: required(&record.label, &op, "label")?.to_string(),
            pin: pin()?,
        },
        "deposit" => Command::Deposit {
            id,
            amount: amount()?,
            pin: pin()?,
        },
        "withdraw" | "withdrawal" => Command::Withdraw {
            id,
            amount: amount()?,
            pin: pin()?,
        },
        "transfer" => Command::Transfer {
            from: id,
            to: required(&record.other, &op, "other")?.to_string(),
            amount: amount()?,
            pin: pin()?,
            recipient_pin: required(&record.other_pin, &op, "other_pin")?.parse()?,
        },
        "loan" => Command::ApplyForLoan {
            id,
            borrower: required(&record.name, &op, "name")?.to_string(),
            principal: amount()?,
            rate: parse_decimal(required(&record.rate, &op, "rate")?, "rate")?,
        },
        "repay" => {
            let funding = match present(&record.other) {
                Some(account) => Some((account.to_string(), pin()?)),
                None => None,
            };
            Command::LoanPayment {
                id,
                amount: amount()?,
                funding,
            }
        }
        "balance" => Command::BalanceInquiry { id, pin: pin()? },
        "history" => Command::TransactionHistory { id, pin: pin()? },
        _ => return Err(BankError::invalid_command(record.op.trim())),
    };

    Ok(command)
}

/// Four decimal places, rounded
fn four_places(value: Decimal) -> String {
    format!("{:.4}", value.round_dp(4))
}

/// Write account states to CSV format
///
/// Columns: account, holder, type, balance, transactions (history length).
/// Rows are sorted by account identifier.
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), BankError> {
    let mut writer = Writer::from_writer(output);
    writer.write_record(["account", "holder", "type", "balance", "transactions"])?;

    let mut sorted: Vec<&Account> = accounts.iter().collect();
    sorted.sort_by(|a, b| a.id().cmp(b.id()));

    for account in sorted {
        writer.write_record(&[
            account.id().to_string(),
            account.holder().to_string(),
            account.account_type().to_string(),
            four_places(account.balance()),
            account.transaction_history().len().to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write loan states to CSV format
///
/// Columns: loan, borrower, principal, rate, remaining. Rows are sorted by loan
/// identifier.
pub fn write_loans_csv(loans: &[Loan], output: &mut dyn Write) -> Result<(), BankError> {
    let mut writer = Writer::from_writer(output);
    writer.write_record(["loan", "borrower", "principal", "rate", "remaining"])?;

    let mut sorted: Vec<&Loan> = loans.iter().collect();
    sorted.sort_by(|a, b| a.id().cmp(b.id()));

    for loan in sorted {
        writer.write_record(&[
            loan.id().to_string(),
            loan.borrower().to_string(),
            four_places(loan.principal()),
            four_places(loan.rate()),
            four_places(loan.remaining()),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write every account's transaction history to CSV format
///
/// Columns: account, seq, kind, amount. `seq` counts from 1 within each account
/// and follows the order the transactions were recorded.
pub fn write_history_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), BankError> {
    let mut writer = Writer::from_writer(output);
    writer.write_record(["account", "seq", "kind", "amount"])?;

    let mut sorted: Vec<&Account> = accounts.iter().collect();
    sorted.sort_by(|a, b| a.id().cmp(b.id()));

    for account in sorted {
        for (index, transaction) in account.transactions().iter().enumerate() {
            writer.write_record(&[
                account.id().to_string(),
                (index + 1).to_string(),
                transaction.kind().to_string(),
                four_places(transaction.amount()),
            ])?;
        }
    }

    writer.flush()?;
    Ok(())
}
