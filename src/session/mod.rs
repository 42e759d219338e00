//! Session layer
//!
//! Turns [`Command`] values into ledger calls. Both front ends go through
//! [`execute`]:
//! - `menu` - the interactive numbered menu
//! - `script` - replay of a CSV command script followed by a report
//!
//! The backend is chosen at runtime through [`create_ledger`], so neither front
//! end knows whether it runs over the single-threaded or the shared registry.

use crate::cli::Backend;
use crate::core::{Ledger, Registry, SharedRegistry};
use crate::types::{Command, Outcome, Receipt};

pub mod menu;
pub mod script;

pub use menu::run_menu;
pub use script::{replay, run_script, write_report, ScriptSummary};

/// Create an empty ledger for the selected backend
pub fn create_ledger(backend: Backend) -> Box<dyn Ledger> {
    match backend {
        Backend::Local => Box::new(Registry::new()),
        Backend::Shared => Box::new(SharedRegistry::new()),
    }
}

/// Run one command against a ledger
///
/// A declined command leaves the ledger untouched and comes back as the
/// `BankError` describing why.
pub fn execute(ledger: &mut dyn Ledger, command: Command) -> Outcome<Receipt> {
    match command {
        Command::CreateAccount {
            id,
            holder,
            account_type,
            pin,
        } => {
            ledger.create_account(&id, &holder, &account_type, pin)?;
            Ok(Receipt::AccountCreated { id })
        }
        Command::Deposit { id, amount, pin } => {
            let balance = ledger.deposit(&id, amount, pin)?;
            Ok(Receipt::Deposited {
                id,
                amount,
                balance,
            })
        }
        Command::Withdraw { id, amount, pin } => {
            let balance = ledger.withdraw(&id, amount, pin)?;
            Ok(Receipt::Withdrawn {
                id,
                amount,
                balance,
            })
        }
        Command::Transfer {
            from,
            to,
            amount,
            pin,
            recipient_pin,
        } => {
            let balance = ledger.transfer(&from, &to, amount, pin, recipient_pin)?;
            Ok(Receipt::Transferred {
                to,
                amount,
                balance,
            })
        }
        Command::ApplyForLoan {
            id,
            borrower,
            principal,
            rate,
        } => {
            ledger.apply_for_loan(&id, &borrower, principal, rate)?;
            Ok(Receipt::LoanApproved { id })
        }
        Command::LoanPayment {
            id,
            amount,
            funding,
        } => {
            let remaining = match funding {
                Some((account, pin)) => ledger.pay_loan_from_account(&id, &account, amount, pin)?,
                None => ledger.make_loan_payment(&id, amount)?,
            };
            Ok(Receipt::LoanPaid { amount, remaining })
        }
        Command::BalanceInquiry { id, pin } => {
            let balance = ledger.balance(&id, pin)?;
            Ok(Receipt::Balance { id, balance })
        }
        Command::TransactionHistory { id, pin } => {
            let transactions = ledger.history(&id, pin)?;
            Ok(Receipt::History { id, transactions })
        }
    }
}
