//! Account and loan registry
//!
//! This module provides the `Registry` struct, the single owner of every account
//! and loan in the process and the only way to look them up.
//!
//! The Registry is responsible for:
//! - Creating accounts and loans under unique identifiers
//! - Resolving identifiers to records ("not found" is an ordinary outcome)
//! - Routing guarded operations to the right account
//! - Providing sorted listings for reports

use crate::core::traits::Ledger;
use crate::types::{Account, AccountId, BankError, Loan, LoanId, Outcome, Pin, Transaction};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Owns all accounts and loans
///
/// Accounts and loans live in two independent maps keyed by identifier. The PIN
/// is part of the account, so a single lookup answers both "does it exist" and
/// "is the credential right".
#[derive(Debug, Default)]
pub struct Registry {
    accounts: HashMap<AccountId, Account>,
    loans: HashMap<LoanId, Loan>,
}

impl Registry {
    /// Create an empty Registry
    pub fn new() -> Self {
        Registry {
            accounts: HashMap::new(),
            loans: HashMap::new(),
        }
    }

    /// Open a new account with a zero balance
    ///
    /// # Errors
    ///
    /// Returns `DuplicateAccount` if the identifier is already taken; the
    /// existing account is left untouched.
    pub fn create_account(
        &mut self,
        id: &str,
        holder: &str,
        account_type: &str,
        pin: Pin,
    ) -> Outcome<&Account> {
        if self.accounts.contains_key(id) {
            return Err(BankError::duplicate_account(id));
        }

        tracing::info!(account = id, account_type, "account created");
        Ok(self
            .accounts
            .entry(id.to_string())
            .or_insert_with(|| Account::new(id, holder, account_type, pin)))
    }

    pub fn find_account(&self, id: &str) -> Outcome<&Account> {
        self.accounts
            .get(id)
            .ok_or_else(|| BankError::account_not_found(id))
    }

    pub fn find_account_mut(&mut self, id: &str) -> Outcome<&mut Account> {
        self.accounts
            .get_mut(id)
            .ok_or_else(|| BankError::account_not_found(id))
    }

    /// Register a new loan
    ///
    /// # Errors
    ///
    /// - `DuplicateLoan` if the identifier is already taken
    /// - `InvalidAmount` / `InvalidRate` for a negative principal or a
    ///   negative rate
    pub fn apply_for_loan(
        &mut self,
        id: &str,
        borrower: &str,
        principal: Decimal,
        rate: Decimal,
    ) -> Outcome<&Loan> {
        if self.loans.contains_key(id) {
            return Err(BankError::duplicate_loan(id));
        }
        let loan = Loan::new(id, borrower, principal, rate)?;

        tracing::info!(loan = id, %principal, %rate, "loan approved");
        Ok(self.loans.entry(id.to_string()).or_insert(loan))
    }

    pub fn find_loan(&self, id: &str) -> Outcome<&Loan> {
        self.loans
            .get(id)
            .ok_or_else(|| BankError::loan_not_found(id))
    }

    pub fn find_loan_mut(&mut self, id: &str) -> Outcome<&mut Loan> {
        self.loans
            .get_mut(id)
            .ok_or_else(|| BankError::loan_not_found(id))
    }

    /// Check a credential; unknown accounts never verify
    pub fn verify_pin(&self, id: &str, pin: Pin) -> bool {
        self.accounts
            .get(id)
            .is_some_and(|account| account.pin_check(pin))
    }

    /// Transfer between two accounts held by this registry
    ///
    /// The recipient is taken out of the map for the duration of the call so
    /// both accounts can be borrowed mutably, and is always put back.
    ///
    /// # Errors
    ///
    /// - `SameAccountTransfer` if `from == to`
    /// - `AccountNotFound` for either side
    /// - anything [`Account::transfer`] declines
    pub fn transfer(
        &mut self,
        from: &str,
        to: &str,
        amount: Decimal,
        pin: Pin,
        recipient_pin: Pin,
    ) -> Outcome<Decimal> {
        if from == to {
            return Err(BankError::same_account_transfer(from));
        }
        if !self.accounts.contains_key(from) {
            return Err(BankError::account_not_found(from));
        }

        let (to_id, mut recipient) = self
            .accounts
            .remove_entry(to)
            .ok_or_else(|| BankError::account_not_found(to))?;
        let result = self
            .find_account_mut(from)
            .and_then(|sender| sender.transfer(&mut recipient, amount, pin, recipient_pin));
        self.accounts.insert(to_id, recipient);

        if result.is_ok() {
            tracing::info!(from, to, %amount, "transfer completed");
        }
        result
    }

    /// Pay a loan from an account
    ///
    /// # Errors
    ///
    /// `LoanNotFound`, `AccountNotFound`, or anything [`Account::pay_loan`]
    /// declines.
    pub fn pay_loan_from_account(
        &mut self,
        loan_id: &str,
        account_id: &str,
        amount: Decimal,
        pin: Pin,
    ) -> Outcome<Decimal> {
        let loan = self
            .loans
            .get_mut(loan_id)
            .ok_or_else(|| BankError::loan_not_found(loan_id))?;
        let account = self
            .accounts
            .get_mut(account_id)
            .ok_or_else(|| BankError::account_not_found(account_id))?;

        account.pay_loan(loan, amount, pin)
    }

    /// All accounts sorted by identifier
    ///
    /// Provides deterministic order for reports.
    pub fn accounts(&self) -> Vec<&Account> {
        let mut accounts: Vec<&Account> = self.accounts.values().collect();
        accounts.sort_by(|a, b| a.id().cmp(b.id()));
        accounts
    }

    /// All loans sorted by identifier
    pub fn loans(&self) -> Vec<&Loan> {
        let mut loans: Vec<&Loan> = self.loans.values().collect();
        loans.sort_by(|a, b| a.id().cmp(b.id()));
        loans
    }

    fn authorized(&self, id: &str, pin: Pin) -> Outcome<&Account> {
        let account = self.find_account(id)?;
        if account.pin_check(pin) {
            Ok(account)
        } else {
            Err(BankError::invalid_credential(id))
        }
    }
}

impl Ledger for Registry {
    fn create_account(
        &mut self,
        id: &str,
        holder: &str,
        account_type: &str,
        pin: Pin,
    ) -> Outcome<()> {
        Registry::create_account(self, id, holder, account_type, pin).map(|_| ())
    }

    fn contains_account(&self, id: &str) -> bool {
        self.accounts.contains_key(id)
    }

    fn find_account(&self, id: &str) -> Outcome<Account> {
        Registry::find_account(self, id).cloned()
    }

    fn deposit(&mut self, id: &str, amount: Decimal, pin: Pin) -> Outcome<Decimal> {
        self.find_account_mut(id)?.deposit(amount, pin)
    }

    fn withdraw(&mut self, id: &str, amount: Decimal, pin: Pin) -> Outcome<Decimal> {
        self.find_account_mut(id)?.withdraw(amount, pin)
    }

    fn transfer(
        &mut self,
        from: &str,
        to: &str,
        amount: Decimal,
        pin: Pin,
        recipient_pin: Pin,
    ) -> Outcome<Decimal> {
        Registry::transfer(self, from, to, amount, pin, recipient_pin)
    }

    fn balance(&self, id: &str, pin: Pin) -> Outcome<Decimal> {
        self.authorized(id, pin).map(Account::balance)
    }

    fn history(&self, id: &str, pin: Pin) -> Outcome<Vec<Transaction>> {
        self.authorized(id, pin)
            .map(|account| account.transaction_history().to_vec())
    }

    fn verify_pin(&self, id: &str, pin: Pin) -> bool {
        Registry::verify_pin(self, id, pin)
    }

    fn apply_for_loan(
        &mut self,
        id: &str,
        borrower: &str,
        principal: Decimal,
        rate: Decimal,
    ) -> Outcome<()> {
        Registry::apply_for_loan(self, id, borrower, principal, rate).map(|_| ())
    }

    fn contains_loan(&self, id: &str) -> bool {
        self.loans.contains_key(id)
    }

    fn find_loan(&self, id: &str) -> Outcome<Loan> {
        Registry::find_loan(self, id).cloned()
    }

    fn make_loan_payment(&mut self, id: &str, amount: Decimal) -> Outcome<Decimal> {
        self.find_loan_mut(id)?.make_payment(amount)
    }

    fn pay_loan_from_account(
        &mut self,
        loan_id: &str,
        account_id: &str,
        amount: Decimal,
        pin: Pin,
    ) -> Outcome<Decimal> {
        Registry::pay_loan_from_account(self, loan_id, account_id, amount, pin)
    }

    fn accounts(&self) -> Vec<Account> {
        Registry::accounts(self).into_iter().cloned().collect()
    }

    fn loans(&self) -> Vec<Loan> {
        Registry::loans(self).into_iter().cloned().collect()
    }
}
