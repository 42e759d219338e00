//! Account-related types for the bank ledger
//!
//! An account owns its balance, its PIN and its transaction log. Every mutation
//! goes through a guarded operation that checks the credential and the amount
//! before touching anything, so a declined request leaves the account exactly as
//! it was.

use super::error::{BankError, Outcome};
use super::loan::Loan;
use super::transaction::{AccountId, Pin, Transaction, TransactionKind, TransactionLog};
use rust_decimal::Decimal;

/// Customer account
///
/// The balance always equals the signed sum of the logged transactions and is
/// never driven below zero by a debit.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    id: AccountId,
    holder: String,
    /// Free-form label such as "Savings" or "Checking"
    account_type: String,
    balance: Decimal,
    pin: Pin,
    transactions: TransactionLog,
}

impl Account {
    /// Create an empty account with a zero balance
    pub fn new(id: &str, holder: &str, account_type: &str, pin: Pin) -> Self {
        Account {
            id: id.to_string(),
            holder: holder.to_string(),
            account_type: account_type.to_string(),
            balance: Decimal::ZERO,
            pin,
            transactions: TransactionLog::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn holder(&self) -> &str {
        &self.holder
    }

    pub fn account_type(&self) -> &str {
        &self.account_type
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Exact comparison against the stored credential
    pub fn pin_check(&self, candidate: Pin) -> bool {
        self.pin == candidate
    }

    /// Full history in chronological order
    pub fn transaction_history(&self) -> &[Transaction] {
        self.transactions.as_slice()
    }

    pub fn transactions(&self) -> &TransactionLog {
        &self.transactions
    }

    /// Deposit funds into the account
    ///
    /// # Returns
    ///
    /// The new balance.
    ///
    /// # Errors
    ///
    /// - `InvalidCredential` if the PIN does not match
    /// - `InvalidAmount` if `amount <= 0`
    /// - `ArithmeticOverflow` if the balance cannot hold the result
    pub fn deposit(&mut self, amount: Decimal, pin: Pin) -> Outcome<Decimal> {
        self.authorize(pin)?;
        let new_balance = self.credit_preview(amount, "deposit")?;

        self.balance = new_balance;
        self.transactions.append(TransactionKind::Deposit, amount);
        tracing::debug!(account = %self.id, %amount, balance = %self.balance, "deposit applied");

        Ok(self.balance)
    }

    /// Withdraw funds from the account
    ///
    /// # Returns
    ///
    /// The new balance.
    ///
    /// # Errors
    ///
    /// - `InvalidCredential` if the PIN does not match
    /// - `InvalidAmount` if `amount <= 0`
    /// - `InsufficientFunds` if `amount` exceeds the balance
    pub fn withdraw(&mut self, amount: Decimal, pin: Pin) -> Outcome<Decimal> {
        self.authorize(pin)?;
        let new_balance = self.debit_preview(amount, "withdrawal")?;

        self.balance = new_balance;
        self.transactions.append(TransactionKind::Withdrawal, amount);
        tracing::debug!(account = %self.id, %amount, balance = %self.balance, "withdrawal applied");

        Ok(self.balance)
    }

    /// Move funds from this account into `recipient`
    ///
    /// Both credentials are checked before anything else. The sender records a
    /// `Transfer` and the recipient records a `Deposit`. Both balances are
    /// computed up front, so either both accounts change or neither does.
    ///
    /// # Returns
    ///
    /// The sender's new balance.
    ///
    /// # Errors
    ///
    /// - `InvalidCredential` if either PIN does not match its account
    /// - `InvalidAmount` if `amount <= 0`
    /// - `InsufficientFunds` if `amount` exceeds the sender's balance
    /// - `ArithmeticOverflow` if the recipient cannot hold the result
    pub fn transfer(
        &mut self,
        recipient: &mut Account,
        amount: Decimal,
        pin: Pin,
        recipient_pin: Pin,
    ) -> Outcome<Decimal> {
        self.authorize(pin)?;
        recipient.authorize(recipient_pin)?;

        let sender_balance = self.debit_preview(amount, "transfer")?;
        let recipient_balance = recipient.credit_preview(amount, "transfer")?;

        self.balance = sender_balance;
        recipient.balance = recipient_balance;
        self.transactions.append(TransactionKind::Transfer, amount);
        recipient.transactions.append(TransactionKind::Deposit, amount);
        tracing::debug!(
            from = %self.id,
            to = %recipient.id,
            %amount,
            "transfer applied"
        );

        Ok(self.balance)
    }

    /// Fund a payment on `loan` from this account
    ///
    /// The account is debited by `amount` and records a `LoanPayment`; the loan
    /// applies the payment with its own interest rule. The loan is quoted before
    /// either side changes, so a payment the loan would refuse leaves the account
    /// untouched too.
    ///
    /// # Returns
    ///
    /// The loan's new remaining balance.
    pub fn pay_loan(&mut self, loan: &mut Loan, amount: Decimal, pin: Pin) -> Outcome<Decimal> {
        self.authorize(pin)?;
        let new_balance = self.debit_preview(amount, "loan payment")?;
        let remaining = loan.quote_payment(amount)?;

        self.balance = new_balance;
        self.transactions.append(TransactionKind::LoanPayment, amount);
        loan.settle(remaining);
        tracing::debug!(
            account = %self.id,
            loan = %loan.id(),
            %amount,
            %remaining,
            "loan payment funded"
        );

        Ok(remaining)
    }

    fn authorize(&self, pin: Pin) -> Outcome<()> {
        if self.pin_check(pin) {
            Ok(())
        } else {
            Err(BankError::invalid_credential(&self.id))
        }
    }

    fn credit_preview(&self, amount: Decimal, operation: &str) -> Outcome<Decimal> {
        if amount <= Decimal::ZERO {
            return Err(BankError::invalid_amount(amount, operation));
        }
        self.balance
            .checked_add(amount)
            .ok_or_else(|| BankError::arithmetic_overflow(operation, &self.id))
    }

    fn debit_preview(&self, amount: Decimal, operation: &str) -> Outcome<Decimal> {
        if amount <= Decimal::ZERO {
            return Err(BankError::invalid_amount(amount, operation));
        }
        if amount > self.balance {
            return Err(BankError::insufficient_funds(
                &self.id,
                self.balance,
                amount,
            ));
        }
        self.balance
            .checked_sub(amount)
            .ok_or_else(|| BankError::arithmetic_overflow(operation, &self.id))
    }
}
