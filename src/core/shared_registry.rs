//! Thread-safe registry for concurrent callers
//!
//! This module provides the `SharedRegistry` struct, which keeps accounts and
//! loans in concurrent maps so several threads can serve requests at once.
//!
//! # Design
//!
//! Each account and each loan sits behind its own `Mutex`, stored in a `DashMap`
//! keyed by identifier. The map only hands out `Arc` handles; its shard locks are
//! released before any record lock is taken. This gives:
//! - one exclusive lock per account for deposit, withdrawal and transfer
//! - atomic check-then-insert on creation through the map's entry API
//! - no global lock on the hot path
//!
//! # Lock Ordering
//!
//! A transfer locks both accounts in identifier order, so two opposing transfers
//! cannot deadlock. A funded loan payment locks the account before the loan; no
//! code path locks a loan and then an account.

use crate::core::traits::Ledger;
use crate::types::{Account, AccountId, BankError, Loan, LoanId, Outcome, Pin, Transaction};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Shared<T> = Arc<Mutex<T>>;

/// Lock a record, recovering the guard if another thread panicked while
/// holding it
///
/// Every guarded operation validates before it writes, so a poisoned record is
/// still in a consistent state.
fn lock<T>(record: &Mutex<T>) -> MutexGuard<'_, T> {
    record.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Registry safe to share between threads
///
/// All methods take `&self`. Wrap it in an `Arc` to hand it to worker threads.
#[derive(Debug, Default)]
pub struct SharedRegistry {
    accounts: DashMap<AccountId, Shared<Account>>,
    loans: DashMap<LoanId, Shared<Loan>>,
}

impl SharedRegistry {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            loans: DashMap::new(),
        }
    }

    /// Open a new account
    ///
    /// The existence check and the insert happen under the same shard lock, so
    /// two threads racing on one identifier cannot both succeed.
    pub fn create_account(
        &self,
        id: &str,
        holder: &str,
        account_type: &str,
        pin: Pin,
    ) -> Outcome<()> {
        match self.accounts.entry(id.to_string()) {
            Entry::Occupied(_) => Err(BankError::duplicate_account(id)),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(Mutex::new(Account::new(
                    id,
                    holder,
                    account_type,
                    pin,
                ))));
                tracing::info!(account = id, account_type, "account created");
                Ok(())
            }
        }
    }

    /// Register a new loan, atomically with respect to its identifier
    pub fn apply_for_loan(
        &self,
        id: &str,
        borrower: &str,
        principal: Decimal,
        rate: Decimal,
    ) -> Outcome<()> {
        match self.loans.entry(id.to_string()) {
            Entry::Occupied(_) => Err(BankError::duplicate_loan(id)),
            Entry::Vacant(slot) => {
                let loan = Loan::new(id, borrower, principal, rate)?;
                slot.insert(Arc::new(Mutex::new(loan)));
                tracing::info!(loan = id, %principal, %rate, "loan approved");
                Ok(())
            }
        }
    }

    /// Handle to an account; the map shard is released on return
    fn account(&self, id: &str) -> Outcome<Shared<Account>> {
        self.accounts
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| BankError::account_not_found(id))
    }

    fn loan(&self, id: &str) -> Outcome<Shared<Loan>> {
        self.loans
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| BankError::loan_not_found(id))
    }

    /// Run `f` on an account while holding its lock
    pub fn with_account<T, F>(&self, id: &str, f: F) -> Outcome<T>
    where
        F: FnOnce(&mut Account) -> Outcome<T>,
    {
        let handle = self.account(id)?;
        let mut account = lock(&handle);
        f(&mut *account)
    }

    /// Run `f` on a loan while holding its lock
    pub fn with_loan<T, F>(&self, id: &str, f: F) -> Outcome<T>
    where
        F: FnOnce(&mut Loan) -> Outcome<T>,
    {
        let handle = self.loan(id)?;
        let mut loan = lock(&handle);
        f(&mut *loan)
    }

    pub fn find_account(&self, id: &str) -> Outcome<Account> {
        self.with_account(id, |account| Ok(account.clone()))
    }

    pub fn find_loan(&self, id: &str) -> Outcome<Loan> {
        self.with_loan(id, |loan| Ok(loan.clone()))
    }

    pub fn deposit(&self, id: &str, amount: Decimal, pin: Pin) -> Outcome<Decimal> {
        self.with_account(id, |account| account.deposit(amount, pin))
    }

    pub fn withdraw(&self, id: &str, amount: Decimal, pin: Pin) -> Outcome<Decimal> {
        self.with_account(id, |account| account.withdraw(amount, pin))
    }

    /// Transfer between two accounts, holding both account locks
    ///
    /// Locks are taken in identifier order regardless of direction.
    pub fn transfer(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
        pin: Pin,
        recipient_pin: Pin,
    ) -> Outcome<Decimal> {
        if from == to {
            return Err(BankError::same_account_transfer(from));
        }
        let sender_handle = self.account(from)?;
        let recipient_handle = self.account(to)?;

        let (mut sender, mut recipient) = if from < to {
            let sender = lock(&sender_handle);
            (sender, lock(&recipient_handle))
        } else {
            let recipient = lock(&recipient_handle);
            (lock(&sender_handle), recipient)
        };

        let balance = sender.transfer(&mut recipient, amount, pin, recipient_pin)?;
        tracing::info!(from, to, %amount, "transfer completed");
        Ok(balance)
    }

    pub fn make_loan_payment(&self, id: &str, amount: Decimal) -> Outcome<Decimal> {
        self.with_loan(id, |loan| loan.make_payment(amount))
    }

    /// Pay a loan from an account, holding the account lock then the loan lock
    pub fn pay_loan_from_account(
        &self,
        loan_id: &str,
        account_id: &str,
        amount: Decimal,
        pin: Pin,
    ) -> Outcome<Decimal> {
        let loan_handle = self.loan(loan_id)?;
        self.with_account(account_id, |account| {
            let mut loan = lock(&loan_handle);
            account.pay_loan(&mut loan, amount, pin)
        })
    }

    pub fn verify_pin(&self, id: &str, pin: Pin) -> bool {
        self.with_account(id, |account| Ok(account.pin_check(pin)))
            .unwrap_or(false)
    }

    fn authorized<T, F>(&self, id: &str, pin: Pin, f: F) -> Outcome<T>
    where
        F: FnOnce(&Account) -> T,
    {
        self.with_account(id, |account| {
            if account.pin_check(pin) {
                Ok(f(&*account))
            } else {
                Err(BankError::invalid_credential(id))
            }
        })
    }

    /// Snapshot of all accounts sorted by identifier
    ///
    /// Each account is copied under its own lock; the listing as a whole is not
    /// a single point-in-time view while other threads are writing.
    pub fn accounts(&self) -> Vec<Account> {
        let handles: Vec<Shared<Account>> = self
            .accounts
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        let mut accounts: Vec<Account> = handles
            .iter()
            .map(|handle| lock(handle).clone())
            .collect();
        accounts.sort_by(|a, b| a.id().cmp(b.id()));
        accounts
    }

    /// Snapshot of all loans sorted by identifier
    pub fn loans(&self) -> Vec<Loan> {
        let handles: Vec<Shared<Loan>> = self
            .loans
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        let mut loans: Vec<Loan> = handles.iter().map(|handle| lock(handle).clone()).collect();
        loans.sort_by(|a, b| a.id().cmp(b.id()));
        loans
    }
}

impl Ledger for SharedRegistry {
    fn create_account(
        &mut self,
        id: &str,
        holder: &str,
        account_type: &str,
        pin: Pin,
    ) -> Outcome<()> {
        SharedRegistry::create_account(self, id, holder, account_type, pin)
    }

    fn contains_account(&self, id: &str) -> bool {
        self.accounts.contains_key(id)
    }

    fn find_account(&self, id: &str) -> Outcome<Account> {
        SharedRegistry::find_account(self, id)
    }

    fn deposit(&mut self, id: &str, amount: Decimal, pin: Pin) -> Outcome<Decimal> {
        SharedRegistry::deposit(self, id, amount, pin)
    }

    fn withdraw(&mut self, id: &str, amount: Decimal, pin: Pin) -> Outcome<Decimal> {
        SharedRegistry::withdraw(self, id, amount, pin)
    }

    fn transfer(
        &mut self,
        from: &str,
        to: &str,
        amount: Decimal,
        pin: Pin,
        recipient_pin: Pin,
    ) -> Outcome<Decimal> {
        SharedRegistry::transfer(self, from, to, amount, pin, recipient_pin)
    }

    fn balance(&self, id: &str, pin: Pin) -> Outcome<Decimal> {
        self.authorized(id, pin, Account::balance)
    }

    fn history(&self, id: &str, pin: Pin) -> Outcome<Vec<Transaction>> {
        self.authorized(id, pin, |account| account.transaction_history().to_vec())
    }

    fn verify_pin(&self, id: &str, pin: Pin) -> bool {
        SharedRegistry::verify_pin(self, id, pin)
    }

    fn apply_for_loan(
        &mut self,
        id: &str,
        borrower: &str,
        principal: Decimal,
        rate: Decimal,
    ) -> Outcome<()> {
        SharedRegistry::apply_for_loan(self, id, borrower, principal, rate)
    }

    fn contains_loan(&self, id: &str) -> bool {
        self.loans.contains_key(id)
    }

    fn find_loan(&self, id: &str) -> Outcome<Loan> {
        SharedRegistry::find_loan(self, id)
    }

    fn make_loan_payment(&mut self, id: &str, amount: Decimal) -> Outcome<Decimal> {
        SharedRegistry::make_loan_payment(self, id, amount)
    }

    fn pay_loan_from_account(
        &mut self,
        loan_id: &str,
        account_id: &str,
        amount: Decimal,
        pin: Pin,
    ) -> Outcome<Decimal> {
        SharedRegistry::pay_loan_from_account(self, loan_id, account_id, amount, pin)
    }

    fn accounts(&self) -> Vec<Account> {
        SharedRegistry::accounts(self)
    }

    fn loans(&self) -> Vec<Loan> {
        SharedRegistry::loans(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionKind;
    use rstest::{fixture, rstest};
    use std::thread;

    fn pin(value: u16) -> Pin {
        Pin::new(value).unwrap()
    }

    fn dec(value: i64) -> Decimal {
        Decimal::new(value, 0)
    }

    /// X (PIN 1111) holds 100, Y (PIN 2222) holds 50
    #[fixture]
    fn registry() -> SharedRegistry {
        let registry = SharedRegistry::new();
        registry
            .create_account("X", "Xavier", "Savings", pin(1111))
            .unwrap();
        registry
            .create_account("Y", "Yara", "Checking", pin(2222))
            .unwrap();
        registry.deposit("X", dec(100), pin(1111)).unwrap();
        registry.deposit("Y", dec(50), pin(2222)).unwrap();
        registry
    }

    #[test]
    fn test_shared_registry_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedRegistry>();
    }

    #[rstest]
    fn test_create_account_rejects_duplicate_id(registry: SharedRegistry) {
        assert_eq!(
            registry.create_account("X", "Impostor", "Savings", pin(0)),
            Err(BankError::duplicate_account("X"))
        );
        assert_eq!(registry.find_account("X").unwrap().holder(), "Xavier");
    }

    #[rstest]
    #[case::account("Y", true, false)]
    #[case::loan("L1", false, true)]
    #[case::unknown("nope", false, false)]
    fn test_contains_records(
        registry: SharedRegistry,
        #[case] id: &str,
        #[case] is_account: bool,
        #[case] is_loan: bool,
    ) {
        registry.apply_for_loan("L1", "Yara", dec(100), dec(5)).unwrap();
        let ledger: &dyn Ledger = &registry;

        assert_eq!(ledger.contains_account(id), is_account);
        assert_eq!(ledger.contains_loan(id), is_loan);
    }

    #[rstest]
    fn test_transfer_between_accounts(registry: SharedRegistry) {
        let balance = registry
            .transfer("X", "Y", dec(30), pin(1111), pin(2222))
            .unwrap();

        assert_eq!(balance, dec(70));
        assert_eq!(registry.find_account("Y").unwrap().balance(), dec(80));
    }

    #[rstest]
    fn test_reverse_direction_transfer_uses_same_lock_order(registry: SharedRegistry) {
        let balance = registry
            .transfer("Y", "X", dec(50), pin(2222), pin(1111))
            .unwrap();

        assert_eq!(balance, Decimal::ZERO);
        assert_eq!(registry.find_account("X").unwrap().balance(), dec(150));
    }

    #[rstest]
    #[case::same_account("X", "X", BankError::same_account_transfer("X"))]
    #[case::missing_sender("Q", "X", BankError::account_not_found("Q"))]
    #[case::missing_recipient("X", "Q", BankError::account_not_found("Q"))]
    fn test_transfer_lookup_failures(
        registry: SharedRegistry,
        #[case] from: &str,
        #[case] to: &str,
        #[case] expected: BankError,
    ) {
        assert_eq!(
            registry.transfer(from, to, dec(1), pin(1111), pin(2222)),
            Err(expected)
        );
    }

    #[rstest]
    fn test_wrong_recipient_pin_changes_nothing(registry: SharedRegistry) {
        let before = registry.accounts();

        let result = registry.transfer("X", "Y", dec(30), pin(1111), pin(3333));

        assert_eq!(result, Err(BankError::invalid_credential("Y")));
        assert_eq!(registry.accounts(), before);
    }

    #[rstest]
    fn test_verify_pin_and_gated_inquiries(registry: SharedRegistry) {
        assert!(registry.verify_pin("X", pin(1111)));
        assert!(!registry.verify_pin("X", pin(2222)));
        assert!(!registry.verify_pin("nobody", pin(1111)));

        assert_eq!(Ledger::balance(&registry, "Y", pin(2222)), Ok(dec(50)));
        assert_eq!(
            Ledger::history(&registry, "X", pin(9999)),
            Err(BankError::invalid_credential("X"))
        );
    }

    #[test]
    fn test_loans() {
        let registry = SharedRegistry::new();
        registry
            .apply_for_loan("L1", "Ada", dec(1000), dec(10))
            .unwrap();

        assert_eq!(
            registry.apply_for_loan("L1", "Ada", dec(1), dec(1)),
            Err(BankError::duplicate_loan("L1"))
        );
        assert_eq!(registry.make_loan_payment("L1", dec(100)), Ok(dec(800)));
        assert!(matches!(
            registry.make_loan_payment("L1", dec(1000)),
            Err(BankError::PaymentExceedsBalance { .. })
        ));
        assert_eq!(
            registry.make_loan_payment("L2", dec(1)),
            Err(BankError::loan_not_found("L2"))
        );
    }

    #[rstest]
    fn test_pay_loan_from_account(registry: SharedRegistry) {
        registry
            .apply_for_loan("L1", "Yara", dec(100), dec(0))
            .unwrap();

        assert_eq!(
            registry.pay_loan_from_account("L1", "Y", dec(50), pin(2222)),
            Ok(dec(50))
        );
        let history = Ledger::history(&registry, "Y", pin(2222)).unwrap();
        assert_eq!(
            history.last().map(Transaction::kind),
            Some(TransactionKind::LoanPayment)
        );
        assert_eq!(registry.find_loan("L1").unwrap().remaining(), dec(50));
    }

    #[test]
    fn test_concurrent_deposits_are_not_lost() {
        let registry = SharedRegistry::new();
        registry
            .create_account("A", "Ada", "Savings", pin(1234))
            .unwrap();

        thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..100 {
                        registry.deposit("A", Decimal::ONE, pin(1234)).unwrap();
                    }
                });
            }
        });

        let account = registry.find_account("A").unwrap();
        assert_eq!(account.balance(), dec(800));
        assert_eq!(account.transaction_history().len(), 800);
    }

    #[test]
    fn test_opposing_transfers_conserve_money() {
        let registry = SharedRegistry::new();
        registry.create_account("A", "Ada", "Savings", pin(1)).unwrap();
        registry.create_account("B", "Bo", "Savings", pin(2)).unwrap();
        registry.deposit("A", dec(1000), pin(1)).unwrap();
        registry.deposit("B", dec(1000), pin(2)).unwrap();

        thread::scope(|scope| {
            scope.spawn(|| {
                for _ in 0..200 {
                    let _ = registry.transfer("A", "B", dec(3), pin(1), pin(2));
                }
            });
            scope.spawn(|| {
                for _ in 0..200 {
                    let _ = registry.transfer("B", "A", dec(2), pin(2), pin(1));
                }
            });
        });

        let total: Decimal = registry.accounts().iter().map(Account::balance).sum();
        assert_eq!(total, dec(2000));
        assert_eq!(registry.find_account("A").unwrap().balance(), dec(800));
    }

    #[test]
    fn test_concurrent_creation_admits_one_winner() {
        let registry = SharedRegistry::new();

        let successes: usize = thread::scope(|scope| {
            let workers: Vec<_> = (0..8)
                .map(|n| {
                    let registry = &registry;
                    scope.spawn(move || {
                        registry
                            .create_account("SAME", &format!("holder-{}", n), "Savings", pin(n))
                            .is_ok()
                    })
                })
                .collect();
            workers
                .into_iter()
                .map(|worker| worker.join().unwrap() as usize)
                .sum()
        });

        assert_eq!(successes, 1);
        assert_eq!(registry.accounts().len(), 1);
    }
}
