//! Loan records
//!
//! A loan is an independent amortization record. The borrower is free text and
//! is not tied to any account.

use super::error::{BankError, Outcome};
use super::transaction::LoanId;
use rust_decimal::Decimal;

/// Independent loan with a running remaining balance
///
/// The remaining balance never increases and never drops below zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Loan {
    id: LoanId,
    borrower: String,
    principal: Decimal,
    /// Interest rate in percent (10 means 10%)
    rate: Decimal,
    remaining: Decimal,
}

impl Loan {
    /// Create a loan whose remaining balance starts at the principal
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if the principal is negative
    /// - `InvalidRate` if the rate is negative
    ///
    /// A zero principal is accepted and is paid off from the start.
    pub fn new(id: &str, borrower: &str, principal: Decimal, rate: Decimal) -> Outcome<Self> {
        if principal < Decimal::ZERO {
            return Err(BankError::invalid_amount(principal, "loan application"));
        }
        if rate < Decimal::ZERO {
            return Err(BankError::InvalidRate { rate });
        }

        Ok(Loan {
            id: id.to_string(),
            borrower: borrower.to_string(),
            principal,
            rate,
            remaining: principal,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn borrower(&self) -> &str {
        &self.borrower
    }

    pub fn principal(&self) -> Decimal {
        self.principal
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }

    pub fn remaining(&self) -> Decimal {
        self.remaining
    }

    pub fn is_paid_off(&self) -> bool {
        self.remaining <= Decimal::ZERO
    }

    /// Work out what a payment would leave without applying it
    ///
    /// Interest is charged on the current remaining balance and added to the
    /// paid amount; the combined total is what comes off the balance:
    ///
    /// ```text
    /// interest = remaining * rate / 100
    /// total    = amount + interest
    /// ```
    ///
    /// # Returns
    ///
    /// The remaining balance after the payment.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount <= 0`
    /// - `LoanPaidOff` if nothing remains
    /// - `PaymentExceedsBalance` if `total > remaining`
    pub fn quote_payment(&self, amount: Decimal) -> Outcome<Decimal> {
        if amount <= Decimal::ZERO {
            return Err(BankError::invalid_amount(amount, "loan payment"));
        }
        if self.is_paid_off() {
            return Err(BankError::loan_paid_off(&self.id));
        }

        let overflow = || BankError::arithmetic_overflow("loan payment", &self.id);
        let interest = self
            .remaining
            .checked_mul(self.rate)
            .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
            .ok_or_else(overflow)?;
        let total = amount.checked_add(interest).ok_or_else(overflow)?;

        if total > self.remaining {
            return Err(BankError::payment_exceeds_balance(
                &self.id,
                amount,
                interest,
                self.remaining,
            ));
        }

        self.remaining.checked_sub(total).ok_or_else(overflow)
    }

    /// Apply a payment, returning the new remaining balance
    ///
    /// A declined payment leaves the loan untouched.
    pub fn make_payment(&mut self, amount: Decimal) -> Outcome<Decimal> {
        let remaining = self.quote_payment(amount)?;
        self.remaining = remaining;
        Ok(remaining)
    }

    /// Commit a remaining balance previously produced by `quote_payment`
    pub(crate) fn settle(&mut self, remaining: Decimal) {
        debug_assert!(remaining >= Decimal::ZERO && remaining <= self.remaining);
        self.remaining = remaining;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn loan(principal: i64, rate: i64) -> Loan {
        Loan::new("L1", "Ada", Decimal::new(principal, 0), Decimal::new(rate, 0)).unwrap()
    }

    #[test]
    fn test_new_loan_starts_at_principal() {
        let loan = loan(1000, 10);
        assert_eq!(loan.id(), "L1");
        assert_eq!(loan.borrower(), "Ada");
        assert_eq!(loan.principal(), Decimal::new(1000, 0));
        assert_eq!(loan.rate(), Decimal::new(10, 0));
        assert_eq!(loan.remaining(), Decimal::new(1000, 0));
        assert!(!loan.is_paid_off());
    }

    #[test]
    fn test_payment_adds_interest_to_amount() {
        let mut loan = loan(1000, 10);

        // interest 100, total 200
        let remaining = loan.make_payment(Decimal::new(100, 0)).unwrap();

        assert_eq!(remaining, Decimal::new(800, 0));
        assert_eq!(loan.remaining(), Decimal::new(800, 0));
    }

    #[test]
    fn test_payment_exceeding_remaining_is_declined() {
        let mut loan = loan(1000, 10);
        loan.make_payment(Decimal::new(100, 0)).unwrap();

        let result = loan.make_payment(Decimal::new(1000, 0));

        assert_eq!(
            result,
            Err(BankError::payment_exceeds_balance(
                "L1",
                Decimal::new(1000, 0),
                Decimal::new(80, 0),
                Decimal::new(800, 0),
            ))
        );
        assert_eq!(loan.remaining(), Decimal::new(800, 0));
    }

    #[test]
    fn test_zero_rate_payment_can_clear_loan() {
        let mut loan = loan(500, 0);

        let remaining = loan.make_payment(Decimal::new(500, 0)).unwrap();

        assert_eq!(remaining, Decimal::ZERO);
        assert!(loan.is_paid_off());
        assert_eq!(
            loan.make_payment(Decimal::ONE),
            Err(BankError::loan_paid_off("L1"))
        );
    }

    #[rstest]
    #[case::zero(Decimal::ZERO)]
    #[case::negative(Decimal::new(-10, 0))]
    fn test_non_positive_payment_is_declined(#[case] amount: Decimal) {
        let mut loan = loan(1000, 10);

        let result = loan.make_payment(amount);

        assert!(matches!(result, Err(BankError::InvalidAmount { .. })));
        assert_eq!(loan.remaining(), Decimal::new(1000, 0));
    }

    #[test]
    fn test_quote_does_not_mutate() {
        let loan = loan(1000, 10);

        assert_eq!(
            loan.quote_payment(Decimal::new(100, 0)),
            Ok(Decimal::new(800, 0))
        );
        assert_eq!(loan.remaining(), Decimal::new(1000, 0));
    }

    #[test]
    fn test_fractional_rate() {
        // interest = 200 * 2.5 / 100 = 5
        let mut loan = Loan::new("L2", "Bo", Decimal::new(200, 0), Decimal::new(25, 1)).unwrap();

        let remaining = loan.make_payment(Decimal::new(20, 0)).unwrap();

        assert_eq!(remaining, Decimal::new(175, 0));
    }

    #[rstest]
    #[case::negative_principal(Decimal::new(-100, 0), Decimal::new(5, 0))]
    #[case::small_negative_principal(Decimal::new(-1, 2), Decimal::ZERO)]
    fn test_new_rejects_negative_principal(#[case] principal: Decimal, #[case] rate: Decimal) {
        let result = Loan::new("L1", "Ada", principal, rate);
        assert!(matches!(result, Err(BankError::InvalidAmount { .. })));
    }

    #[test]
    fn test_zero_principal_loan_is_already_paid_off() {
        let mut loan = Loan::new("L0", "Ada", Decimal::ZERO, Decimal::new(5, 0)).unwrap();

        assert!(loan.is_paid_off());
        assert_eq!(loan.remaining(), Decimal::ZERO);
        assert_eq!(
            loan.make_payment(Decimal::new(10, 0)),
            Err(BankError::loan_paid_off("L0"))
        );
        assert_eq!(loan.remaining(), Decimal::ZERO);
    }

    #[test]
    fn test_new_rejects_negative_rate() {
        let result = Loan::new("L1", "Ada", Decimal::new(100, 0), Decimal::new(-1, 0));
        assert_eq!(
            result,
            Err(BankError::InvalidRate {
                rate: Decimal::new(-1, 0)
            })
        );
    }
}
