//! Interactive menu
//!
//! A numbered text menu over any `BufRead`/`Write` pair. Each round prints the
//! options, reads a choice, prompts for that option's inputs and prints either
//! the receipt or the reason the request was declined.
//!
//! Unknown accounts and loans are reported as soon as the identifier is entered,
//! before any amount is asked for. Input that does not parse (a non-numeric
//! amount, a PIN that is not four digits) is reported and the menu starts over.
//! End of input ends the session the same way option 9 does.

use crate::core::Ledger;
use crate::session::execute;
use crate::types::{BankError, Command, Pin};
use rust_decimal::Decimal;
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;

const OPTIONS: &str = "Options:
1. Create Account
2. Deposit
3. Withdraw
4. Apply for Loan
5. Make Loan Payment
6. Fund Transfer
7. Balance Inquiry
8. Transaction History
9. Exit";

/// Run the menu until the user exits or input ends
///
/// # Errors
///
/// `IoError` if reading the input or writing the output fails.
pub fn run_menu<R: BufRead, W: Write>(
    ledger: &mut dyn Ledger,
    input: R,
    output: W,
) -> Result<(), BankError> {
    let mut menu = Menu {
        ledger,
        input,
        output,
    };

    loop {
        match menu.round() {
            Ok(Step::Continue) => {}
            Ok(Step::Exit) | Err(Interrupt::Closed) => break,
            Err(Interrupt::Invalid(message)) => {
                tracing::debug!(%message, "rejected menu input");
                writeln!(menu.output, "Invalid input: {}", message)?;
            }
            Err(Interrupt::Failed(e)) => return Err(e),
        }
    }

    menu.output.flush()?;
    Ok(())
}

enum Step {
    Continue,
    Exit,
}

/// Why a round ended early
enum Interrupt {
    /// Input reached end of file
    Closed,
    /// A value did not parse
    Invalid(String),
    Failed(BankError),
}

impl From<std::io::Error> for Interrupt {
    fn from(error: std::io::Error) -> Self {
        Interrupt::Failed(BankError::from(error))
    }
}

struct Menu<'a, R, W> {
    ledger: &'a mut dyn Ledger,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Menu<'_, R, W> {
    fn round(&mut self) -> Result<Step, Interrupt> {
        self.say(OPTIONS)?;
        let choice = self.ask("Enter your choice: ")?;

        match choice.as_str() {
            "1" => self.create_account(),
            "2" => self.deposit(),
            "3" => self.withdraw(),
            "4" => self.apply_for_loan(),
            "5" => self.loan_payment(),
            "6" => self.transfer(),
            "7" => self.balance(),
            "8" => self.history(),
            "9" => {
                self.say("Exiting...")?;
                Ok(Step::Exit)
            }
            _ => {
                self.say("Invalid choice.")?;
                Ok(Step::Continue)
            }
        }
    }

    fn create_account(&mut self) -> Result<Step, Interrupt> {
        let id = self.ask("Enter account number: ")?;
        let holder = self.ask("Enter account holder name: ")?;
        let account_type = self.ask("Enter account type: ")?;
        let pin = self.ask_pin("Enter your PIN (4 digits): ")?;

        self.submit(Command::CreateAccount {
            id,
            holder,
            account_type,
            pin,
        })
    }

    fn deposit(&mut self) -> Result<Step, Interrupt> {
        let id = self.ask("Enter account number: ")?;
        if !self.known_account(&id)? {
            return Ok(Step::Continue);
        }
        let amount = self.ask_amount("Enter deposit amount: ")?;
        let pin = self.ask_pin("Enter your PIN (4 digits): ")?;

        self.submit(Command::Deposit { id, amount, pin })
    }

    fn withdraw(&mut self) -> Result<Step, Interrupt> {
        let id = self.ask("Enter account number: ")?;
        if !self.known_account(&id)? {
            return Ok(Step::Continue);
        }
        let amount = self.ask_amount("Enter withdrawal amount: ")?;
        let pin = self.ask_pin("Enter your PIN (4 digits): ")?;

        self.submit(Command::Withdraw { id, amount, pin })
    }

    fn apply_for_loan(&mut self) -> Result<Step, Interrupt> {
        let id = self.ask("Enter loan ID: ")?;
        let borrower = self.ask("Enter borrower name: ")?;
        let principal = self.ask_amount("Enter loan amount: ")?;
        let rate = self.ask_amount("Enter interest rate (%): ")?;

        self.submit(Command::ApplyForLoan {
            id,
            borrower,
            principal,
            rate,
        })
    }

    fn loan_payment(&mut self) -> Result<Step, Interrupt> {
        let id = self.ask("Enter loan ID: ")?;
        if !self.ledger.contains_loan(&id) {
            self.say(BankError::loan_not_found(&id))?;
            return Ok(Step::Continue);
        }
        let amount = self.ask_amount("Enter payment amount: ")?;

        let account = self.ask("Enter funding account number (blank to pay directly): ")?;
        let funding = if account.is_empty() {
            None
        } else {
            if !self.known_account(&account)? {
                return Ok(Step::Continue);
            }
            Some((account, self.ask_pin("Enter your PIN (4 digits): ")?))
        };

        self.submit(Command::LoanPayment {
            id,
            amount,
            funding,
        })
    }

    fn transfer(&mut self) -> Result<Step, Interrupt> {
        let from = self.ask("Enter sender's account number: ")?;
        let to = self.ask("Enter recipient's account number: ")?;
        if !self.known_account(&from)? || !self.known_account(&to)? {
            return Ok(Step::Continue);
        }
        let pin = self.ask_pin("Enter your PIN (4 digits): ")?;
        let amount = self.ask_amount("Enter transfer amount: ")?;
        let recipient_pin = self.ask_pin("Enter recipient's PIN (4 digits): ")?;

        self.submit(Command::Transfer {
            from,
            to,
            amount,
            pin,
            recipient_pin,
        })
    }

    fn balance(&mut self) -> Result<Step, Interrupt> {
        let id = self.ask("Enter account number for balance inquiry: ")?;
        if !self.known_account(&id)? {
            return Ok(Step::Continue);
        }
        let pin = self.ask_pin("Enter your PIN (4 digits): ")?;

        self.submit(Command::BalanceInquiry { id, pin })
    }

    fn history(&mut self) -> Result<Step, Interrupt> {
        let id = self.ask("Enter account number for transaction history: ")?;
        if !self.known_account(&id)? {
            return Ok(Step::Continue);
        }
        let pin = self.ask_pin("Enter your PIN (4 digits): ")?;

        self.submit(Command::TransactionHistory { id, pin })
    }

    fn submit(&mut self, command: Command) -> Result<Step, Interrupt> {
        let name = command.name();
        match execute(&mut *self.ledger, command) {
            Ok(receipt) => self.say(receipt)?,
            Err(e) => {
                tracing::debug!(command = name, error = %e, "menu request declined");
                self.say(e)?;
            }
        }
        Ok(Step::Continue)
    }

    /// Reports the lookup failure when the account is unknown
    fn known_account(&mut self, id: &str) -> Result<bool, Interrupt> {
        if self.ledger.contains_account(id) {
            return Ok(true);
        }
        self.say(BankError::account_not_found(id))?;
        Ok(false)
    }

    fn say(&mut self, message: impl Display) -> Result<(), Interrupt> {
        writeln!(self.output, "{}", message)?;
        Ok(())
    }

    fn ask(&mut self, prompt: &str) -> Result<String, Interrupt> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Interrupt::Closed);
        }
        Ok(line.trim().to_string())
    }

    fn ask_amount(&mut self, prompt: &str) -> Result<Decimal, Interrupt> {
        let text = self.ask(prompt)?;
        Decimal::from_str(&text)
            .map_err(|_| Interrupt::Invalid(format!("'{}' is not a number", text)))
    }

    fn ask_pin(&mut self, prompt: &str) -> Result<Pin, Interrupt> {
        let text = self.ask(prompt)?;
        text.parse()
            .map_err(|e: BankError| Interrupt::Invalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Backend;
    use crate::core::Registry;
    use crate::session::create_ledger;
    use crate::types::TransactionKind;
    use rstest::{fixture, rstest};
    use std::io::Cursor;

    fn run(ledger: &mut dyn Ledger, script: &str) -> String {
        let mut output = Vec::new();
        run_menu(ledger, Cursor::new(script), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    /// Registry with A1 (1234) holding 100 and B2 (4321) empty
    #[fixture]
    fn registry() -> Registry {
        let mut registry = Registry::new();
        run(
            &mut registry,
            "1\nA1\nAda\nSavings\n1234\n\
             1\nB2\nBo\nChecking\n4321\n\
             2\nA1\n100\n1234\n\
             9\n",
        );
        registry
    }

    #[test]
    fn test_create_deposit_and_balance() {
        let mut registry = Registry::new();

        let output = run(
            &mut registry,
            "1\nA1\nAda\nSavings\n1234\n\
             2\nA1\n100\n1234\n\
             7\nA1\n1234\n\
             9\n",
        );

        assert!(output.starts_with("Options:\n1. Create Account\n"));
        assert!(output.contains("Account A1 created successfully."));
        assert!(output.contains("Deposited $100.00 into account A1. New balance: $100.00"));
        assert!(output.contains("Account A1 has a balance of $100.00"));
        assert!(output.ends_with("Exiting...\n"));
    }

    #[rstest]
    #[case::deposit("2\nZZ\n9\n", "Enter deposit amount")]
    #[case::withdraw("3\nZZ\n9\n", "Enter withdrawal amount")]
    #[case::balance("7\nZZ\n9\n", "Enter your PIN")]
    #[case::history("8\nZZ\n9\n", "Enter your PIN")]
    #[case::transfer("6\nA1\nZZ\n9\n", "Enter transfer amount")]
    fn test_unknown_account_reported_before_prompting(
        mut registry: Registry,
        #[case] script: &str,
        #[case] skipped_prompt: &str,
    ) {
        let output = run(&mut registry, script);

        assert!(output.contains("Account ZZ not found"));
        assert!(!output.contains(skipped_prompt));
    }

    #[rstest]
    fn test_unknown_loan_reported_before_prompting(mut registry: Registry) {
        let output = run(&mut registry, "5\nL9\n9\n");

        assert!(output.contains("Loan L9 not found"));
        assert!(!output.contains("Enter payment amount"));
    }

    #[rstest]
    fn test_unknown_funding_account_reported_before_pin(
        #[values(Backend::Local, Backend::Shared)] backend: Backend,
    ) {
        let mut ledger = create_ledger(backend);

        let output = run(
            ledger.as_mut(),
            "4\nL1\nAda\n1000\n10\n\
             5\nL1\n100\nZZ\n\
             9\n",
        );

        assert!(output.contains("Account ZZ not found"));
        assert!(!output.contains("Enter your PIN"));
        assert_eq!(ledger.find_loan("L1").unwrap().remaining(), Decimal::new(1000, 0));
    }

    #[rstest]
    #[case::amount("2\nA1\nabc\n", "Invalid input: 'abc' is not a number")]
    #[case::pin("2\nA1\n10\n12\n", "Invalid input: Invalid PIN format")]
    fn test_malformed_input_returns_to_menu(
        mut registry: Registry,
        #[case] prefix: &str,
        #[case] expected: &str,
    ) {
        let output = run(&mut registry, &format!("{}7\nA1\n1234\n9\n", prefix));

        assert!(output.contains(expected));
        assert!(output.contains("Account A1 has a balance of $100.00"));
    }

    #[rstest]
    fn test_declines_are_printed(mut registry: Registry) {
        let output = run(
            &mut registry,
            "3\nA1\n500\n1234\n\
             2\nA1\n10\n9999\n\
             8\nA1\n0000\n\
             9\n",
        );

        assert!(output.contains("Insufficient funds in account A1"));
        assert!(output.contains("Invalid PIN for account A1"));
        assert_eq!(
            registry.find_account("A1").unwrap().transaction_history().len(),
            1
        );
    }

    #[rstest]
    fn test_transfer_and_history(mut registry: Registry) {
        let output = run(
            &mut registry,
            "6\nA1\nB2\n1234\n30\n4321\n\
             8\nB2\n4321\n\
             9\n",
        );

        assert!(output.contains("Transferred $30.00 to account B2. New balance: $70.00"));
        assert!(output.contains("Transaction Type: DEPOSIT, Amount: $30.00"));
    }

    #[rstest]
    fn test_transfer_with_wrong_recipient_pin(mut registry: Registry) {
        let output = run(&mut registry, "6\nA1\nB2\n1234\n30\n1111\n9\n");

        assert!(output.contains("Invalid PIN for account B2"));
        assert_eq!(
            registry.find_account("A1").unwrap().balance(),
            Decimal::new(100, 0)
        );
    }

    #[rstest]
    fn test_loan_payments(mut registry: Registry) {
        let output = run(
            &mut registry,
            "4\nL1\nAda\n1000\n10\n\
             5\nL1\n100\n\n\
             5\nL1\n20\nA1\n1234\n\
             5\nL1\n1000\n\n\
             9\n",
        );

        assert!(output.contains("Loan application approved. Loan ID: L1"));
        assert!(output.contains("Payment of $100.00 made. Remaining loan balance: $800.00"));
        assert!(output.contains("Payment of $20.00 made. Remaining loan balance: $700.00"));
        assert!(output.contains("exceeds the remaining balance"));

        let account = registry.find_account("A1").unwrap();
        assert_eq!(account.balance(), Decimal::new(80, 0));
        assert_eq!(
            account.transactions().last().map(|t| t.kind()),
            Some(TransactionKind::LoanPayment)
        );
    }

    #[rstest]
    #[case::invalid_choice("42\n9\n", "Invalid choice.")]
    #[case::blank_choice("\n9\n", "Invalid choice.")]
    fn test_invalid_choice(mut registry: Registry, #[case] script: &str, #[case] expected: &str) {
        assert!(run(&mut registry, script).contains(expected));
    }

    #[test]
    fn test_end_of_input_exits_cleanly() {
        let mut registry = Registry::new();

        let output = run(&mut registry, "1\nA1\nAda\n");

        assert!(output.contains("Enter account type: "));
        assert!(!output.contains("Exiting..."));
        assert!(registry.find_account("A1").is_err());
    }

    #[test]
    fn test_empty_input_exits_cleanly() {
        let mut registry = Registry::new();
        let output = run(&mut registry, "");
        assert!(output.ends_with("Enter your choice: "));
    }
}
