//! Pure balance arithmetic.
//!
//! Every operation takes the current balance plus an **untrusted** amount
//! string, validates it, and returns a [`Posting`]: the new balance paired
//! with the statement line describing it. Nothing here touches storage; the
//! caller decides when to commit via [`User::apply`](crate::User::apply).

use crate::{EngineError, Money, ResultEngine, Transaction, TransactionKind};

/// The outcome of a ledger operation, ready to be committed.
#[derive(Clone, Debug, PartialEq)]
pub struct Posting {
    /// Balance after the operation.
    pub balance: Money,
    /// Statement line recording it.
    pub record: Transaction,
}

/// Parses a raw amount string and requires it to be strictly positive.
///
/// # Errors
///
/// Returns [`EngineError::InvalidNumber`] if the string does not parse,
/// [`EngineError::NonPositiveAmount`] if it parses to zero or less.
pub fn parse_amount(raw: &str) -> ResultEngine<Money> {
    let amount: Money = raw.parse()?;
    if !amount.is_positive() {
        return Err(EngineError::NonPositiveAmount);
    }
    Ok(amount)
}

/// Adds `amount` to `balance`.
///
/// # Errors
///
/// Propagates [`parse_amount`] failures, plus
/// [`EngineError::InvalidNumber`] if the sum leaves the wire-safe range.
pub fn deposit(balance: Money, amount: &str, description: &str) -> ResultEngine<Posting> {
    let overflow = || EngineError::InvalidNumber("amount too large".to_string());
    let amount = parse_amount(amount)?;
    let balance = balance.checked_add(amount).ok_or_else(overflow)?;
    if !balance.is_wire_safe() {
        return Err(overflow());
    }
    let record = Transaction::new(
        TransactionKind::Deposit,
        amount,
        balance,
        description.to_string(),
    )?;
    Ok(Posting { balance, record })
}

/// Subtracts `amount` from `balance`.
///
/// # Errors
///
/// Propagates [`parse_amount`] failures, plus
/// [`EngineError::InsufficientFunds`] if `amount` exceeds `balance`.
pub fn withdraw(balance: Money, amount: &str, description: &str) -> ResultEngine<Posting> {
    let amount = parse_amount(amount)?;
    withdraw_parsed(balance, amount, TransactionKind::Withdrawal, description.to_string())
}

/// Sends `amount` to another account.
///
/// Only the sender side is recorded; the recipient account number lands in
/// the statement description but no second account is debited or credited.
///
/// # Errors
///
/// Returns [`EngineError::EmptyRecipient`] if the trimmed recipient is empty,
/// [`EngineError::SameAccount`] if it equals `own_account`, and otherwise
/// propagates the [`withdraw`] failures.
pub fn transfer(
    balance: Money,
    amount: &str,
    recipient_account: &str,
    own_account: &str,
    description: &str,
) -> ResultEngine<Posting> {
    let recipient_account = recipient_account.trim();
    if recipient_account.is_empty() {
        return Err(EngineError::EmptyRecipient);
    }
    if recipient_account == own_account {
        return Err(EngineError::SameAccount);
    }
    let amount = parse_amount(amount)?;
    withdraw_parsed(
        balance,
        amount,
        TransactionKind::TransferOut,
        format!("{description} to {recipient_account}"),
    )
}

fn withdraw_parsed(
    balance: Money,
    amount: Money,
    kind: TransactionKind,
    description: String,
) -> ResultEngine<Posting> {
    if amount > balance {
        return Err(EngineError::InsufficientFunds { balance });
    }
    let balance = balance - amount;
    let record = Transaction::new(kind, amount, balance, description)?;
    Ok(Posting { balance, record })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rm(raw: &str) -> Money {
        raw.parse().unwrap()
    }

    #[test]
    fn deposit_adds_to_the_balance() {
        let posting = deposit(rm("5000"), "1500.50", "Deposit").unwrap();
        assert_eq!(posting.balance, rm("6500.50"));
        assert_eq!(posting.record.kind(), TransactionKind::Deposit);
        assert_eq!(posting.record.amount(), rm("1500.50"));
        assert_eq!(posting.record.balance_after(), rm("6500.50"));
        assert_eq!(posting.record.description(), "Deposit");
    }

    #[test]
    fn withdraw_subtracts_from_the_balance() {
        let posting = withdraw(rm("6500.50"), "500", "Withdrawal").unwrap();
        assert_eq!(posting.balance, rm("6000.50"));
        assert_eq!(posting.record.kind(), TransactionKind::Withdrawal);
    }

    #[test]
    fn withdrawing_the_whole_balance_leaves_zero() {
        let posting = withdraw(rm("100"), "100", "Withdrawal").unwrap();
        assert_eq!(posting.balance, Money::ZERO);
    }

    #[test]
    #[should_panic(expected = "InsufficientFunds")]
    fn overdrawing_is_rejected() {
        withdraw(rm("100"), "150", "Withdrawal").unwrap();
    }

    #[test]
    fn garbage_amounts_are_rejected() {
        let err = deposit(rm("100"), "lots", "Deposit").unwrap_err();
        assert_eq!(err, EngineError::InvalidNumber("invalid amount".to_string()));
    }

    #[test]
    fn deposits_beyond_the_wire_range_are_rejected() {
        let err = deposit(rm("0"), "90071992547409.92", "Deposit").unwrap_err();
        assert_eq!(err, EngineError::InvalidNumber("amount too large".to_string()));

        let err = deposit(rm("90071992547409.91"), "0.01", "Deposit").unwrap_err();
        assert_eq!(err, EngineError::InvalidNumber("amount too large".to_string()));
    }

    #[test]
    fn zero_and_negative_amounts_are_rejected() {
        assert_eq!(
            deposit(rm("100"), "0", "Deposit").unwrap_err(),
            EngineError::NonPositiveAmount
        );
        assert_eq!(
            withdraw(rm("100"), "-5", "Withdrawal").unwrap_err(),
            EngineError::NonPositiveAmount
        );
    }

    #[test]
    fn transfer_records_the_recipient_in_the_description() {
        let posting = transfer(
            rm("500"),
            "200",
            " 0987654321 ",
            "1234567890",
            "Transfer sent",
        )
        .unwrap();
        assert_eq!(posting.balance, rm("300"));
        assert_eq!(posting.record.kind(), TransactionKind::TransferOut);
        assert_eq!(posting.record.description(), "Transfer sent to 0987654321");
    }

    #[test]
    fn transfer_to_the_own_account_is_rejected_before_parsing() {
        let err = transfer(rm("500"), "not-a-number", "1234567890", "1234567890", "Transfer sent")
            .unwrap_err();
        assert_eq!(err, EngineError::SameAccount);
    }

    #[test]
    fn transfer_requires_a_recipient() {
        let err = transfer(rm("500"), "200", "   ", "1234567890", "Transfer sent").unwrap_err();
        assert_eq!(err, EngineError::EmptyRecipient);
    }
}
