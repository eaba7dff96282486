use chrono::{Local, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::{EngineError, Money, ResultEngine};

/// Kinds of entry a statement can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    #[serde(rename = "DEPOSIT")]
    Deposit,
    #[serde(rename = "WITHDRAW")]
    Withdrawal,
    #[serde(rename = "TRANSFER")]
    TransferOut,
}

impl TransactionKind {
    /// Returns the wire name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Deposit => "DEPOSIT",
            TransactionKind::Withdrawal => "WITHDRAW",
            TransactionKind::TransferOut => "TRANSFER",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "DEPOSIT" => Ok(TransactionKind::Deposit),
            "WITHDRAW" => Ok(TransactionKind::Withdrawal),
            "TRANSFER" => Ok(TransactionKind::TransferOut),
            other => Err(EngineError::InvalidNumber(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

/// An immutable statement line: what happened, for how much, and the balance
/// the account was left with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    transaction_id: String,
    #[serde(rename = "type")]
    kind: TransactionKind,
    amount: Money,
    balance_after: Money,
    #[serde(with = "date_format")]
    date: NaiveDateTime,
    #[serde(default)]
    description: String,
}

impl Transaction {
    /// Creates a new record stamped with the current local time.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NonPositiveAmount`] if `amount` is zero or
    /// negative.
    pub(crate) fn new(
        kind: TransactionKind,
        amount: Money,
        balance_after: Money,
        description: String,
    ) -> ResultEngine<Self> {
        if !amount.is_positive() {
            return Err(EngineError::NonPositiveAmount);
        }
        let now = Local::now().naive_local();
        Ok(Self {
            transaction_id: format!("TXN{}", Utc::now().timestamp_millis()),
            kind,
            amount,
            balance_after,
            // The wire format carries second precision only.
            date: now.with_nanosecond(0).unwrap_or(now),
            description,
        })
    }

    #[must_use]
    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    #[must_use]
    pub const fn kind(&self) -> TransactionKind {
        self.kind
    }

    #[must_use]
    pub const fn amount(&self) -> Money {
        self.amount
    }

    #[must_use]
    pub const fn balance_after(&self) -> Money {
        self.balance_after
    }

    #[must_use]
    pub const fn date(&self) -> NaiveDateTime {
        self.date
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Serializes dates as `2024-01-15 10:30:00`, the format the stored documents
/// use.
pub(crate) mod date_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(de::Error::custom)
    }
}
