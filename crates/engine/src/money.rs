use std::{fmt, ops::Sub, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::EngineError;

/// Signed money amount represented as **integer sen** (hundredths of a
/// ringgit).
///
/// Use this type for **all** monetary values in the engine (balances,
/// transaction amounts) to avoid floating-point drift. Currency symbols are
/// presentation and stay out of this type.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::new(12_34);
/// assert_eq!(amount.sen(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects >
/// 2 decimals):
///
/// ```rust
/// use engine::Money;
///
/// assert_eq!("10".parse::<Money>().unwrap().sen(), 1000);
/// assert_eq!("10,5".parse::<Money>().unwrap().sen(), 1050);
/// assert!("12.345".parse::<Money>().is_err());
/// ```
///
/// On the wire the value is a plain decimal number in **major units**
/// (`6500.5`), matching the documents the store already holds. Intake caps
/// magnitudes below 2^53 sen, so every number the engine writes decodes
/// back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

// 2^53: beyond this f64 cannot represent every integer sen.
const WIRE_SEN_LIMIT: i64 = 9_007_199_254_740_992;

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from integer sen.
    #[must_use]
    pub const fn new(sen: i64) -> Self {
        Self(sen)
    }

    /// Returns the raw value in sen.
    #[must_use]
    pub const fn sen(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Returns `true` if the amount is inside the wire codec's exact range.
    #[must_use]
    pub const fn is_wire_safe(self) -> bool {
        -WIRE_SEN_LIMIT < self.0 && self.0 < WIRE_SEN_LIMIT
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }
}

/// Converts a wire-side major-unit number into sen, rounding half away from
/// zero.
fn from_major(major: f64) -> Result<Money, EngineError> {
    if !major.is_finite() {
        return Err(EngineError::InvalidNumber("amount is not finite".to_string()));
    }
    let sen = (major * 100.0).round();
    if sen.abs() >= WIRE_SEN_LIMIT as f64 {
        return Err(EngineError::InvalidNumber("amount too large".to_string()));
    }
    Ok(Money(sen as i64))
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let ringgit = abs / 100;
        let sen = abs % 100;
        write!(f, "{sign}{ringgit}.{sen:02}")
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.0 as f64 / 100.0)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let major = f64::deserialize(deserializer)?;
        from_major(major).map_err(serde::de::Error::custom)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses a decimal string into sen.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - rejects empty/invalid strings
    /// - rejects magnitudes from 2^53 sen up (the wire codec loses sen
    ///   precision there)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::InvalidNumber("empty amount".to_string());
        let invalid = || EngineError::InvalidNumber("invalid amount".to_string());
        let overflow = || EngineError::InvalidNumber("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (sign, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (-1i64, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (1i64, stripped)
        } else {
            (1i64, trimmed)
        };

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(empty());
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let ringgit_str = parts
            .next()
            .ok_or_else(invalid)?;
        let sen_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        if ringgit_str.is_empty() || !ringgit_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let ringgit: i64 = ringgit_str
            .parse()
            .map_err(|_| invalid())?;

        let sen: i64 = match sen_str {
            None => 0,
            Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                match frac.len() {
                    0 => 0,
                    1 => {
                        frac.parse::<i64>()
                            .map_err(|_| invalid())?
                            * 10
                    }
                    2 => frac
                        .parse::<i64>()
                        .map_err(|_| invalid())?,
                    _ => return Err(EngineError::InvalidNumber("too many decimals".to_string())),
                }
            }
        };

        let total = ringgit
            .checked_mul(100)
            .and_then(|v| v.checked_add(sen))
            .ok_or_else(overflow)?;
        if total >= WIRE_SEN_LIMIT {
            return Err(overflow());
        }

        let signed = if sign < 0 {
            total.checked_neg().ok_or_else(overflow)?
        } else {
            total
        };

        Ok(Money(signed))
    }
}
