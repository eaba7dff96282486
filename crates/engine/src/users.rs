//! Account holders and their embedded statements.
//!
//! A [`User`] owns its balance and transaction history; the only way to move
//! money is to commit a [`Posting`](crate::Posting) produced by the
//! [`ledger`](crate::ledger) functions, which keeps the two in step.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{EngineError, Money, ResultEngine, ledger::Posting, transactions::Transaction};

/// Interface languages the app ships with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "ms")]
    Ms,
}

impl Language {
    /// Returns the wire code of the language.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ms => "ms",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Language {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "ms" => Ok(Language::Ms),
            other => Err(EngineError::InvalidUser(format!(
                "unsupported language: {other}"
            ))),
        }
    }
}

/// An account holder: identity, preferences, balance and statement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    user_id: String,
    email: String,
    password: String,
    full_name: String,
    phone_number: String,
    account_number: String,
    balance: Money,
    #[serde(default)]
    language: Language,
    #[serde(default)]
    biometric_enabled: bool,
    #[serde(default)]
    transactions: Vec<Transaction>,
}

impl User {
    pub(crate) fn new(
        user_id: String,
        email: String,
        password: String,
        full_name: String,
        phone_number: String,
        account_number: String,
    ) -> Self {
        Self {
            user_id,
            email,
            password,
            full_name,
            phone_number,
            account_number,
            balance: Money::ZERO,
            language: Language::default(),
            biometric_enabled: false,
            transactions: Vec::new(),
        }
    }

    /// Validates the sign-up form and creates a fresh account.
    ///
    /// All fields are trimmed before validation. The checks run in form
    /// order, so the first offending field is the one reported.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidUser`] for a missing or malformed field,
    /// [`EngineError::InvalidNumber`] if the opening balance does not parse.
    pub fn sign_up(
        email: &str,
        password: &str,
        full_name: &str,
        phone_number: &str,
        initial_balance: &str,
    ) -> ResultEngine<Self> {
        let email = email.trim();
        let password = password.trim();
        let full_name = full_name.trim();
        let phone_number = phone_number.trim();
        let initial_balance = initial_balance.trim();

        if full_name.is_empty() {
            return Err(EngineError::InvalidUser("full name is required".to_string()));
        }
        if email.is_empty() {
            return Err(EngineError::InvalidUser("email is required".to_string()));
        }
        if !plausible_email(email) {
            return Err(EngineError::InvalidUser(format!("invalid email: {email}")));
        }
        if phone_number.is_empty() {
            return Err(EngineError::InvalidUser(
                "phone number is required".to_string(),
            ));
        }
        if initial_balance.is_empty() {
            return Err(EngineError::InvalidUser(
                "initial balance is required".to_string(),
            ));
        }
        let balance: Money = initial_balance.parse()?;
        if balance.is_negative() {
            return Err(EngineError::InvalidUser(
                "initial balance cannot be negative".to_string(),
            ));
        }
        if password.is_empty() {
            return Err(EngineError::InvalidUser("password is required".to_string()));
        }
        if password.chars().count() < 6 {
            return Err(EngineError::InvalidUser(
                "password must be at least 6 characters".to_string(),
            ));
        }

        let millis = Utc::now().timestamp_millis();
        let mut user = Self::new(
            format!("USER{millis}"),
            email.to_string(),
            password.to_string(),
            full_name.to_string(),
            phone_number.to_string(),
            format!("ACC{}", millis % 1_000_000_000),
        );
        user.balance = balance;
        Ok(user)
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    #[must_use]
    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    #[must_use]
    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    #[must_use]
    pub const fn balance(&self) -> Money {
        self.balance
    }

    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    #[must_use]
    pub const fn biometric_enabled(&self) -> bool {
        self.biometric_enabled
    }

    /// Statement lines in chronological order, oldest first.
    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Commits a posting: the new balance and its statement line land
    /// together or not at all.
    pub fn apply(&mut self, posting: Posting) {
        self.balance = posting.balance;
        self.transactions.push(posting.record);
    }

    /// Updates the display name.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidUser`] if the trimmed name is empty.
    pub fn set_full_name(&mut self, full_name: &str) -> ResultEngine<()> {
        let full_name = full_name.trim();
        if full_name.is_empty() {
            return Err(EngineError::InvalidUser("full name is required".to_string()));
        }
        self.full_name = full_name.to_string();
        Ok(())
    }

    /// Updates the phone number.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidUser`] if the trimmed number is empty.
    pub fn set_phone_number(&mut self, phone_number: &str) -> ResultEngine<()> {
        let phone_number = phone_number.trim();
        if phone_number.is_empty() {
            return Err(EngineError::InvalidUser(
                "phone number is required".to_string(),
            ));
        }
        self.phone_number = phone_number.to_string();
        Ok(())
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn set_biometric_enabled(&mut self, enabled: bool) {
        self.biometric_enabled = enabled;
    }
}

/// Cheap shape check: one `@`, non-empty local part, a dot somewhere inside
/// the domain, no whitespace.
fn plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TransactionKind, ledger};

    fn test_user() -> User {
        User::sign_up(
            "lina@example.com",
            "lina123",
            "Lina Mahmud",
            "+60120000001",
            "500.00",
        )
        .unwrap()
    }

    #[test]
    fn sign_up_stamps_ids_and_parses_the_opening_balance() {
        let user = test_user();
        assert!(user.user_id().starts_with("USER"));
        assert!(user.account_number().starts_with("ACC"));
        assert_eq!(user.balance(), Money::new(50_000));
        assert_eq!(user.language(), Language::En);
        assert!(!user.biometric_enabled());
        assert!(user.transactions().is_empty());
    }

    #[test]
    fn sign_up_accepts_a_zero_opening_balance() {
        let user = User::sign_up(
            "amir@example.com",
            "amir.secret",
            "Amir Osman",
            "+60120000002",
            "0",
        )
        .unwrap();
        assert_eq!(user.balance(), Money::ZERO);
    }

    #[test]
    fn sign_up_trims_every_field() {
        let user = User::sign_up(
            "  lina@example.com ",
            " lina123 ",
            "  Lina Mahmud ",
            " +60120000001 ",
            " 500.00 ",
        )
        .unwrap();
        assert_eq!(user.email(), "lina@example.com");
        assert_eq!(user.full_name(), "Lina Mahmud");
        assert_eq!(user.phone_number(), "+60120000001");
    }

    #[test]
    fn sign_up_rejects_a_short_password() {
        let err = User::sign_up(
            "lina@example.com",
            "lina5",
            "Lina Mahmud",
            "+60120000001",
            "0",
        )
        .unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidUser("password must be at least 6 characters".to_string())
        );
    }

    #[test]
    fn sign_up_rejects_a_malformed_email() {
        for email in ["lina", "lina@", "@example.com", "lina@example", "l ina@example.com"] {
            assert!(
                User::sign_up(email, "lina123", "Lina Mahmud", "+60120000001", "0").is_err(),
                "{email} should be rejected"
            );
        }
    }

    #[test]
    fn sign_up_rejects_a_negative_opening_balance() {
        let err = User::sign_up(
            "lina@example.com",
            "lina123",
            "Lina Mahmud",
            "+60120000001",
            "-1",
        )
        .unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidUser("initial balance cannot be negative".to_string())
        );
    }

    #[test]
    fn sign_up_propagates_a_garbage_opening_balance() {
        let err = User::sign_up(
            "lina@example.com",
            "lina123",
            "Lina Mahmud",
            "+60120000001",
            "lots",
        )
        .unwrap_err();
        assert_eq!(err, EngineError::InvalidNumber("invalid amount".to_string()));
    }

    #[test]
    fn apply_commits_balance_and_record_together() {
        let mut user = test_user();
        let posting = ledger::deposit(user.balance(), "100", "Deposit").unwrap();
        user.apply(posting);

        assert_eq!(user.balance(), Money::new(60_000));
        assert_eq!(user.transactions().len(), 1);
        let record = &user.transactions()[0];
        assert_eq!(record.kind(), TransactionKind::Deposit);
        assert_eq!(record.balance_after(), user.balance());
    }

    #[test]
    fn statement_order_is_preserved_across_the_wire() {
        let mut user = test_user();
        for amount in ["10", "20", "30"] {
            let posting = ledger::deposit(user.balance(), amount, "Deposit").unwrap();
            user.apply(posting);
        }

        let encoded = serde_json::to_string(&user).unwrap();
        let decoded: User = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, user);
        let amounts: Vec<Money> = decoded.transactions().iter().map(Transaction::amount).collect();
        assert_eq!(
            amounts,
            vec![Money::new(1000), Money::new(2000), Money::new(3000)]
        );
    }

    #[test]
    fn decode_defaults_fields_older_documents_lack() {
        let raw = r#"{
            "userId": "USER001",
            "email": "raynold",
            "password": "raynold123",
            "fullName": "Raynold Anak Kabai",
            "phoneNumber": "+60123456789",
            "accountNumber": "1234567890",
            "balance": 5000
        }"#;

        let user: User = serde_json::from_str(raw).unwrap();
        assert_eq!(user.balance(), Money::new(500_000));
        assert_eq!(user.language(), Language::En);
        assert!(!user.biometric_enabled());
        assert!(user.transactions().is_empty());
    }

    #[test]
    fn wire_keys_are_camel_case() {
        let value = serde_json::to_value(test_user()).unwrap();
        for key in [
            "userId",
            "email",
            "password",
            "fullName",
            "phoneNumber",
            "accountNumber",
            "balance",
            "language",
            "biometricEnabled",
            "transactions",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
    }

    #[test]
    fn profile_edits_leave_the_ledger_alone() {
        let mut user = test_user();
        let posting = ledger::deposit(user.balance(), "25", "Deposit").unwrap();
        user.apply(posting);

        user.set_full_name("Lina binti Mahmud").unwrap();
        user.set_phone_number(" +60129999999 ").unwrap();
        user.set_language(Language::Ms);
        user.set_biometric_enabled(true);

        assert_eq!(user.full_name(), "Lina binti Mahmud");
        assert_eq!(user.phone_number(), "+60129999999");
        assert_eq!(user.language(), Language::Ms);
        assert!(user.biometric_enabled());
        assert_eq!(user.balance(), Money::new(52_500));
        assert_eq!(user.transactions().len(), 1);
    }

    #[test]
    fn set_full_name_rejects_an_empty_name() {
        let mut user = test_user();
        assert_eq!(
            user.set_full_name("   ").unwrap_err(),
            EngineError::InvalidUser("full name is required".to_string())
        );
        assert_eq!(user.full_name(), "Lina Mahmud");
    }

    #[test]
    fn language_codes_round_trip() {
        assert_eq!(Language::try_from("en").unwrap(), Language::En);
        assert_eq!(Language::try_from(" MS ").unwrap(), Language::Ms);
        assert!(Language::try_from("fr").is_err());
        assert_eq!(Language::Ms.to_string(), "ms");
    }
}
