//! Built-in demo accounts.
//!
//! Three fixture users that exist without any sign-up, so the app can be
//! driven straight away. A demo login is committed into the
//! [`UserStore`](crate::UserStore) by the caller, after which the on-disk
//! copy is the one that evolves.

use crate::{
    EngineError, Money, ResultEngine, ledger,
    store::AuthLookup,
    users::{Language, User},
};

/// The fixture accounts, fully seeded.
pub struct DemoUsers {
    users: Vec<User>,
}

impl Default for DemoUsers {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoUsers {
    #[must_use]
    pub fn new() -> Self {
        let users = vec![
            seeded(
                "USER001",
                "raynold",
                "raynold123",
                "Raynold Anak Kabai",
                "+60123456789",
                "1234567890",
                "5000.00",
                Language::Ms,
            ),
            seeded(
                "USER002",
                "siti",
                "siti123",
                "Siti Nurhaliza binti Hassan",
                "+60198765432",
                "0987654321",
                "10000.00",
                Language::Ms,
            ),
            seeded(
                "USER003",
                "kumar",
                "kumar123",
                "Kumar Rajesh",
                "+60167891234",
                "5555666677",
                "7500.50",
                Language::En,
            ),
        ];
        Self { users }
    }

    /// Returns every demo account.
    #[must_use]
    pub fn all(&self) -> &[User] {
        &self.users
    }

    /// Finds a demo account by username.
    #[must_use]
    pub fn by_username(&self, username: &str) -> Option<&User> {
        let username = username.trim();
        self.users.iter().find(|user| user.email() == username)
    }
}

impl AuthLookup for DemoUsers {
    fn authenticate(&self, username: &str, password: &str) -> ResultEngine<User> {
        let username = username.trim();
        self.users
            .iter()
            .find(|user| user.email() == username && user.password() == password)
            .cloned()
            .ok_or(EngineError::InvalidCredentials)
    }
}

/// Demo usernames sit in the email slot, matching how the documents store
/// them.
#[allow(clippy::too_many_arguments)]
fn seeded(
    user_id: &str,
    username: &str,
    password: &str,
    full_name: &str,
    phone_number: &str,
    account_number: &str,
    opening_balance: &str,
    language: Language,
) -> User {
    let mut user = User::new(
        user_id.to_string(),
        username.to_string(),
        password.to_string(),
        full_name.to_string(),
        phone_number.to_string(),
        account_number.to_string(),
    );
    user.set_language(language);
    // Literal fixture amounts, parsing cannot fail.
    let posting = ledger::deposit(Money::ZERO, opening_balance, "Initial Deposit").unwrap();
    user.apply(posting);
    user
}
