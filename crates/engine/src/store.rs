//! JSON-backed user store.
//!
//! The whole state lives in a single pretty-printed JSON document on disk:
//! the registered users, the active session and the onboarding flag. Every
//! operation loads the document, works on it in memory and (when it mutates)
//! writes the full document back. A missing file reads as an empty store.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine, StoreError, users::User};

/// On-disk document shape.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct Document {
    #[serde(default)]
    users: Vec<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    current_user: Option<User>,
    #[serde(default)]
    onboarding_complete: bool,
}

/// Credential check, separated from the store so callers can swap in other
/// account sources (for instance [`DemoUsers`](crate::DemoUsers)).
pub trait AuthLookup {
    /// Looks up a user by username and password.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidCredentials`] on any mismatch, without
    /// revealing which part failed.
    fn authenticate(&self, username: &str, password: &str) -> ResultEngine<User>;
}

/// Handle on the document at a given path.
pub struct UserStore {
    path: PathBuf,
}

impl UserStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Document, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Document::default()),
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, document: &Document) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(document)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }

    /// Returns all registered users.
    pub fn users(&self) -> ResultEngine<Vec<User>> {
        Ok(self.load()?.users)
    }

    /// Finds a registered user by email.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if no user carries that email.
    pub fn find_by_email(&self, email: &str) -> ResultEngine<User> {
        self.load()?
            .users
            .into_iter()
            .find(|user| user.email() == email)
            .ok_or_else(|| EngineError::NotFound(email.to_string()))
    }

    /// Inserts the user, or replaces the existing entry with the same email
    /// in place.
    pub fn upsert(&self, user: &User) -> ResultEngine<()> {
        let mut document = self.load()?;
        upsert_into(&mut document.users, user);
        Ok(self.save(&document)?)
    }

    /// Registers a new user and signs them in.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ExistingKey`] if the email is already taken.
    pub fn register(&self, user: &User) -> ResultEngine<()> {
        let mut document = self.load()?;
        if document.users.iter().any(|known| known.email() == user.email()) {
            return Err(EngineError::ExistingKey(user.email().to_string()));
        }
        document.users.push(user.clone());
        document.current_user = Some(user.clone());
        Ok(self.save(&document)?)
    }

    /// Returns the signed-in user, if any.
    ///
    /// The session holds the snapshot taken when it was set; it does not
    /// track later edits to the registered entry.
    pub fn session(&self) -> ResultEngine<Option<User>> {
        Ok(self.load()?.current_user)
    }

    /// Marks the user as signed in without touching the registered entries.
    pub fn set_session(&self, user: &User) -> ResultEngine<()> {
        let mut document = self.load()?;
        document.current_user = Some(user.clone());
        Ok(self.save(&document)?)
    }

    /// Signs the current user out.
    pub fn clear_session(&self) -> ResultEngine<()> {
        let mut document = self.load()?;
        document.current_user = None;
        Ok(self.save(&document)?)
    }

    pub fn onboarding_complete(&self) -> ResultEngine<bool> {
        Ok(self.load()?.onboarding_complete)
    }

    pub fn set_onboarding_complete(&self, complete: bool) -> ResultEngine<()> {
        let mut document = self.load()?;
        document.onboarding_complete = complete;
        Ok(self.save(&document)?)
    }

    /// Upserts the user into the registry **and** makes them the session, in
    /// one write. This is the commit path after any operation that changes a
    /// signed-in user.
    pub fn commit_and_activate(&self, user: &User) -> ResultEngine<()> {
        let mut document = self.load()?;
        upsert_into(&mut document.users, user);
        document.current_user = Some(user.clone());
        Ok(self.save(&document)?)
    }
}

fn upsert_into(users: &mut Vec<User>, user: &User) {
    for known in users.iter_mut() {
        if known.email() == user.email() {
            *known = user.clone();
            return;
        }
    }
    users.push(user.clone());
}

impl AuthLookup for UserStore {
    fn authenticate(&self, username: &str, password: &str) -> ResultEngine<User> {
        self.load()?
            .users
            .into_iter()
            .find(|user| user.email() == username && user.password() == password)
            .ok_or(EngineError::InvalidCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_omits_an_empty_session() {
        let value = serde_json::to_value(Document::default()).unwrap();
        assert!(value.get("users").is_some());
        assert!(value.get("current_user").is_none());
        assert_eq!(value["onboarding_complete"], serde_json::json!(false));
    }

    #[test]
    fn empty_document_decodes_with_defaults() {
        let document: Document = serde_json::from_str("{}").unwrap();
        assert!(document.users.is_empty());
        assert!(document.current_user.is_none());
        assert!(!document.onboarding_complete);
    }
}
