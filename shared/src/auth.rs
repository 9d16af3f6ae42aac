use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroize;

use crate::{ADMIN_PASSWORD, ADMIN_USERNAME};

/// Decides whether a username/password pair may open the dashboard.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;

    /// Number of admin accounts this verifier knows about.
    fn account_count(&self) -> usize {
        1
    }
}

/// A single fixed account compared by exact equality.
pub struct StaticCredentials {
    username: String,
    password: SecretString,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::new(password.into()),
        }
    }
}

impl Default for StaticCredentials {
    fn default() -> Self {
        Self::new(ADMIN_USERNAME, ADMIN_PASSWORD)
    }
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password.expose_secret().as_str()
    }
}

/// Password text as it arrives from the shell: redacted in `Debug`, wiped on drop.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PasswordInput(String);

impl PasswordInput {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn into_secret(mut self) -> SecretString {
        SecretString::new(std::mem::take(&mut self.0))
    }
}

impl fmt::Debug for PasswordInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for PasswordInput {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// The login form buffers.
pub struct LoginForm {
    pub username: String,
    password: SecretString,
}

impl LoginForm {
    pub fn set_password(&mut self, password: PasswordInput) {
        self.password = password.into_secret();
    }

    #[must_use]
    pub fn has_password(&self) -> bool {
        !self.password.expose_secret().is_empty()
    }

    #[must_use]
    pub fn check(&self, verifier: &dyn CredentialVerifier) -> bool {
        verifier.verify(&self.username, self.password.expose_secret())
    }

    pub fn clear(&mut self) {
        self.username.zeroize();
        self.password = SecretString::new(String::new());
    }
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: SecretString::new(String::new()),
        }
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
