//! Authentication primitives: token credentials and issued tokens.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::password::PlainPassword;

/// Number of random bytes behind each issued token.
pub const TOKEN_BYTES: usize = 20;

/// Domain error returned when token request values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

/// Validated credentials presented to the token issuer.
///
/// ## Invariants
/// - `email` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use recipe_backend::domain::TokenCredentials;
///
/// let creds = TokenCredentials::try_from_parts("a@example.com", "password").unwrap();
/// assert_eq!(creds.email(), "a@example.com");
/// assert_eq!(creds.password().expose(), "password");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenCredentials {
    email: String,
    password: PlainPassword,
}

impl TokenCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let trimmed = email.trim();
        if trimmed.is_empty() {
            return Err(CredentialsValidationError::EmptyEmail);
        }

        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }

        Ok(Self {
            email: trimmed.to_owned(),
            password: PlainPassword::new(password),
        })
    }

    /// Email exactly as supplied, minus surrounding whitespace.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    pub fn password(&self) -> &PlainPassword {
        &self.password
    }
}

/// Opaque bearer token handed to a client once.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(Zeroizing<String>);

impl AuthToken {
    /// Draw a new token from the operating system RNG.
    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new([0_u8; TOKEN_BYTES]);
        OsRng.fill_bytes(&mut *bytes);
        Self(Zeroizing::new(hex::encode(&*bytes)))
    }

    /// Wrap a token presented by a client.
    pub fn from_presented(raw: impl Into<String>) -> Self {
        Self(Zeroizing::new(raw.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Digest persisted in place of the token itself.
    pub fn digest(&self) -> TokenDigest {
        TokenDigest(hex::encode(Sha256::digest(self.0.as_bytes())))
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(**redacted**)")
    }
}

/// Lowercase hex SHA-256 digest of an [`AuthToken`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenDigest(String);

impl TokenDigest {
    /// Rehydrate a digest read back from storage.
    pub fn from_stored(hex_digest: impl Into<String>) -> Self {
        Self(hex_digest.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}
