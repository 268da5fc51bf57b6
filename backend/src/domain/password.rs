//! Password primitives: plaintext held only in zeroising memory and Argon2
//! PHC hashes for storage.

use std::fmt;
use std::sync::OnceLock;

use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash as PhcString, PasswordHasher, PasswordVerifier, SaltString,
};
use rand::rngs::OsRng;
use zeroize::Zeroizing;

/// Minimum number of characters accepted for passwords chosen through the API.
pub const MIN_PASSWORD_LENGTH: usize = 5;

/// Plaintext behind the decoy hash verified for unknown accounts.
const DECOY_PASSWORD: &str = "decoy-password-never-issued";

static DECOY_HASH: OnceLock<Option<PasswordHash>> = OnceLock::new();

/// Errors raised while validating or hashing passwords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    Blank,
    TooShort { min: usize },
    Hashing(String),
    MalformedHash,
}

impl fmt::Display for PasswordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => write!(f, "password must not be blank"),
            Self::TooShort { min } => {
                write!(f, "ensure this field has at least {min} characters")
            }
            Self::Hashing(reason) => write!(f, "failed to hash password: {reason}"),
            Self::MalformedHash => write!(f, "stored password hash is not a PHC string"),
        }
    }
}

impl std::error::Error for PasswordError {}

/// Plaintext password wiped from memory on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct PlainPassword(Zeroizing<String>);

impl PlainPassword {
    /// Wrap a password without any policy checks.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(Zeroizing::new(raw.into()))
    }

    /// Wrap a password chosen through the API, enforcing the minimum length.
    ///
    /// # Examples
    /// ```
    /// use recipe_backend::domain::PlainPassword;
    ///
    /// assert!(PlainPassword::chosen("pw").is_err());
    /// assert!(PlainPassword::chosen("hunter2").is_ok());
    /// ```
    pub fn chosen(raw: impl Into<String>) -> Result<Self, PasswordError> {
        let password = Self::new(raw);
        if password.is_blank() {
            return Err(PasswordError::Blank);
        }
        if password.0.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(PasswordError::TooShort {
                min: MIN_PASSWORD_LENGTH,
            });
        }
        Ok(password)
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the plaintext. Callers must not copy it into long-lived storage.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlainPassword(**redacted**)")
    }
}

/// Argon2 hash in PHC string format (`$argon2id$v=19$...`).
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a plaintext password with a fresh random salt.
    pub fn hash(password: &PlainPassword) -> Result<Self, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let phc = Argon2::default()
            .hash_password(password.expose().as_bytes(), &salt)
            .map_err(|err| PasswordError::Hashing(err.to_string()))?;
        Ok(Self(phc.to_string()))
    }

    /// Rehydrate a stored hash, checking that it parses as a PHC string.
    pub fn from_phc(phc: impl Into<String>) -> Result<Self, PasswordError> {
        let phc = phc.into();
        PhcString::new(&phc).map_err(|_| PasswordError::MalformedHash)?;
        Ok(Self(phc))
    }

    /// Returns true iff `candidate` matches this hash.
    pub fn verify(&self, candidate: &PlainPassword) -> bool {
        let Ok(parsed) = PhcString::new(&self.0) else {
            return false;
        };
        Argon2::default()
            .verify_password(candidate.expose().as_bytes(), &parsed)
            .is_ok()
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Hash on Tokio's blocking pool so Argon2 never stalls an async worker.
    pub async fn hash_blocking(password: PlainPassword) -> Result<Self, PasswordError> {
        tokio::task::spawn_blocking(move || Self::hash(&password))
            .await
            .map_err(|err| PasswordError::Hashing(err.to_string()))?
    }

    /// Verify `candidate` against `stored` on the blocking pool.
    ///
    /// When there is no stored hash the candidate is checked against a decoy
    /// hash instead, so a lookup miss costs one Argon2 verification just like
    /// a wrong password does. The result is `false` in that case.
    pub async fn verify_blocking(stored: Option<Self>, candidate: PlainPassword) -> bool {
        tokio::task::spawn_blocking(move || match stored {
            Some(hash) => hash.verify(&candidate),
            None => {
                if let Some(decoy) = decoy_hash() {
                    decoy.verify(&candidate);
                }
                false
            }
        })
        .await
        .unwrap_or(false)
    }
}

/// Lazily built hash with the same Argon2 parameters as real accounts.
fn decoy_hash() -> Option<&'static PasswordHash> {
    DECOY_HASH
        .get_or_init(|| PasswordHash::hash(&PlainPassword::new(DECOY_PASSWORD)).ok())
        .as_ref()
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(**redacted**)")
    }
}
