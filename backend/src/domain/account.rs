//! Account data model.
//!
//! Accounts are identified by an email address. The domain part of every
//! stored address is lowercased while the local part is kept as typed, so
//! `Test2@Example.com` and `Test2@example.com` name the same account.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::password::PasswordHash;

/// Maximum length shared by emails and display names.
pub const ACCOUNT_FIELD_MAX: usize = 255;

/// Validation errors returned by the account newtypes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyEmail,
    MalformedEmail,
    EmailTooLong { max: usize },
    EmptyName,
    NameTooLong { max: usize },
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "users must have an email address"),
            Self::MalformedEmail => write!(f, "enter a valid email address"),
            Self::EmailTooLong { max } => {
                write!(f, "email must be at most {max} characters")
            }
            Self::EmptyName => write!(f, "name must not be blank"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
        }
    }
}

impl std::error::Error for AccountValidationError {}

/// Database-assigned account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(i64);

impl AccountId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalised email address.
///
/// ## Invariants
/// - Non-empty once trimmed of surrounding whitespace.
/// - Everything after the last `@` is lowercase.
///
/// # Examples
/// ```
/// use recipe_backend::domain::Email;
///
/// let email = Email::normalise("Test2@Example.com").expect("non-empty");
/// assert_eq!(email.as_ref(), "Test2@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Trim the address and lowercase its domain part.
    ///
    /// Addresses without an `@` are kept verbatim; only emptiness and length
    /// are checked here. Use [`Email::is_well_formed`] for the stricter rule
    /// applied to API input.
    pub fn normalise(raw: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AccountValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > ACCOUNT_FIELD_MAX {
            return Err(AccountValidationError::EmailTooLong {
                max: ACCOUNT_FIELD_MAX,
            });
        }

        let normalised = match trimmed.rsplit_once('@') {
            Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
            None => trimmed.to_owned(),
        };
        Ok(Self(normalised))
    }

    /// Normalise and additionally require a `local@domain.tld` shape.
    pub fn parse_strict(raw: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let email = Self::normalise(raw)?;
        if email.is_well_formed() {
            Ok(email)
        } else {
            Err(AccountValidationError::MalformedEmail)
        }
    }

    /// Whether the address has a non-empty local part and a dotted domain.
    pub fn is_well_formed(&self) -> bool {
        let Some((local, domain)) = self.0.rsplit_once('@') else {
            return false;
        };
        if local.is_empty() || local.chars().any(char::is_whitespace) {
            return false;
        }
        let labels: Vec<&str> = domain.split('.').collect();
        labels.len() >= 2
            && labels.iter().all(|label| {
                !label.is_empty()
                    && !label.starts_with('-')
                    && !label.ends_with('-')
                    && label
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '-')
            })
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::normalise(value)
    }
}

/// Display name attached to an account. May be empty for accounts created
/// outside the signup flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountName(String);

impl AccountName {
    /// Accept any name up to the length limit, including an empty one.
    pub fn new(name: impl Into<String>) -> Result<Self, AccountValidationError> {
        let name = name.into();
        if name.chars().count() > ACCOUNT_FIELD_MAX {
            return Err(AccountValidationError::NameTooLong {
                max: ACCOUNT_FIELD_MAX,
            });
        }
        Ok(Self(name))
    }

    /// Reject names that are blank once trimmed.
    pub fn non_blank(name: impl Into<String>) -> Result<Self, AccountValidationError> {
        let name = Self::new(name)?;
        if name.0.trim().is_empty() {
            return Err(AccountValidationError::EmptyName);
        }
        Ok(name)
    }
}

impl AsRef<str> for AccountName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<AccountName> for String {
    fn from(value: AccountName) -> Self {
        value.0
    }
}

impl TryFrom<String> for AccountName {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Privilege flags carried by an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountFlags {
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl AccountFlags {
    /// Flags for a regular, active account.
    pub const REGULAR: Self = Self {
        is_active: true,
        is_staff: false,
        is_superuser: false,
    };

    /// Flags for an administrative account.
    pub const SUPERUSER: Self = Self {
        is_active: true,
        is_staff: true,
        is_superuser: true,
    };
}

impl Default for AccountFlags {
    fn default() -> Self {
        Self::REGULAR
    }
}

/// Account awaiting insertion; the store assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub email: Email,
    pub name: AccountName,
    pub password_hash: PasswordHash,
    pub flags: AccountFlags,
}

/// Persisted account.
///
/// The password hash never leaves the domain; adapters build their own
/// representations from the accessors below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: AccountId,
    email: Email,
    name: AccountName,
    password_hash: PasswordHash,
    flags: AccountFlags,
}

impl Account {
    pub fn new(
        id: AccountId,
        email: Email,
        name: AccountName,
        password_hash: PasswordHash,
        flags: AccountFlags,
    ) -> Self {
        Self {
            id,
            email,
            name,
            password_hash,
            flags,
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn name(&self) -> &AccountName {
        &self.name
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn flags(&self) -> AccountFlags {
        self.flags
    }

    pub fn is_active(&self) -> bool {
        self.flags.is_active
    }

    pub fn is_staff(&self) -> bool {
        self.flags.is_staff
    }

    pub fn is_superuser(&self) -> bool {
        self.flags.is_superuser
    }

    pub(crate) fn set_email(&mut self, email: Email) {
        self.email = email;
    }

    pub(crate) fn set_name(&mut self, name: AccountName) {
        self.name = name;
    }

    pub(crate) fn set_password_hash(&mut self, password_hash: PasswordHash) {
        self.password_hash = password_hash;
    }
}
