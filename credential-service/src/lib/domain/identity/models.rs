use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use zeroize::Zeroizing;

use crate::identity::errors::PasswordPolicyError;
use crate::identity::errors::UsernameError;

/// Identity aggregate entity.
///
/// Represents a registered principal. The identifier is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: IdentityId,
    pub username: Username,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Store-assigned identity identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityId(pub i64);

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// 1-100 characters, no whitespace or control characters. Comparison is
/// case-sensitive and the value is kept exactly as supplied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    const MAX_LENGTH: usize = 100;

    /// Create a new valid username.
    ///
    /// # Arguments
    /// * `username` - Raw username string
    ///
    /// # Returns
    /// Validated Username value object
    ///
    /// # Errors
    /// * `Empty` - Username is empty
    /// * `TooLong` - Username longer than 100 characters
    /// * `InvalidCharacters` - Contains whitespace or control characters
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let username = Self::with_valid_length(username)?;
        let username = Self::with_valid_chars(username)?;
        Ok(Self(username))
    }

    fn with_valid_length(username: String) -> Result<String, UsernameError> {
        let length = username.chars().count();
        if length == 0 {
            Err(UsernameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(username)
        }
    }

    fn with_valid_chars(username: String) -> Result<String, UsernameError> {
        if username
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
        {
            Err(UsernameError::InvalidCharacters)
        } else {
            Ok(username)
        }
    }

    /// Get username as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext credential supplied by a caller.
///
/// Wiped from memory on drop; `Debug` never prints the value.
pub struct Password(Zeroizing<String>);

impl Password {
    const MAX_BYTES: usize = 1024;

    /// Wrap a plaintext password, enforcing the length policy.
    ///
    /// # Errors
    /// * `Empty` - Password is empty
    /// * `TooLong` - Password exceeds 1024 bytes
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let password = Zeroizing::new(password);
        if password.is_empty() {
            return Err(PasswordPolicyError::Empty);
        }
        if password.len() > Self::MAX_BYTES {
            return Err(PasswordPolicyError::TooLong {
                max: Self::MAX_BYTES,
            });
        }
        Ok(Self(password))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

/// Identity to be persisted by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIdentity {
    pub username: Username,
    pub password_hash: String,
}

/// Command to register a new identity
#[derive(Debug)]
pub struct RegisterCommand {
    pub username: Username,
    pub password: Password,
}

impl RegisterCommand {
    pub fn new(username: Username, password: Password) -> Self {
        Self { username, password }
    }
}

/// Command to authenticate an existing identity
#[derive(Debug)]
pub struct LoginCommand {
    pub username: Username,
    pub password: Password,
}

impl LoginCommand {
    pub fn new(username: Username, password: Password) -> Self {
        Self { username, password }
    }
}

/// Signed bearer token handed to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: i64,
}

impl From<auth::AuthenticationResult> for IssuedToken {
    fn from(result: auth::AuthenticationResult) -> Self {
        Self {
            token: result.access_token,
            expires_at: result.expires_at,
        }
    }
}

/// Outcome of a successful registration.
#[derive(Debug, Clone)]
pub struct Registration {
    pub identity: Identity,
    pub token: IssuedToken,
}
