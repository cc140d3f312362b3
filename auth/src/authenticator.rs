use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::SigningSecret;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Default token lifetime.
pub const DEFAULT_TOKEN_VALIDITY_HOURS: i64 = 24;

/// Authentication coordinator combining password verification and JWT generation.
///
/// Holds no per-request state; share one instance behind an `Arc`.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    token_validity: Duration,
}

/// Result of successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    /// JWT access token
    pub access_token: String,
    /// Expiry of the token (Unix timestamp)
    pub expires_at: i64,
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `secret` - Secret key for JWT signing
    /// * `token_validity` - Lifetime of issued tokens
    ///
    /// # Returns
    /// Authenticator using the default Argon2id cost
    pub fn new(secret: &SigningSecret, token_validity: Duration) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(secret),
            token_validity,
        }
    }

    /// Replace the password hasher (e.g. to apply a configured cost).
    pub fn with_password_hasher(mut self, password_hasher: PasswordHasher) -> Self {
        self.password_hasher = password_hasher;
        self
    }

    /// Lifetime of issued tokens.
    pub fn token_validity(&self) -> Duration {
        self.token_validity
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Password is empty or hashing failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a password against a stored hash.
    ///
    /// # Errors
    /// * `MalformedHash` - Stored hash is corrupt
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Whether a stored hash predates the current hashing cost.
    pub fn needs_rehash(&self, stored_hash: &str) -> bool {
        self.password_hasher.needs_rehash(stored_hash)
    }

    /// Verify credentials and generate JWT token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject` - Username to place in the token
    /// * `now` - Issue instant
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Password verification failed
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.issue_token(subject, now)?)
    }

    /// Issue a signed token for an already authenticated subject.
    ///
    /// # Arguments
    /// * `subject` - Username to place in the token
    /// * `now` - Issue instant; the token expires at `now + token_validity`
    ///
    /// # Errors
    /// * `InvalidSubject` - Subject is empty
    /// * `EncodingFailed` - Signing failed
    pub fn issue_token(
        &self,
        subject: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthenticationResult, JwtError> {
        let claims = Claims::for_subject(subject, now, self.token_validity);
        let access_token = self.jwt_handler.encode(&claims)?;

        Ok(AuthenticationResult {
            access_token,
            expires_at: claims.exp,
        })
    }

    /// Validate and decode JWT token.
    ///
    /// # Errors
    /// * `JwtError` - Signature, format, or expiry check failed
    pub fn validate_token(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, JwtError> {
        self.jwt_handler.decode(token, now)
    }
}
