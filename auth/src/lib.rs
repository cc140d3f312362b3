//! Authentication utilities library
//!
//! Provides the credential primitives used by the credential service and by
//! downstream services that accept its tokens:
//! - Password hashing (Argon2id, configurable cost)
//! - JWT issuance and validation (HS256)
//! - Authentication coordination
//!
//! Tokens are stateless. A leaked token stays valid until its `exp` claim;
//! the only way to invalidate tokens before expiry is to rotate the signing
//! secret, which invalidates all of them.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Validating a token in a downstream service
//! ```
//! use auth::{Authenticator, SigningSecret};
//! use chrono::{Duration, Utc};
//!
//! let secret = SigningSecret::new("secret_key_at_least_32_bytes_long!").unwrap();
//! let auth = Authenticator::new(&secret, Duration::hours(24));
//!
//! let now = Utc::now();
//! let issued = auth.issue_token("alice", now).unwrap();
//! let claims = auth.validate_token(&issued.access_token, now).unwrap();
//! assert_eq!(claims.username, "alice");
//! ```

pub mod authenticator;
pub mod clock;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use clock::Clock;
pub use clock::FixedClock;
pub use clock::SystemClock;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::SigningSecret;
pub use password::HashingCost;
pub use password::PasswordError;
pub use password::PasswordHasher;
