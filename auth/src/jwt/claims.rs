use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claim set carried by issued tokens.
///
/// `username` identifies the subject; `iat` and `exp` are Unix timestamps (UTC seconds).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject username
    pub username: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a subject valid for `validity` starting at `now`.
    ///
    /// # Arguments
    /// * `username` - Subject username
    /// * `now` - Issue instant
    /// * `validity` - Lifetime of the token
    ///
    /// # Returns
    /// Claims with iat = now and exp = now + validity
    pub fn for_subject(username: impl Into<String>, now: DateTime<Utc>, validity: Duration) -> Self {
        Self {
            username: username.into(),
            iat: now.timestamp(),
            exp: (now + validity).timestamp(),
        }
    }

    /// Check if token is expired.
    ///
    /// A token is only valid strictly before `exp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}
