use std::fmt;

use zeroize::Zeroizing;

use super::errors::JwtError;

/// Recommended minimum secret size for HS256.
pub const RECOMMENDED_SECRET_LEN: usize = 32;

/// Server-held HMAC key material.
///
/// Read-only once constructed. The buffer is wiped on drop and never printed.
#[derive(Clone)]
pub struct SigningSecret(Zeroizing<Vec<u8>>);

impl SigningSecret {
    /// Wrap raw key material.
    ///
    /// # Errors
    /// * `MissingSecret` - `bytes` is empty
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, JwtError> {
        let bytes = Zeroizing::new(bytes.into());
        if bytes.is_empty() {
            return Err(JwtError::MissingSecret);
        }
        Ok(Self(bytes))
    }

    /// Whether the secret is shorter than [`RECOMMENDED_SECRET_LEN`].
    pub fn is_weak(&self) -> bool {
        self.0.len() < RECOMMENDED_SECRET_LEN
    }

    pub(crate) fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret([REDACTED])")
    }
}
