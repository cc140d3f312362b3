use async_trait::async_trait;

use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IssuedToken;
use crate::domain::identity::models::LoginCommand;
use crate::domain::identity::models::NewIdentity;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::models::Registration;
use crate::identity::errors::IdentityError;
use crate::identity::models::Username;

/// Port for credential issuance operations.
#[async_trait]
pub trait CredentialServicePort: Send + Sync + 'static {
    /// Register a new identity and issue its first token.
    ///
    /// The token is only issued once the identity has been persisted.
    ///
    /// # Arguments
    /// * `command` - Validated username and password
    ///
    /// # Returns
    /// Created identity and a signed token
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `HashingFailed` - Password could not be hashed
    /// * `StoreUnavailable` - Store operation failed
    /// * `SigningFailed` - Token could not be signed
    async fn register(&self, command: RegisterCommand) -> Result<Registration, IdentityError>;

    /// Authenticate an identity and issue a token.
    ///
    /// # Arguments
    /// * `command` - Validated username and password
    ///
    /// # Returns
    /// Signed token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password (indistinguishable)
    /// * `HashingFailed` - Stored hash is corrupt or verification failed
    /// * `StoreUnavailable` - Store operation failed
    /// * `SigningFailed` - Token could not be signed
    async fn login(&self, command: LoginCommand) -> Result<IssuedToken, IdentityError>;

    /// Check a bearer token's signature and expiry against the service clock.
    ///
    /// # Errors
    /// * `JwtError` - Token is forged, malformed, or expired
    fn validate_token(&self, token: &str) -> Result<auth::Claims, auth::JwtError>;
}

/// Persistence operations for identities.
#[async_trait]
pub trait IdentityRepository: Send + Sync + 'static {
    /// Persist a new identity if its username is free.
    ///
    /// The existence check and the insert are a single atomic operation.
    ///
    /// # Arguments
    /// * `identity` - Username and password hash to store
    ///
    /// # Returns
    /// Created identity with its store-assigned identifier
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `StoreUnavailable` - Store operation failed
    async fn create(&self, identity: NewIdentity) -> Result<Identity, IdentityError>;

    /// Retrieve identity by username.
    ///
    /// # Returns
    /// Optional identity (None if not found)
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store operation failed
    async fn find_by_username(&self, username: &Username)
        -> Result<Option<Identity>, IdentityError>;
}
