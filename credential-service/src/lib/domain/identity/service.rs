use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::Clock;
use auth::SystemClock;

use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IssuedToken;
use crate::domain::identity::models::LoginCommand;
use crate::domain::identity::models::NewIdentity;
use crate::domain::identity::models::Password;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::models::Registration;
use crate::domain::identity::models::Username;
use crate::identity::errors::IdentityError;
use crate::identity::ports::CredentialServicePort;
use crate::identity::ports::IdentityRepository;

// Verified against when the username is unknown; the outcome is discarded.
const DUMMY_PASSWORD: &str = "dummy-password-for-unknown-identities";

/// Domain service implementation for registration and login.
///
/// Concrete implementation of CredentialServicePort with dependency injection.
pub struct CredentialService<IR, C = SystemClock>
where
    IR: IdentityRepository,
    C: Clock,
{
    repository: Arc<IR>,
    authenticator: Arc<Authenticator>,
    clock: C,
    dummy_hash: Option<String>,
}

impl<IR> CredentialService<IR, SystemClock>
where
    IR: IdentityRepository,
{
    /// Create a new credential service using the wall clock.
    ///
    /// # Arguments
    /// * `repository` - Identity persistence implementation
    /// * `authenticator` - Password hasher and token issuer
    ///
    /// # Returns
    /// Configured credential service instance
    pub fn new(repository: Arc<IR>, authenticator: Arc<Authenticator>) -> Self {
        Self::with_clock(repository, authenticator, SystemClock)
    }
}

impl<IR, C> CredentialService<IR, C>
where
    IR: IdentityRepository,
    C: Clock,
{
    /// Create a new credential service with an explicit clock.
    ///
    /// Hashes a dummy password once at the configured cost so that logins
    /// for unknown usernames cost the same as a password mismatch.
    pub fn with_clock(repository: Arc<IR>, authenticator: Arc<Authenticator>, clock: C) -> Self {
        let dummy_hash = authenticator
            .hash_password(DUMMY_PASSWORD)
            .map_err(|e| tracing::error!(error = %e, "Failed to prepare dummy password hash"))
            .ok();

        Self {
            repository,
            authenticator,
            clock,
            dummy_hash,
        }
    }

    // Argon2 is CPU-bound; keep it off the async workers.
    async fn hash_password(&self, password: Password) -> Result<String, IdentityError> {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || authenticator.hash_password(password.expose()))
            .await
            .map_err(|e| IdentityError::HashingFailed(format!("Hashing task failed: {}", e)))?
            .map_err(IdentityError::from)
    }

    async fn verify_password(
        &self,
        password: Password,
        stored_hash: String,
    ) -> Result<bool, IdentityError> {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || {
            authenticator.verify_password(password.expose(), &stored_hash)
        })
        .await
        .map_err(|e| IdentityError::HashingFailed(format!("Verification task failed: {}", e)))?
        .map_err(IdentityError::from)
    }

    async fn authenticate(
        &self,
        password: Password,
        identity: &Identity,
    ) -> Result<IssuedToken, IdentityError> {
        let authenticator = Arc::clone(&self.authenticator);
        let stored_hash = identity.password_hash.clone();
        let subject = identity.username.as_str().to_string();
        let now = self.clock.now();

        tokio::task::spawn_blocking(move || {
            authenticator.authenticate(password.expose(), &stored_hash, &subject, now)
        })
        .await
        .map_err(|e| IdentityError::HashingFailed(format!("Verification task failed: {}", e)))?
        .map(IssuedToken::from)
        .map_err(IdentityError::from)
    }

    // One Argon2 verification for a username that matched nothing.
    async fn verify_unknown_identity(&self, password: Password) -> Result<bool, IdentityError> {
        match &self.dummy_hash {
            Some(dummy_hash) => self.verify_password(password, dummy_hash.clone()).await,
            None => self.hash_password(password).await.map(|_| false),
        }
    }

    fn issue_token(&self, username: &Username) -> Result<IssuedToken, IdentityError> {
        self.authenticator
            .issue_token(username.as_str(), self.clock.now())
            .map(IssuedToken::from)
            .map_err(IdentityError::from)
    }
}

#[async_trait]
impl<IR, C> CredentialServicePort for CredentialService<IR, C>
where
    IR: IdentityRepository,
    C: Clock,
{
    async fn register(&self, command: RegisterCommand) -> Result<Registration, IdentityError> {
        let RegisterCommand { username, password } = command;

        let password_hash = self.hash_password(password).await?;

        let identity = self
            .repository
            .create(NewIdentity {
                username,
                password_hash,
            })
            .await?;

        let token = self.issue_token(&identity.username)?;

        tracing::info!(
            identity_id = %identity.id,
            username = %identity.username,
            "Identity registered"
        );

        Ok(Registration { identity, token })
    }

    async fn login(&self, command: LoginCommand) -> Result<IssuedToken, IdentityError> {
        let LoginCommand { username, password } = command;

        let Some(identity) = self.repository.find_by_username(&username).await? else {
            if let Err(e) = self.verify_unknown_identity(password).await {
                tracing::error!(error = %e, "Dummy password verification failed");
            }
            tracing::warn!(username = %username, reason = "unknown_username", "Login rejected");
            return Err(IdentityError::InvalidCredentials);
        };

        let token = match self.authenticate(password, &identity).await {
            Err(IdentityError::InvalidCredentials) => {
                tracing::warn!(username = %username, reason = "password_mismatch", "Login rejected");
                return Err(IdentityError::InvalidCredentials);
            }
            result => result?,
        };

        if self.authenticator.needs_rehash(&identity.password_hash) {
            tracing::info!(
                identity_id = %identity.id,
                "Stored password hash uses outdated cost parameters"
            );
        }

        tracing::info!(identity_id = %identity.id, "Login succeeded");

        Ok(token)
    }

    fn validate_token(&self, token: &str) -> Result<auth::Claims, auth::JwtError> {
        self.authenticator.validate_token(token, self.clock.now())
    }
}
