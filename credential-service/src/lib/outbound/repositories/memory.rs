use std::collections::hash_map::Entry;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::NewIdentity;
use crate::domain::identity::models::Username;
use crate::domain::identity::ports::IdentityRepository;
use crate::identity::errors::IdentityError;

/// Process-local identity store.
///
/// Identities are keyed by exact username. Not durable.
#[derive(Default)]
pub struct InMemoryIdentityRepository {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    identities: HashMap<String, Identity>,
    last_id: i64,
}

impl InMemoryIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored identities.
    pub async fn len(&self) -> usize {
        self.state.read().await.identities.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityRepository {
    async fn create(&self, identity: NewIdentity) -> Result<Identity, IdentityError> {
        // Check and insert happen under one write guard
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        match state
            .identities
            .entry(identity.username.as_str().to_string())
        {
            Entry::Occupied(_) => Err(IdentityError::UsernameAlreadyExists(
                identity.username.as_str().to_string(),
            )),
            Entry::Vacant(slot) => {
                state.last_id += 1;
                let created = Identity {
                    id: IdentityId(state.last_id),
                    username: identity.username,
                    password_hash: identity.password_hash,
                    created_at: Utc::now(),
                };
                slot.insert(created.clone());
                Ok(created)
            }
        }
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Identity>, IdentityError> {
        Ok(self
            .state
            .read()
            .await
            .identities
            .get(username.as_str())
            .cloned())
    }
}
