use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::NewIdentity;
use crate::domain::identity::models::Username;
use crate::domain::identity::ports::IdentityRepository;
use crate::identity::errors::IdentityError;

pub struct PostgresIdentityRepository {
    pool: PgPool,
}

impl PostgresIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct IdentityRow {
    id: i64,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<IdentityRow> for Identity {
    type Error = IdentityError;

    fn try_from(row: IdentityRow) -> Result<Self, Self::Error> {
        let username = Username::new(row.username).map_err(|e| {
            IdentityError::StoreUnavailable(format!(
                "Stored username for identity {} is invalid: {}",
                row.id, e
            ))
        })?;

        Ok(Identity {
            id: IdentityId(row.id),
            username,
            password_hash: row.password_hash,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl IdentityRepository for PostgresIdentityRepository {
    async fn create(&self, identity: NewIdentity) -> Result<Identity, IdentityError> {
        // ON CONFLICT makes the uniqueness check and the insert one statement
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            INSERT INTO identities (username, password_hash)
            VALUES ($1, $2)
            ON CONFLICT (username) DO NOTHING
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(identity.username.as_str())
        .bind(&identity.password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| IdentityError::StoreUnavailable(e.to_string()))?;

        match row {
            Some(r) => r.try_into(),
            None => Err(IdentityError::UsernameAlreadyExists(
                identity.username.as_str().to_string(),
            )),
        }
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Identity>, IdentityError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM identities
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| IdentityError::StoreUnavailable(e.to_string()))?;

        row.map(Identity::try_from).transpose()
    }
}
