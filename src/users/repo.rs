use std::sync::RwLock;

use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::users::repo_types::{Role, User};

/// User lookup capability consumed by the auth and user services.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>>;
    async fn create(
        &self,
        email: &str,
        password_hash: &str,
        roles: &[Role],
    ) -> anyhow::Result<User>;
}

/// Postgres-backed store.
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, roles, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, roles, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create(
        &self,
        email: &str,
        password_hash: &str,
        roles: &[Role],
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, roles)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, roles, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(roles)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }
}

/// In-memory store used by tests and `AppState::fake()`.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn insert(&self, email: &str, password_hash: &str, roles: &[Role]) -> User {
        let mut users = self.users.write().expect("store lock poisoned");
        let user = User {
            id: users.len() as i64 + 1,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            roles: roles.to_vec(),
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        users.push(user.clone());
        user
    }

    pub fn remove(&self, id: i64) {
        self.users
            .write()
            .expect("store lock poisoned")
            .retain(|user| user.id != id);
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.read().expect("store lock poisoned");
        Ok(users.iter().find(|user| user.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        let users = self.users.read().expect("store lock poisoned");
        Ok(users.iter().find(|user| user.id == id).cloned())
    }

    async fn create(
        &self,
        email: &str,
        password_hash: &str,
        roles: &[Role],
    ) -> anyhow::Result<User> {
        Ok(self.insert(email, password_hash, roles))
    }
}
