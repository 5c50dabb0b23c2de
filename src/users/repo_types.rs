use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Authority granted to a user. Names are stable identifiers: they are stored
/// in Postgres, embedded in token claims, and compared by authorization
/// checks. The variant order is the claim serialization order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "role")]
pub enum Role {
    #[serde(rename = "ROLE_USER")]
    #[sqlx(rename = "ROLE_USER")]
    User,
    #[serde(rename = "ROLE_ADMIN")]
    #[sqlx(rename = "ROLE_ADMIN")]
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "ROLE_USER",
            Role::Admin => "ROLE_ADMIN",
        }
    }
}

impl sqlx::postgres::PgHasArrayType for Role {
    fn array_type_info() -> sqlx::postgres::PgTypeInfo {
        sqlx::postgres::PgTypeInfo::with_name("_role")
    }
}

/// User record in the database. A user always has at least one role.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // argon2 hash, not exposed in JSON
    pub roles: Vec<Role>,
    pub created_at: OffsetDateTime,
}
