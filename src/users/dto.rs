use serde::Serialize;

use crate::users::repo_types::{Role, User};

/// Public part of a user returned to clients.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
    pub roles: Vec<Role>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            roles: user.roles,
        }
    }
}
