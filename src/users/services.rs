use std::sync::Arc;

use crate::error::ApiError;
use crate::users::repo::UserStore;
use crate::users::repo_types::User;

/// User lookups with a uniform not-found failure.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<User, ApiError> {
        self.store
            .find_by_email(email)
            .await?
            .ok_or(ApiError::NotFound("User"))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<User, ApiError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(ApiError::NotFound("User"))
    }
}
