use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::dto::AuthResponse;
use crate::auth::password::{hash_password, PasswordVerifier};
use crate::error::ApiError;
use crate::token::TokenService;
use crate::users::repo::UserStore;
use crate::users::{Role, User};

/// Login, refresh and registration flows. Bridges the user store, password
/// verification and the token service.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    passwords: Arc<dyn PasswordVerifier>,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn UserStore>,
        passwords: Arc<dyn PasswordVerifier>,
        tokens: TokenService,
    ) -> Self {
        Self {
            store,
            passwords,
            tokens,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let user = self
            .store
            .find_by_email(email)
            .await?
            .filter(|user| self.passwords.matches(password, &user.password_hash))
            .ok_or_else(|| {
                warn!(email, "login rejected");
                ApiError::InvalidCredentials
            })?;

        info!(user_id = user.id, "user logged in");
        self.issue_pair(&user)
    }

    /// Exchange a refresh token for a fresh pair. A token that does not
    /// verify and a verified token whose user has since disappeared are
    /// indistinguishable to the caller.
    pub async fn refresh_tokens(&self, refresh_token: &str) -> Result<AuthResponse, ApiError> {
        let auth = self
            .tokens
            .to_authentication(refresh_token)
            .ok_or(ApiError::InvalidToken)?;

        let user = self
            .store
            .find_by_id(auth.user_id())
            .await?
            .ok_or_else(|| {
                warn!(user_id = auth.user_id(), "refresh for missing user");
                ApiError::InvalidToken
            })?;

        info!(user_id = user.id, "tokens refreshed");
        self.issue_pair(&user)
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        if self.store.find_by_email(email).await?.is_some() {
            warn!(email, "email already registered");
            return Err(ApiError::EmailTaken);
        }

        let hash = hash_password(password)?;
        let user = self.store.create(email, &hash, &[Role::User]).await?;

        info!(user_id = user.id, email, "user registered");
        self.issue_pair(&user)
    }

    fn issue_pair(&self, user: &User) -> Result<AuthResponse, ApiError> {
        Ok(AuthResponse {
            access_token: self.tokens.generate_access_token(user)?,
            refresh_token: self.tokens.generate_refresh_token(user)?,
        })
    }
}
