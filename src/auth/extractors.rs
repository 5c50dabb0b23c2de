use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::auth::context::AuthContext;
use crate::error::ApiError;

/// Extracts the `AuthContext` installed by the authentication middleware.
///
/// Using this extractor is what makes a route protected: the middleware never
/// rejects, so a request that reaches a handler without a context fails here
/// with 401.
pub struct CurrentUser(pub AuthContext);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(CurrentUser)
            .ok_or(ApiError::Unauthorized)
    }
}
