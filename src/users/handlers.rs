use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::instrument;

use crate::auth::extractors::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;
use crate::users::dto::PublicUser;
use crate::users::repo_types::Role;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(me))
        .route("/users/:id", get(get_user))
}

#[instrument(skip(state, context))]
pub async fn me(
    State(state): State<AppState>,
    CurrentUser(context): CurrentUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = state.users.find_by_email(context.email()).await?;
    Ok(Json(user.into()))
}

/// Admin-only lookup of an arbitrary user.
#[instrument(skip(state, context))]
pub async fn get_user(
    State(state): State<AppState>,
    CurrentUser(context): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<PublicUser>, ApiError> {
    if !context.has_role(Role::Admin) {
        return Err(ApiError::Forbidden);
    }

    let user = state.users.find_by_id(id).await?;
    Ok(Json(user.into()))
}
