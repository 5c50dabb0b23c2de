use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;

use crate::state::AppState;

pub const BEARER_PREFIX: &str = "Bearer ";

/// Runs once per request, before routing.
///
/// A verifiable bearer token installs an `AuthContext` into the request's
/// extensions; anything else (no header, wrong scheme, a header shorter than
/// the prefix, an invalid token) leaves the request unauthenticated. The
/// request is always forwarded; route-level policy decides whether an
/// unauthenticated request is acceptable.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let context = bearer_token(req.headers()).and_then(|token| state.tokens.to_authentication(token));
    if let Some(context) = context {
        req.extensions_mut().insert(context);
    }

    next.run(req).await
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
}
