use crate::state::AppState;
use axum::Router;

pub mod context;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod password;
pub mod services;

pub use context::AuthContext;
pub use services::AuthService;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
