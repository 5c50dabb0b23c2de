use std::net::SocketAddr;

use axum::{middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth;
use crate::state::AppState;
use crate::users;

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .merge(auth::router())
                .merge(users::router())
                .route("/health", get(|| async { "ok" })),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::authenticate,
        ))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use time::macros::datetime;
    use tower::ServiceExt;

    use crate::auth::password::hash_password;
    use crate::clock::FixedClock;
    use crate::users::repo::{InMemoryUserStore, UserStore};
    use crate::users::Role;

    struct TestApp {
        app: Router,
        store: Arc<InMemoryUserStore>,
        clock: Arc<FixedClock>,
    }

    fn test_app() -> TestApp {
        let store = Arc::new(InMemoryUserStore::default());
        let clock = Arc::new(FixedClock::new(datetime!(2000-01-01 10:00:00 UTC)));
        let state = AppState::fake(store.clone(), clock.clone());
        TestApp {
            app: build_app(state),
            store,
            clock,
        }
    }

    fn seed_user(store: &InMemoryUserStore, email: &str, roles: &[Role]) {
        let hash = hash_password("raw-password").expect("hash");
        store.insert(email, &hash, roles);
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_with_auth(uri: &str, auth_header: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(value) = auth_header {
            builder = builder.header(header::AUTHORIZATION, value.to_string());
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::http::Response<Body>) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn login(app: &Router, email: &str) -> (String, String) {
        let body = format!(r#"{{"email":"{email}","password":"raw-password"}}"#);
        let response = app
            .clone()
            .oneshot(post_json("/api/v1/auth/login", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        (
            json["accessToken"].as_str().unwrap().to_string(),
            json["refreshToken"].as_str().unwrap().to_string(),
        )
    }

    #[tokio::test]
    async fn health_is_public() {
        let TestApp { app, .. } = test_app();
        let response = app
            .oneshot(get_with_auth("/api/v1/health", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn login_then_me_round_trip() {
        let TestApp { app, store, .. } = test_app();
        seed_user(&store, "test@example.com", &[Role::User]);

        let (access, _) = login(&app, "test@example.com").await;
        let response = app
            .oneshot(get_with_auth(
                "/api/v1/users/me",
                Some(&format!("Bearer {access}")),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["email"], "test@example.com");
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_401() {
        let TestApp { app, store, .. } = test_app();
        seed_user(&store, "test@example.com", &[Role::User]);

        let response = app
            .oneshot(post_json(
                "/api/v1/auth/login",
                r#"{"email":"test@example.com","password":"wrong-password"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn protected_route_without_token_is_401() {
        let TestApp { app, .. } = test_app();
        let response = app
            .oneshot(get_with_auth("/api/v1/users/me", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn malformed_authorization_header_fails_open_not_loud() {
        let TestApp { app, .. } = test_app();

        // Shorter than the "Bearer " prefix: must be 401, never a 500.
        let response = app
            .clone()
            .oneshot(get_with_auth("/api/v1/users/me", Some("Bear")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(get_with_auth("/api/v1/users/me", Some("Basic dXNlcjpwdw==")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn tampered_token_is_401() {
        let TestApp { app, store, .. } = test_app();
        seed_user(&store, "test@example.com", &[Role::User]);

        let (access, _) = login(&app, "test@example.com").await;
        let (body, _) = access.rsplit_once('.').unwrap();
        let tampered = format!("{body}.AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA");

        let response = app
            .oneshot(get_with_auth(
                "/api/v1/users/me",
                Some(&format!("Bearer {tampered}")),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn expired_token_is_401() {
        let TestApp { app, store, clock } = test_app();
        seed_user(&store, "test@example.com", &[Role::User]);

        let (access, _) = login(&app, "test@example.com").await;

        // Past the 10 minute access TTL.
        clock.set(datetime!(2000-01-01 10:10:00 UTC));
        let response = app
            .oneshot(get_with_auth(
                "/api/v1/users/me",
                Some(&format!("Bearer {access}")),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn refresh_returns_a_new_pair() {
        let TestApp { app, store, clock } = test_app();
        seed_user(&store, "test@example.com", &[Role::User]);

        let (_, refresh) = login(&app, "test@example.com").await;

        clock.set(datetime!(2000-01-01 11:00:00 UTC));
        let body = format!(r#"{{"refreshToken":"{refresh}"}}"#);
        let response = app
            .oneshot(post_json("/api/v1/auth/refresh", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert!(json["accessToken"].as_str().is_some());
        assert_ne!(json["refreshToken"], refresh);
    }

    #[tokio::test]
    async fn user_lookup_requires_the_admin_role() {
        let TestApp { app, store, .. } = test_app();
        seed_user(&store, "test@example.com", &[Role::User]);
        seed_user(&store, "admin@example.com", &[Role::User, Role::Admin]);

        let (user_access, _) = login(&app, "test@example.com").await;
        let response = app
            .clone()
            .oneshot(get_with_auth(
                "/api/v1/users/2",
                Some(&format!("Bearer {user_access}")),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let (admin_access, _) = login(&app, "admin@example.com").await;
        let response = app
            .oneshot(get_with_auth(
                "/api/v1/users/1",
                Some(&format!("Bearer {admin_access}")),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn register_issues_a_pair_and_persists_the_user() {
        let TestApp { app, store, .. } = test_app();

        let response = app
            .oneshot(post_json(
                "/api/v1/auth/register",
                r#"{"email":"new@example.com","password":"raw-password"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert!(json["accessToken"].as_str().is_some());

        let created = store.find_by_email("new@example.com").await.unwrap();
        assert!(created.is_some());
    }
}
