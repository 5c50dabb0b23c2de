use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_ttl_ms: i64,
    pub refresh_ttl_ms: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            access_ttl_ms: std::env::var("JWT_ACCESS_TTL_MS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(10 * 60 * 1000),
            refresh_ttl_ms: std::env::var("JWT_REFRESH_TTL_MS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(30 * 24 * 60 * 60 * 1000),
        };
        Ok(Self { database_url, jwt })
    }
}
