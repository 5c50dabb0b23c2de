use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier as _, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

/// Password-verification capability consumed by the auth service. The trait
/// seam lets tests pair a stored hash with a raw password directly.
pub trait PasswordVerifier: Send + Sync {
    fn matches(&self, raw: &str, hash: &str) -> bool;
}

/// Argon2-backed verifier. A hash that fails to parse counts as a mismatch.
pub struct Argon2PasswordVerifier;

impl PasswordVerifier for Argon2PasswordVerifier {
    fn matches(&self, raw: &str, hash: &str) -> bool {
        verify_password(raw, hash).unwrap_or(false)
    }
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}
