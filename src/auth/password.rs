use std::sync::OnceLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{AppError, Result};

/// Hashes a plaintext password with Argon2id and a fresh random salt,
/// returning the PHC string that gets persisted.
pub fn hash_password(plaintext: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)?
        .to_string();
    Ok(hash)
}

/// Checks a plaintext password against a stored PHC hash. A mismatch is
/// `Ok(false)`; only an unparsable stored hash is an error.
pub fn verify_password(plaintext: &str, stored_hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(stored_hash)?;
    Ok(Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Runs a full verification against a throwaway hash so that logins for
/// unknown usernames cost the same as logins with a wrong password.
pub fn verify_against_dummy(plaintext: &str) {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

    let dummy = DUMMY_HASH.get_or_init(|| hash_password("blog-api-dummy-password").ok());
    if let Some(hash) = dummy {
        let _ = verify_password(plaintext, hash);
    }
}

/// Argon2 is CPU-bound for tens of milliseconds per call, so request paths
/// go through these wrappers, which run it on tokio's blocking pool.
pub async fn hash(plaintext: &str) -> Result<String> {
    let plaintext = plaintext.to_owned();
    run_blocking(move || hash_password(&plaintext)).await?
}

pub async fn verify(plaintext: &str, stored_hash: &str) -> Result<bool> {
    let plaintext = plaintext.to_owned();
    let stored_hash = stored_hash.to_owned();
    run_blocking(move || verify_password(&plaintext, &stored_hash)).await?
}

pub async fn verify_dummy(plaintext: &str) -> Result<()> {
    let plaintext = plaintext.to_owned();
    run_blocking(move || verify_against_dummy(&plaintext)).await
}

async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(format!("password task failed: {e}")))
}
