//! One-way password hashing (bcrypt).

use super::CryptoError;

/// bcrypt work factor: 2^10 rounds.
pub const BCRYPT_COST: u32 = 10;

/// Hash a plaintext password with a fresh salt.
pub fn hash_password(plaintext: &str) -> Result<String, CryptoError> {
    bcrypt::hash(plaintext, BCRYPT_COST).map_err(|e| CryptoError::HashFailed(e.to_string()))
}

/// Check a plaintext password against a stored digest.
///
/// A mismatch is `false`, not an error. An unreadable stored digest is also
/// `false` (and logged) so callers never leak why a login failed.
pub fn verify_password(plaintext: &str, digest: &str) -> bool {
    match bcrypt::verify(plaintext, digest) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password digest could not be parsed");
            false
        }
    }
}

/// `hash_password` on the blocking thread pool, for use from request handlers.
pub async fn hash_password_blocking(plaintext: String) -> Result<String, CryptoError> {
    on_blocking_pool(move || hash_password(&plaintext), CryptoError::HashFailed).await?
}

/// `verify_password` on the blocking thread pool. A failed blocking task is
/// an error, never a mismatch.
pub async fn verify_password_blocking(
    plaintext: String,
    digest: String,
) -> Result<bool, CryptoError> {
    on_blocking_pool(move || verify_password(&plaintext, &digest), CryptoError::VerifyFailed).await
}

async fn on_blocking_pool<T, F>(work: F, on_join: fn(String) -> CryptoError) -> Result<T, CryptoError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| on_join(e.to_string()))
}
