pub mod password;
pub mod token;

pub use password::*;
pub use token::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Password hashing failed: {0}")]
    HashFailed(String),

    #[error("Password verification failed: {0}")]
    VerifyFailed(String),

    /// Malformed, wrongly signed, or expired token. The reason stays server-side.
    #[error("Invalid token: {0}")]
    InvalidToken(&'static str),

    #[error("Invalid signing key")]
    InvalidKey,

    #[error("Token lifetime out of range: {0}s")]
    InvalidTtl(i64),

    #[error("Token expiry is past the representable date range")]
    ExpiryOutOfRange,

    #[error("Token encoding failed: {0}")]
    TokenEncoding(#[from] serde_json::Error),
}
