//! Application state shared by every request handler.
//!
//! `CoreState` owns the connection pool, the token service and the loaded
//! configuration. It is built once at startup and wrapped in `Arc`; nothing
//! in it is mutated afterwards.

use std::sync::Arc;

use thiserror::Error;

use crate::config::{AdminAuth, ClinicConfig};
use crate::crypto::{self, CryptoError, TokenService, MIN_SECRET_LEN};
use crate::db::{self, Database, DatabaseError};

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

pub struct CoreState {
    db: Database,
    tokens: TokenService,
    pub config: ClinicConfig,
}

impl CoreState {
    pub fn new(config: ClinicConfig, db: Database, tokens: TokenService) -> Self {
        Self { db, tokens, config }
    }

    /// Open the database, build the token service and seed the staff account.
    pub async fn initialize(config: ClinicConfig) -> Result<Arc<Self>, CoreError> {
        let db = Database::open(&config.db_path, config.pool_size)?;
        let tokens = token_service_for(&config)?;

        if config.admin_auth == AdminAuth::Open {
            tracing::warn!("Admin routes are open: /api/admin/* accepts unauthenticated requests");
        }

        let state = Arc::new(Self::new(config, db, tokens));
        state.seed_staff_user().await?;
        Ok(state)
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub fn admin_auth(&self) -> AdminAuth {
        self.config.admin_auth
    }

    /// Create the configured staff account unless the username already exists.
    /// Returns whether an account was created.
    pub async fn seed_staff_user(&self) -> Result<bool, CoreError> {
        let Some(seed) = self.config.staff_seed.clone() else {
            return Ok(false);
        };

        {
            let conn = self.db.acquire().await?;
            if db::find_staff_by_username(&conn, &seed.username)?.is_some() {
                tracing::debug!(username = %seed.username, "Staff account already present");
                return Ok(false);
            }
        }

        let digest = crypto::hash_password_blocking(seed.password).await?;
        let conn = self.db.acquire().await?;
        match db::insert_staff_user(&conn, &seed.username, &digest) {
            Ok(_) => {
                tracing::info!(username = %seed.username, "Created staff account");
                Ok(true)
            }
            // Another instance seeded it between our check and insert.
            Err(e) if e.unique_column().is_some() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

fn token_service_for(config: &ClinicConfig) -> Result<TokenService, CryptoError> {
    match &config.jwt_secret {
        Some(secret) => {
            if secret.len() < MIN_SECRET_LEN {
                tracing::warn!(
                    min_len = MIN_SECRET_LEN,
                    "JWT_SECRET is shorter than recommended"
                );
            }
            TokenService::new(secret.as_bytes(), config.token_ttl_secs)
        }
        None => {
            tracing::warn!("JWT_SECRET not set; using a random secret, tokens will not survive a restart");
            TokenService::with_random_secret(config.token_ttl_secs)
        }
    }
}
