use std::net::IpAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "Clinic";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_POOL_SIZE: usize = 10;
/// Patient and staff tokens are valid for one hour.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;
/// Upper bound on `CLINIC_TOKEN_TTL_SECS`: one year.
pub const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 3600;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },

    #[error("Cannot determine home directory")]
    NoHomeDir,
}

/// Whether `/api/admin/*` routes require a verified staff token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAuth {
    Required,
    /// Unauthenticated staff console, kept for deployments that relied on it.
    Open,
}

impl std::str::FromStr for AdminAuth {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "required" => Ok(Self::Required),
            "open" => Ok(Self::Open),
            _ => Err(()),
        }
    }
}

/// Staff account created at startup when absent.
#[derive(Clone)]
pub struct StaffSeed {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for StaffSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaffSeed")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Runtime configuration, read from the process environment.
#[derive(Clone)]
pub struct ClinicConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub db_path: PathBuf,
    pub pool_size: usize,
    /// HMAC secret for bearer tokens. `None` means one is generated per process.
    pub jwt_secret: Option<String>,
    pub token_ttl_secs: i64,
    pub admin_auth: AdminAuth,
    pub static_dir: Option<PathBuf>,
    pub staff_seed: Option<StaffSeed>,
}

impl std::fmt::Debug for ClinicConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClinicConfig")
            .field("bind_addr", &self.bind_addr)
            .field("port", &self.port)
            .field("db_path", &self.db_path)
            .field("pool_size", &self.pool_size)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("admin_auth", &self.admin_auth)
            .field("static_dir", &self.static_dir)
            .field("staff_seed", &self.staff_seed)
            .finish()
    }
}

impl ClinicConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = parse_or(get("PORT"), "PORT", DEFAULT_PORT)?;
        let bind_addr = parse_or(
            get("CLINIC_BIND_ADDR"),
            "CLINIC_BIND_ADDR",
            IpAddr::from([0, 0, 0, 0]),
        )?;

        let pool_size = parse_or(get("CLINIC_DB_POOL_SIZE"), "CLINIC_DB_POOL_SIZE", DEFAULT_POOL_SIZE)?;
        if pool_size == 0 {
            return Err(ConfigError::InvalidValue {
                var: "CLINIC_DB_POOL_SIZE",
                value: "0".into(),
            });
        }

        let token_ttl_secs = parse_or(
            get("CLINIC_TOKEN_TTL_SECS"),
            "CLINIC_TOKEN_TTL_SECS",
            DEFAULT_TOKEN_TTL_SECS,
        )?;
        if !(1..=MAX_TOKEN_TTL_SECS).contains(&token_ttl_secs) {
            return Err(ConfigError::InvalidValue {
                var: "CLINIC_TOKEN_TTL_SECS",
                value: token_ttl_secs.to_string(),
            });
        }

        let admin_auth = match get("CLINIC_ADMIN_AUTH") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                var: "CLINIC_ADMIN_AUTH",
                value: raw,
            })?,
            None => AdminAuth::Required,
        };

        let db_path = match get("CLINIC_DB_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_db_path()?,
        };

        let staff_seed = match (get("CLINIC_SEED_STAFF_USER"), get("CLINIC_SEED_STAFF_PASSWORD")) {
            (Some(username), Some(password)) => Some(StaffSeed { username, password }),
            _ => None,
        };

        Ok(Self {
            bind_addr,
            port,
            db_path,
            pool_size,
            jwt_secret: get("JWT_SECRET"),
            token_ttl_secs,
            admin_auth,
            static_dir: get("CLINIC_STATIC_DIR").map(PathBuf::from),
            staff_seed,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    raw: Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value }),
        None => Ok(default),
    }
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "clinic_lib=info,clinic=info,tower_http=info"
}

/// Get the application data directory (~/Clinic/)
pub fn app_data_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(APP_NAME))
}

/// Default SQLite database location
pub fn default_db_path() -> Result<PathBuf, ConfigError> {
    Ok(app_data_dir()?.join("clinic.db"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = ClinicConfig::from_lookup(lookup(&[("CLINIC_DB_PATH", "/tmp/c.db")])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.pool_size, 10);
        assert_eq!(config.token_ttl_secs, 3600);
        assert_eq!(config.admin_auth, AdminAuth::Required);
        assert!(config.jwt_secret.is_none());
        assert!(config.static_dir.is_none());
        assert!(config.staff_seed.is_none());
        assert_eq!(config.db_path, PathBuf::from("/tmp/c.db"));
    }

    #[test]
    fn reads_all_variables() {
        let config = ClinicConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("CLINIC_BIND_ADDR", "127.0.0.1"),
            ("CLINIC_DB_PATH", "/var/lib/clinic.db"),
            ("CLINIC_DB_POOL_SIZE", "4"),
            ("JWT_SECRET", "s3cret"),
            ("CLINIC_TOKEN_TTL_SECS", "600"),
            ("CLINIC_ADMIN_AUTH", "open"),
            ("CLINIC_STATIC_DIR", "./public"),
            ("CLINIC_SEED_STAFF_USER", "doctor"),
            ("CLINIC_SEED_STAFF_PASSWORD", "pw"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_addr, IpAddr::from([127, 0, 0, 1]));
        assert_eq!(config.pool_size, 4);
        assert_eq!(config.jwt_secret.as_deref(), Some("s3cret"));
        assert_eq!(config.token_ttl_secs, 600);
        assert_eq!(config.admin_auth, AdminAuth::Open);
        assert_eq!(config.static_dir, Some(PathBuf::from("./public")));
        assert_eq!(config.staff_seed.unwrap().username, "doctor");
    }

    #[test]
    fn invalid_port_names_variable() {
        let err = ClinicConfig::from_lookup(lookup(&[("PORT", "eighty"), ("CLINIC_DB_PATH", "x")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                var: "PORT",
                value: "eighty".into()
            }
        );
    }

    #[test]
    fn zero_pool_size_rejected() {
        let err = ClinicConfig::from_lookup(lookup(&[
            ("CLINIC_DB_POOL_SIZE", "0"),
            ("CLINIC_DB_PATH", "x"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: "CLINIC_DB_POOL_SIZE", .. }));
    }

    #[test]
    fn token_ttl_must_be_within_one_year() {
        for bad in ["0", "-5", "31536001", "9000000000000"] {
            let err = ClinicConfig::from_lookup(lookup(&[
                ("CLINIC_TOKEN_TTL_SECS", bad),
                ("CLINIC_DB_PATH", "x"),
            ]))
            .unwrap_err();
            assert_eq!(
                err,
                ConfigError::InvalidValue {
                    var: "CLINIC_TOKEN_TTL_SECS",
                    value: bad.into()
                }
            );
        }

        let config = ClinicConfig::from_lookup(lookup(&[
            ("CLINIC_TOKEN_TTL_SECS", "31536000"),
            ("CLINIC_DB_PATH", "x"),
        ]))
        .unwrap();
        assert_eq!(config.token_ttl_secs, MAX_TOKEN_TTL_SECS);
    }

    #[test]
    fn unknown_admin_auth_mode_rejected() {
        let err = ClinicConfig::from_lookup(lookup(&[
            ("CLINIC_ADMIN_AUTH", "maybe"),
            ("CLINIC_DB_PATH", "x"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: "CLINIC_ADMIN_AUTH", .. }));
    }

    #[test]
    fn seed_requires_both_user_and_password() {
        let config = ClinicConfig::from_lookup(lookup(&[
            ("CLINIC_SEED_STAFF_USER", "doctor"),
            ("CLINIC_DB_PATH", "x"),
        ]))
        .unwrap();
        assert!(config.staff_seed.is_none());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = ClinicConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "top-secret-value"),
            ("CLINIC_SEED_STAFF_USER", "doctor"),
            ("CLINIC_SEED_STAFF_PASSWORD", "hunter2"),
            ("CLINIC_DB_PATH", "x"),
        ]))
        .unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("top-secret-value"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn app_name_is_clinic() {
        assert_eq!(APP_NAME, "Clinic");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}
