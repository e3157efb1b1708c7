use std::path::PathBuf;

use spark_core::upload::DEFAULT_MAX_UPLOAD_BYTES;
use spark_pipeline::StepDelays;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long in-flight jobs get to wind down after the server stops
    /// accepting connections (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Directory uploaded images are stored in (default: `storage/uploads`).
    pub upload_dir: PathBuf,
    /// Maximum accepted image upload in bytes (default: 10 MB).
    pub max_upload_bytes: usize,
    /// Simulated duration of each enhancement step.
    pub step_delays: StepDelays,
    /// Admin account created at startup, if configured.
    pub admin: Option<AdminBootstrap>,
}

/// Credentials for the admin account ensured at startup.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                      |
    /// |-------------------------|------------------------------|
    /// | `HOST`                  | `0.0.0.0`                    |
    /// | `PORT`                  | `3000`                       |
    /// | `CORS_ORIGINS`          | `http://localhost:3000`      |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                         |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                         |
    /// | `UPLOAD_DIR`            | `storage/uploads`            |
    /// | `MAX_UPLOAD_BYTES`      | `10485760`                   |
    /// | `AI_STEP_DELAYS_MS`     | `500,1000,2000,1500,1000`    |
    /// | `ADMIN_EMAIL`           | unset (no admin bootstrap)   |
    /// | `ADMIN_PASSWORD`        | unset (no admin bootstrap)   |
    ///
    /// # Panics
    ///
    /// Panics on malformed values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();

        let upload_dir = PathBuf::from(
            std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "storage/uploads".into()),
        );

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .map(|v| v.parse().expect("MAX_UPLOAD_BYTES must be a valid usize"))
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        let step_delays = match std::env::var("AI_STEP_DELAYS_MS") {
            Ok(raw) => StepDelays::parse(&raw)
                .unwrap_or_else(|e| panic!("AI_STEP_DELAYS_MS is invalid: {e}")),
            Err(_) => StepDelays::default(),
        };

        let admin = match (std::env::var("ADMIN_EMAIL"), std::env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
                Some(AdminBootstrap { email, password })
            }
            _ => None,
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt,
            upload_dir,
            max_upload_bytes,
            step_delays,
            admin,
        }
    }
}
