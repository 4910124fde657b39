use std::path::PathBuf;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except `JWT_SECRET` have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upload staging configuration.
    pub uploads: UploadConfig,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

/// Configuration for the asset store and staging limits.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Directory uploaded files are written to (default: `uploads`).
    pub root_dir: PathBuf,
    /// Public URL prefix under which the root is served (default: `/uploads`).
    pub public_prefix: String,
    /// Per-file size limit in bytes (default: 10 MiB).
    pub max_file_bytes: usize,
    /// Maximum gallery files accepted per request (default: 10).
    pub max_gallery_files: usize,
}

/// Default per-file upload limit: 10 MiB.
const DEFAULT_MAX_FILE_BYTES: usize = 10 * 1024 * 1024;

/// Default gallery array cap per request.
const DEFAULT_MAX_GALLERY_FILES: usize = 10;

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `HOST`                 | `0.0.0.0`               |
    /// | `PORT`                 | `3000`                  |
    /// | `CORS_ORIGINS`         | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                    |
    /// | `UPLOAD_DIR`           | `uploads`               |
    /// | `UPLOAD_PUBLIC_PREFIX` | `/uploads`              |
    /// | `MAX_UPLOAD_BYTES`     | `10485760`              |
    /// | `MAX_GALLERY_FILES`    | `10`                    |
    ///
    /// # Panics
    ///
    /// Panics on malformed values; misconfiguration should fail at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let uploads = UploadConfig::from_env();
        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            uploads,
            jwt,
        }
    }
}

impl UploadConfig {
    fn from_env() -> Self {
        let root_dir = PathBuf::from(std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()));

        let public_prefix =
            std::env::var("UPLOAD_PUBLIC_PREFIX").unwrap_or_else(|_| "/uploads".into());

        let max_file_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_FILE_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let max_gallery_files: usize = std::env::var("MAX_GALLERY_FILES")
            .unwrap_or_else(|_| DEFAULT_MAX_GALLERY_FILES.to_string())
            .parse()
            .expect("MAX_GALLERY_FILES must be a valid usize");

        Self {
            root_dir,
            public_prefix,
            max_file_bytes,
            max_gallery_files,
        }
    }
}
