//! Configuration management for the fuel photo server
//!
//! Every value has a built-in default, so the server runs with no
//! environment at all. Environment variables (or a `.env` file) override them.

use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BUCKET: &str = "arquivo-pdf-e-xml";
pub const DEFAULT_KEY_FILE: &str = "./googleConfig/key.json";
pub const GOOGLE_STORAGE_BASE_URL: &str = "https://storage.googleapis.com";
pub const GOOGLE_VISION_BASE_URL: &str = "https://vision.googleapis.com";

/// Upper bound on the whole multipart body: 40MB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 40 * 1024 * 1024;

/// Timeout applied to each call to Cloud Storage or Vision
pub const DEFAULT_CALL_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub google: GoogleConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub bucket: String,
    /// Base of the public object URL handed to the OCR service
    pub public_base_url: String,
    /// Base of the JSON API media upload endpoint
    pub upload_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    pub key_file: PathBuf,
    pub vision_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub temp_dir: PathBuf,
    pub max_bytes: usize,
    pub call_timeout_secs: u64,
}

impl UploadConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: DEFAULT_PORT,
            },
            storage: StorageConfig {
                bucket: DEFAULT_BUCKET.to_string(),
                public_base_url: GOOGLE_STORAGE_BASE_URL.to_string(),
                upload_base_url: GOOGLE_STORAGE_BASE_URL.to_string(),
            },
            google: GoogleConfig {
                key_file: PathBuf::from(DEFAULT_KEY_FILE),
                vision_base_url: GOOGLE_VISION_BASE_URL.to_string(),
            },
            upload: UploadConfig {
                temp_dir: PathBuf::from("uploads"),
                max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
                call_timeout_secs: DEFAULT_CALL_TIMEOUT_SECS,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let string = |var: &str, default: String| lookup(var).unwrap_or(default);

        Ok(Config {
            server: ServerConfig {
                host: string("SERVER_HOST", defaults.server.host),
                port: parse_var(&lookup, "SERVER_PORT", defaults.server.port)?,
            },
            storage: StorageConfig {
                bucket: string("GCS_BUCKET", defaults.storage.bucket),
                public_base_url: trim_base(string(
                    "GCS_PUBLIC_BASE_URL",
                    defaults.storage.public_base_url,
                )),
                upload_base_url: trim_base(string(
                    "GCS_UPLOAD_BASE_URL",
                    defaults.storage.upload_base_url,
                )),
            },
            google: GoogleConfig {
                key_file: lookup("GOOGLE_KEY_FILE")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.google.key_file),
                vision_base_url: trim_base(string(
                    "VISION_BASE_URL",
                    defaults.google.vision_base_url,
                )),
            },
            upload: UploadConfig {
                temp_dir: lookup("UPLOAD_TEMP_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.upload.temp_dir),
                max_bytes: parse_var(&lookup, "UPLOAD_MAX_BYTES", defaults.upload.max_bytes)?,
                call_timeout_secs: parse_var(
                    &lookup,
                    "UPLOAD_CALL_TIMEOUT_SECS",
                    defaults.upload.call_timeout_secs,
                )?,
            },
        })
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value }),
        None => Ok(default),
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
