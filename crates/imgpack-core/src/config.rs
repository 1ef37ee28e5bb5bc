//! Configuration module
//!
//! Server, upload and encoder settings loaded from the environment (and `.env`).

use std::env;
use std::str::FromStr;

const SERVER_PORT: u16 = 3000;
const MAX_UPLOAD_SIZE_MB: usize = 500;
const AVIF_SPEED: u8 = 6;
const HTTP_CONCURRENCY_LIMIT: usize = 1024;
const ARCHIVE_FILENAME: &str = "images.zip";

/// What the batch does when a single (file, format) encode fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncodeFailurePolicy {
    /// Leave the slot empty, record the failure and keep going.
    #[default]
    Skip,
    /// Abandon the whole batch on the first failed encode.
    Abort,
}

impl FromStr for EncodeFailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skip" => Ok(EncodeFailurePolicy::Skip),
            "abort" => Ok(EncodeFailurePolicy::Abort),
            _ => Err(anyhow::anyhow!(
                "Invalid encode failure policy: {} (expected 'skip' or 'abort')",
                s
            )),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub max_upload_size_bytes: usize,
    pub encode_failure_policy: EncodeFailurePolicy,
    pub avif_speed: u8,
    pub archive_filename: String,
    pub http_concurrency_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: SERVER_PORT,
            environment: "development".to_string(),
            cors_origins: vec!["*".to_string()],
            max_upload_size_bytes: MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            encode_failure_policy: EncodeFailurePolicy::default(),
            avif_speed: AVIF_SPEED,
            archive_filename: ARCHIVE_FILENAME.to_string(),
            http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        let encode_failure_policy = match env::var("ENCODE_FAILURE_POLICY") {
            Ok(value) => value.parse()?,
            Err(_) => EncodeFailurePolicy::default(),
        };

        Ok(Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            cors_origins,
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            encode_failure_policy,
            avif_speed: env::var("AVIF_SPEED")
                .ok()
                .and_then(|s| s.parse::<u8>().ok())
                .unwrap_or(AVIF_SPEED)
                .clamp(1, 10),
            archive_filename: env::var("ARCHIVE_FILENAME")
                .unwrap_or_else(|_| ARCHIVE_FILENAME.to_string()),
            http_concurrency_limit: env::var("HTTP_CONCURRENCY_LIMIT")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT)
                .max(1),
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.max_upload_size_bytes
    }

    pub fn encode_failure_policy(&self) -> EncodeFailurePolicy {
        self.encode_failure_policy
    }

    pub fn avif_speed(&self) -> u8 {
        self.avif_speed
    }

    pub fn archive_filename(&self) -> &str {
        &self.archive_filename
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.http_concurrency_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_failure_policy_parse() {
        assert_eq!(
            "skip".parse::<EncodeFailurePolicy>().unwrap(),
            EncodeFailurePolicy::Skip
        );
        assert_eq!(
            " ABORT ".parse::<EncodeFailurePolicy>().unwrap(),
            EncodeFailurePolicy::Abort
        );
        assert!("retry".parse::<EncodeFailurePolicy>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server_port(), 3000);
        assert_eq!(config.max_upload_size_bytes(), 500 * 1024 * 1024);
        assert_eq!(config.archive_filename(), "images.zip");
        assert_eq!(config.encode_failure_policy(), EncodeFailurePolicy::Skip);
        assert!(!config.is_production());
    }

    #[test]
    fn test_is_production() {
        let config = Config {
            environment: "Prod".to_string(),
            ..Config::default()
        };
        assert!(config.is_production());
    }
}
