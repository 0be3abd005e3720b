//! Configuration module
//!
//! Settings are read from the environment (after loading `.env` when present).
//! Every setting has a default so a local development stack starts without any
//! configuration; `Config::validate` rejects combinations that cannot work.

use std::env;
use std::path::PathBuf;

use crate::constants::{API_PREFIX, DEFAULT_QUEUE_NAME, LOCAL_FILE_ROUTE};
use crate::storage_types::StorageDriver;

// Common constants
const SERVER_PORT: u16 = 8080;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const DB_PORT: u16 = 5432;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";
const DEFAULT_MINIO_ENDPOINT: &str = "http://localhost:9000";
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;

/// HTTP server settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub log_format: String,
    /// Maximum number of in-flight HTTP requests
    pub http_concurrency_limit: usize,
}

/// Relational database settings
#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub name: String,
    pub port: u16,
    pub ssl_mode: String,
    pub max_connections: u32,
    pub timeout_seconds: u64,
}

/// Storage backend settings
///
/// Bucket, endpoint, region and credentials are only used by the object-storage
/// drivers; the local driver uses `local_path` and signs URLs that point back at
/// `public_base_url`.
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub driver: StorageDriver,
    pub bucket: String,
    pub endpoint: Option<String>,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    pub local_path: PathBuf,
    pub public_base_url: String,
    pub url_signing_key: Option<String>,
}

impl StorageConfig {
    /// Base URL of the API route that serves local-disk files.
    pub fn local_files_base_url(&self) -> String {
        format!(
            "{}{}{}",
            self.public_base_url.trim_end_matches('/'),
            API_PREFIX,
            LOCAL_FILE_ROUTE
        )
    }
}

/// Job queue settings
#[derive(Clone, Debug)]
pub struct QueueConfig {
    pub redis_url: String,
    pub queue_name: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub queue: QueueConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let server_port: u16 = get("PORT", &SERVER_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins: Vec<String> = get("CORS_ORIGINS", DEFAULT_CORS_ORIGINS)
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port,
            cors_origins,
            environment,
            log_format: get("LOG_FORMAT", "text").to_lowercase(),
            http_concurrency_limit: get(
                "HTTP_CONCURRENCY_LIMIT",
                &HTTP_CONCURRENCY_LIMIT.to_string(),
            )
            .parse::<usize>()
            .unwrap_or(HTTP_CONCURRENCY_LIMIT)
            .max(1),
        };

        let database = DatabaseConfig {
            host: get("DB_HOST", "localhost"),
            user: get("DB_USER", "postgres"),
            password: get("DB_PASS", "postgres"),
            name: get("DB_NAME", "meeting_assistant"),
            port: get("DB_PORT", &DB_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("DB_PORT must be a valid number"))?,
            ssl_mode: get("DB_SSLMODE", "disable"),
            max_connections: get("DB_MAX_CONNECTIONS", &MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            timeout_seconds: get("DB_TIMEOUT_SECONDS", &CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
        };

        let driver: StorageDriver = get("STORAGE_DRIVER", "minio").parse()?;
        let endpoint = var("STORAGE_ENDPOINT")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .or_else(|| {
                (driver == StorageDriver::Minio).then(|| DEFAULT_MINIO_ENDPOINT.to_string())
            });

        let storage = StorageConfig {
            driver,
            bucket: get("STORAGE_BUCKET", "meetings"),
            endpoint,
            region: get("STORAGE_REGION", "us-east-1"),
            access_key: get("STORAGE_ACCESS_KEY", "minioadmin"),
            secret_key: get("STORAGE_SECRET_KEY", "minioadmin"),
            local_path: PathBuf::from(get("LOCAL_STORAGE_PATH", "./uploads")),
            public_base_url: var("PUBLIC_BASE_URL")
                .unwrap_or_else(|| format!("http://localhost:{}", server_port)),
            url_signing_key: var("LOCAL_URL_SIGNING_KEY").filter(|s| !s.is_empty()),
        };

        let queue = QueueConfig {
            redis_url: get("REDIS_URL", "localhost:6379"),
            queue_name: get("QUEUE_NAME", DEFAULT_QUEUE_NAME),
        };

        Ok(Config {
            base,
            database,
            storage,
            queue,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.base.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.database.max_connections == 0 {
            return Err(anyhow::anyhow!("DB_MAX_CONNECTIONS cannot be 0"));
        }

        let storage = &self.storage;
        match storage.driver {
            StorageDriver::S3 | StorageDriver::Minio => {
                if storage.bucket.trim().is_empty() {
                    return Err(anyhow::anyhow!(
                        "STORAGE_BUCKET must be set when using the {} storage driver",
                        storage.driver
                    ));
                }
                if storage.region.trim().is_empty() {
                    return Err(anyhow::anyhow!(
                        "STORAGE_REGION must be set when using the {} storage driver",
                        storage.driver
                    ));
                }
                match storage.endpoint {
                    Some(ref endpoint) => {
                        url::Url::parse(endpoint).map_err(|e| {
                            anyhow::anyhow!("STORAGE_ENDPOINT '{}' is not a valid URL: {}", endpoint, e)
                        })?;
                    }
                    None if storage.driver == StorageDriver::Minio => {
                        return Err(anyhow::anyhow!(
                            "STORAGE_ENDPOINT must be set when using the minio storage driver"
                        ));
                    }
                    None => {}
                }
            }
            StorageDriver::Local => {
                if storage.local_path.as_os_str().is_empty() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using the local storage driver"
                    ));
                }
                url::Url::parse(&storage.public_base_url).map_err(|e| {
                    anyhow::anyhow!(
                        "PUBLIC_BASE_URL '{}' is not a valid URL: {}",
                        storage.public_base_url,
                        e
                    )
                })?;
            }
        }

        Ok(())
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn log_json(&self) -> bool {
        self.base.log_format == "json"
    }

    pub fn storage_driver(&self) -> StorageDriver {
        self.storage.driver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, anyhow::Error> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.server_port(), 8080);
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.name, "meeting_assistant");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.ssl_mode, "disable");
        assert_eq!(config.storage_driver(), StorageDriver::Minio);
        assert_eq!(
            config.storage.endpoint.as_deref(),
            Some("http://localhost:9000")
        );
        assert_eq!(config.queue.redis_url, "localhost:6379");
        assert_eq!(config.queue.queue_name, "meeting_jobs");
        assert_eq!(
            config.cors_origins(),
            &["http://localhost:3000", "http://127.0.0.1:3000"]
        );
        assert_eq!(config.storage.public_base_url, "http://localhost:8080");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_concurrency_limit_falls_back_and_floors() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.base.http_concurrency_limit, 10_000);

        let config = config_from(&[("HTTP_CONCURRENCY_LIMIT", "lots")]).unwrap();
        assert_eq!(config.base.http_concurrency_limit, 10_000);

        let config = config_from(&[("HTTP_CONCURRENCY_LIMIT", "0")]).unwrap();
        assert_eq!(config.base.http_concurrency_limit, 1);
    }

    #[test]
    fn test_invalid_port_is_error() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
        assert!(config_from(&[("DB_PORT", "")]).is_err());
    }

    #[test]
    fn test_unknown_driver_is_error() {
        let err = config_from(&[("STORAGE_DRIVER", "ftp")]).unwrap_err();
        assert!(err.to_string().contains("ftp"));
    }

    #[test]
    fn test_s3_driver_without_endpoint() {
        let config = config_from(&[("STORAGE_DRIVER", "s3")]).unwrap();
        assert!(config.storage.endpoint.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_malformed_endpoint_rejected() {
        let config = config_from(&[("STORAGE_ENDPOINT", "not a url")]).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("STORAGE_ENDPOINT"));
    }

    #[test]
    fn test_wildcard_cors_rejected_in_production() {
        let config =
            config_from(&[("ENVIRONMENT", "production"), ("CORS_ORIGINS", "*")]).unwrap();
        assert!(config.validate().is_err());

        let config = config_from(&[("CORS_ORIGINS", "*")]).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_bucket_rejected() {
        let config = config_from(&[("STORAGE_BUCKET", " ")]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_local_driver_ignores_object_store_settings() {
        let config = config_from(&[
            ("STORAGE_DRIVER", "local"),
            ("STORAGE_BUCKET", ""),
            ("LOCAL_STORAGE_PATH", "/tmp/recordings"),
            ("PUBLIC_BASE_URL", "https://api.example.com"),
        ])
        .unwrap();
        assert!(config.storage.endpoint.is_none());
        assert!(config.validate().is_ok());
        assert_eq!(
            config.storage.local_files_base_url(),
            "https://api.example.com/api/v1/file/local"
        );
    }
}
