//! Configuration module
//!
//! Environment-driven configuration for the API and background services:
//! database, primary and backup storage, authentication, and the
//! enhancement provider.

use std::env;
use std::str::FromStr;

use crate::storage_types::{EnhancementProvider, StorageBackend};

// Common constants
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const JWT_EXPIRY_HOURS: i64 = 24;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    // Primary storage configuration
    pub storage_backend: Option<StorageBackend>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO etc.)
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Secondary (backup) storage configuration
    pub backup_bucket: String,
    pub backup_region: Option<String>,
    pub backup_endpoint: Option<String>,
    pub backup_sweep_interval_secs: u64,
    pub backup_queue_capacity: usize,
    // Upload limits
    pub max_document_size_bytes: usize,
    pub document_allowed_extensions: Vec<String>,
    pub document_allowed_content_types: Vec<String>,
    // Enhancement provider configuration
    pub enhancement_provider: EnhancementProvider,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub cohere_api_key: Option<String>,
    pub cohere_model: String,
    pub enhancement_timeout_secs: u64,
}

impl Config {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        const MAX_DOCUMENT_SIZE_MB: usize = 10;
        const BACKUP_SWEEP_INTERVAL_SECS: u64 = 86400;
        const BACKUP_QUEUE_CAPACITY: usize = 256;
        const ENHANCEMENT_TIMEOUT_SECS: u64 = 60;

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let storage_backend = env::var("STORAGE_BACKEND")
            .ok()
            .and_then(|s| StorageBackend::from_str(&s).ok());

        let enhancement_provider = env::var("ENHANCEMENT_PROVIDER")
            .ok()
            .map(|s| EnhancementProvider::from_str(&s))
            .transpose()?
            .unwrap_or(EnhancementProvider::Gemini);

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            jwt_expiry_hours: env::var("JWT_EXPIRY_HOURS")
                .unwrap_or_else(|_| JWT_EXPIRY_HOURS.to_string())
                .parse()
                .unwrap_or(JWT_EXPIRY_HOURS),
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            backup_bucket: env::var("BACKUP_S3_BUCKET")
                .unwrap_or_else(|_| "smartcv-backup".to_string()),
            backup_region: env::var("BACKUP_S3_REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .ok(),
            backup_endpoint: env::var("BACKUP_S3_ENDPOINT").ok(),
            backup_sweep_interval_secs: env::var("BACKUP_SWEEP_INTERVAL_SECS")
                .unwrap_or_else(|_| BACKUP_SWEEP_INTERVAL_SECS.to_string())
                .parse()
                .unwrap_or(BACKUP_SWEEP_INTERVAL_SECS),
            backup_queue_capacity: env::var("BACKUP_QUEUE_CAPACITY")
                .unwrap_or_else(|_| BACKUP_QUEUE_CAPACITY.to_string())
                .parse()
                .unwrap_or(BACKUP_QUEUE_CAPACITY),
            max_document_size_bytes: env::var("MAX_DOCUMENT_SIZE_MB")
                .unwrap_or_else(|_| MAX_DOCUMENT_SIZE_MB.to_string())
                .parse::<usize>()
                .unwrap_or(MAX_DOCUMENT_SIZE_MB)
                * 1024
                * 1024,
            document_allowed_extensions: env::var("DOCUMENT_ALLOWED_EXTENSIONS")
                .unwrap_or_else(|_| "pdf".to_string())
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .collect(),
            document_allowed_content_types: env::var("DOCUMENT_ALLOWED_CONTENT_TYPES")
                .unwrap_or_else(|_| "application/pdf".to_string())
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .collect(),
            enhancement_provider,
            gemini_api_key: env::var("GEMINI_API_KEY").ok(),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
            cohere_api_key: env::var("COHERE_API_KEY").ok(),
            cohere_model: env::var("COHERE_MODEL").unwrap_or_else(|_| "command".to_string()),
            enhancement_timeout_secs: env::var("ENHANCEMENT_TIMEOUT_SECS")
                .unwrap_or_else(|_| ENHANCEMENT_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(ENHANCEMENT_TIMEOUT_SECS),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if !self.database_url.starts_with("postgresql://")
            && !self.database_url.starts_with("postgres://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        let backend = self.storage_backend.unwrap_or(StorageBackend::S3);
        match backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        match self.enhancement_provider {
            EnhancementProvider::Gemini => {
                if self.gemini_api_key.is_none() {
                    return Err(anyhow::anyhow!(
                        "GEMINI_API_KEY must be set when ENHANCEMENT_PROVIDER=gemini"
                    ));
                }
            }
            EnhancementProvider::Cohere => {
                if self.cohere_api_key.is_none() {
                    return Err(anyhow::anyhow!(
                        "COHERE_API_KEY must be set when ENHANCEMENT_PROVIDER=cohere"
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            server_port: 4000,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
            database_url: "postgresql://localhost/smartcv".to_string(),
            db_max_connections: 20,
            db_timeout_seconds: 30,
            jwt_secret: "a".repeat(32),
            jwt_expiry_hours: 24,
            storage_backend: Some(StorageBackend::Local),
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            local_storage_path: Some("/tmp/smartcv".to_string()),
            local_storage_base_url: Some("http://localhost:4000/files".to_string()),
            backup_bucket: "smartcv-backup".to_string(),
            backup_region: Some("us-east-1".to_string()),
            backup_endpoint: None,
            backup_sweep_interval_secs: 86400,
            backup_queue_capacity: 256,
            max_document_size_bytes: 10 * 1024 * 1024,
            document_allowed_extensions: vec!["pdf".to_string()],
            document_allowed_content_types: vec!["application/pdf".to_string()],
            enhancement_provider: EnhancementProvider::Gemini,
            gemini_api_key: Some("test-key".to_string()),
            gemini_model: "gemini-1.5-flash".to_string(),
            cohere_api_key: None,
            cohere_model: "command".to_string(),
            enhancement_timeout_secs: 60,
        }
    }

    #[test]
    fn test_validate_accepts_local_backend() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_jwt_secret() {
        let mut config = base_config();
        config.jwt_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_s3_without_bucket() {
        let mut config = base_config();
        config.storage_backend = Some(StorageBackend::S3);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_requires_provider_key() {
        let mut config = base_config();
        config.enhancement_provider = EnhancementProvider::Cohere;
        assert!(config.validate().is_err());
        config.cohere_api_key = Some("test-key".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_is_production() {
        let mut config = base_config();
        assert!(!config.is_production());
        config.environment = "Production".to_string();
        assert!(config.is_production());
    }
}
