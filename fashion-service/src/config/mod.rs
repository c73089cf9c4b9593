use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Default attachment cap: 10 MiB.
pub const DEFAULT_UPLOAD_MAX_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct FashionConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub cors: CorsConfig,
    pub upload: UploadConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// The single origin allowed to call the API from a browser.
    pub allowed_origin: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub max_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
    /// OTLP exporter is disabled when unset.
    pub otlp_endpoint: Option<String>,
}

impl FashionConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;

        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(FashionConfig {
            common: common_config,
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", Some("mongodb://127.0.0.1:27017"), is_prod)?,
                database: get_env("MONGODB_DATABASE", Some("FashionData"), is_prod)?,
                collection: get_env("MONGODB_COLLECTION", Some("Fashion"), is_prod)?,
            },
            cors: CorsConfig {
                allowed_origin: get_env(
                    "CORS_ALLOWED_ORIGIN",
                    Some("http://localhost:4200"),
                    is_prod,
                )?,
            },
            upload: UploadConfig {
                max_bytes: parse_max_bytes(&get_env(
                    "UPLOAD_MAX_BYTES",
                    Some(&DEFAULT_UPLOAD_MAX_BYTES.to_string()),
                    is_prod,
                )?)?,
            },
            telemetry: TelemetryConfig {
                log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
                otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|v| !v.is_empty()),
            },
        })
    }
}

fn parse_max_bytes(raw: &str) -> Result<usize, AppError> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(AppError::ConfigError(anyhow::anyhow!(
            "UPLOAD_MAX_BYTES must be greater than zero"
        ))),
        Ok(n) => Ok(n),
        Err(e) => Err(AppError::ConfigError(anyhow::anyhow!(
            "Invalid UPLOAD_MAX_BYTES '{}': {}",
            raw,
            e
        ))),
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_bytes_parses_plain_integers() {
        assert_eq!(parse_max_bytes("10485760").unwrap(), DEFAULT_UPLOAD_MAX_BYTES);
        assert_eq!(parse_max_bytes(" 2048 ").unwrap(), 2048);
    }

    #[test]
    fn max_bytes_rejects_zero_and_garbage() {
        assert!(matches!(
            parse_max_bytes("0"),
            Err(AppError::ConfigError(_))
        ));
        assert!(matches!(
            parse_max_bytes("ten megs"),
            Err(AppError::ConfigError(_))
        ));
    }

    #[test]
    fn get_env_falls_back_to_default_outside_prod() {
        let value = get_env("FASHION_TEST_SURELY_UNSET_KEY", Some("fallback"), false).unwrap();
        assert_eq!(value, "fallback");
    }

    #[test]
    fn get_env_requires_value_in_prod() {
        let result = get_env("FASHION_TEST_SURELY_UNSET_KEY", Some("fallback"), true);
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }
}
