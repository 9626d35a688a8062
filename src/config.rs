//! Application configuration
//!
//! Loaded from a TOML file; every section falls back to its defaults when
//! omitted, so an empty file is a valid configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::analytics::RecommendationThresholds;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::database::DatabaseConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Default config location: `<config_dir>/wellora/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wellora")
        .join("config.toml")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub security: SecurityConfig,
    pub admin: AdminConfig,
    pub logging: LoggingConfig,
    pub cache: CacheConfig,
    pub rate_limit: RateLimitConfig,
    pub nutrition: NutritionConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Write the config, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.security.jwt_secret.clone(),
            access_expiration_minutes: self.security.access_token_expire_minutes,
            refresh_expiration_days: self.security.refresh_token_expire_days,
            ..JwtConfig::default()
        }
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_host: String,
    pub api_port: u16,
    /// Seconds allowed for in-flight requests to drain on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 8080,
            shutdown_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        let db = DatabaseConfig::default();
        Self {
            url: db.url,
            max_connections: db.max_connections,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub access_token_expire_minutes: i64,
    pub refresh_token_expire_days: i64,
    pub bcrypt_cost: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        let jwt = JwtConfig::default();
        Self {
            jwt_secret: jwt.secret,
            access_token_expire_minutes: jwt.access_expiration_minutes,
            refresh_token_expire_days: jwt.refresh_expiration_days,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            name: "Administrator".to_string(),
            email: "admin@wellora.local".to_string(),
            password: "admin12345".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `plain` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "plain".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
    pub sweep_interval_seconds: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 300,
            sweep_interval_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub max_requests: u32,
    pub window_seconds: u64,
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_seconds)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 100,
            window_seconds: 3600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NutritionConfig {
    /// Used for users without a personal goal
    pub default_calorie_goal: f64,
    pub protein_target_g: f64,
    pub carbs_limit_g: f64,
    pub fat_limit_g: f64,
    /// Max foods attached to a recommendation
    pub suggestion_limit: u64,
}

impl NutritionConfig {
    /// Thresholds for a user with the given personal calorie goal.
    pub fn thresholds(&self, personal_goal: Option<f64>) -> RecommendationThresholds {
        RecommendationThresholds {
            calorie_goal: personal_goal.unwrap_or(self.default_calorie_goal),
            protein_target_g: self.protein_target_g,
            carbs_limit_g: self.carbs_limit_g,
            fat_limit_g: self.fat_limit_g,
        }
    }
}

impl Default for NutritionConfig {
    fn default() -> Self {
        let t = RecommendationThresholds::default();
        Self {
            default_calorie_goal: t.calorie_goal,
            protein_target_g: t.protein_target_g,
            carbs_limit_g: t.carbs_limit_g,
            fat_limit_g: t.fat_limit_g,
            suggestion_limit: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.server.api_port, 8080);
        assert_eq!(cfg.cache.ttl(), Duration::from_secs(300));
        assert_eq!(cfg.rate_limit.max_requests, 100);
        assert_eq!(cfg.rate_limit.window(), Duration::from_secs(3600));
        assert_eq!(cfg.nutrition.suggestion_limit, 5);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [rate_limit]
            max_requests = 5

            [nutrition]
            default_calorie_goal = 1800.0
            "#,
        )
        .unwrap();

        assert_eq!(cfg.rate_limit.max_requests, 5);
        assert!(cfg.rate_limit.enabled);
        assert_eq!(cfg.nutrition.thresholds(None).calorie_goal, 1800.0);
        assert_eq!(cfg.nutrition.thresholds(Some(2500.0)).calorie_goal, 2500.0);
        assert_eq!(cfg.nutrition.protein_target_g, 50.0);
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = std::env::temp_dir().join(format!("wellora-cfg-{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.toml");

        let mut cfg = AppConfig::default();
        cfg.server.api_port = 9999;
        cfg.logging.format = "json".into();
        cfg.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.server.api_port, 9999);
        assert_eq!(loaded.logging.format, "json");

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = toml::from_str::<AppConfig>("server = 5").unwrap_err();
        assert!(matches!(ConfigError::from(err), ConfigError::Parse(_)));
    }

    #[test]
    fn jwt_config_follows_security_section() {
        let mut cfg = AppConfig::default();
        cfg.security.jwt_secret = "s3cret".into();
        cfg.security.access_token_expire_minutes = 5;
        let jwt = cfg.jwt_config();
        assert_eq!(jwt.secret, "s3cret");
        assert_eq!(jwt.access_expires_in(), 300);
        assert_eq!(jwt.issuer, "wellora");
    }
}
