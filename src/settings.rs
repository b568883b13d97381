use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use jsonwebtoken::DecodingKey;
use std::{env, fmt, str::FromStr};
use zeroize::Zeroizing;

use crate::domain::{
    analysis::TagRules,
    search::{KeywordVocabulary, ScoreWeights},
};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

/// Tuning of the relevance search.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SearchSettings {
    /// Records scoring below this are dropped from results.
    pub min_score: i64,
    pub weights: ScoreWeights,
    pub vocabulary: KeywordVocabulary,
    pub tag_rules: TagRules,
}

impl Default for SearchSettings {
    fn default() -> Self {
        SearchSettings {
            min_score: 30,
            weights: ScoreWeights::default(),
            vocabulary: KeywordVocabulary::default(),
            tag_rules: TagRules::default(),
        }
    }
}

impl SearchSettings {
    fn validate(&self) -> Vec<String> {
        let mut errors = self.weights.validate().err().unwrap_or_default();

        if self.min_score < 1 {
            errors.push("search.min_score must be at least 1".to_string());
        }
        if self.min_score > self.weights.tag {
            errors.push("search.min_score cannot exceed the tag weight".to_string());
        }

        errors
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default)]
    pub database_url: String,

    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,

    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default)]
    pub jwt_secret: String,

    /// Expected `aud` claim. Empty disables the audience check.
    #[serde(default = "default_jwt_audience")]
    pub jwt_audience: String,

    #[serde(default)]
    pub storage_url: String,

    #[serde(default = "default_storage_bucket")]
    pub storage_bucket: String,

    #[serde(default)]
    pub storage_service_key: String,

    #[serde(default)]
    pub search: SearchSettings,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Screensort-API".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_max_connections() -> u32 {
    20
}
fn default_run_migrations() -> bool {
    true
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_jwt_audience() -> String {
    "authenticated".to_string()
}
fn default_storage_bucket() -> String {
    "screenshots".to_string()
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .try_parsing(true)
                    .ignore_empty(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        // Inject critical env values if missing
        config.database_url = fill_or_env(config.database_url, "APP_DATABASE_URL")?;
        config.jwt_secret = fill_or_env(config.jwt_secret, "APP_JWT_SECRET")?;
        if config.storage_url.is_empty() {
            config.storage_url = env::var("APP_STORAGE_URL").unwrap_or_default();
        }
        if config.storage_service_key.is_empty() {
            config.storage_service_key = env::var("APP_STORAGE_SERVICE_KEY").unwrap_or_default();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        if self.database_url.trim().is_empty() {
            errors.push("DATABASE_URL cannot be empty".into());
        }
        if self.jwt_secret.len() < 32 {
            errors.push("JWT_SECRET must be at least 32 characters".into());
        }
        if !self.storage_url.is_empty() && url::Url::parse(&self.storage_url).is_err() {
            errors.push("STORAGE_URL must be a valid URL".into());
        }
        if !self.storage_url.is_empty() && self.storage_service_key.is_empty() {
            errors.push("STORAGE_SERVICE_KEY must be set when STORAGE_URL is".into());
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production".into());
        }
        errors.extend(self.search.validate());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn decoding_key(&self) -> DecodingKey {
        let secret = Zeroizing::new(self.jwt_secret.clone());
        DecodingKey::from_secret(secret.as_bytes())
    }
}

fn fill_or_env(current: String, env_key: &str) -> Result<String, ConfigError> {
    if current.trim().is_empty() {
        env::var(env_key).map_err(|_| ConfigError::Message(format!("{env_key} must be set")))
    } else {
        Ok(current)
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else if self.len() < 32 {
            "[TOO_SHORT]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("database_url", &self.database_url.redact())
            .field("database_max_connections", &self.database_max_connections)
            .field("run_migrations", &self.run_migrations)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("jwt_secret", &self.jwt_secret.redact())
            .field("jwt_audience", &self.jwt_audience)
            .field("storage_url", &self.storage_url)
            .field("storage_bucket", &self.storage_bucket)
            .field("storage_service_key", &self.storage_service_key.redact())
            .field("search", &self.search)
            .finish()
    }
}
