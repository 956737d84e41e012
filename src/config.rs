use serde::{Deserialize, Serialize};

use std::{env, fs, path::Path};

const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    pub database_url: String,
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },

    #[error(
        "no config file found and environment variables are incomplete \
         (DATABASE_URL is required): {0}"
    )]
    Env(#[from] envy::Error),

    #[error("database url must not be empty")]
    EmptyDatabaseUrl,
}

/// Where notes are kept, decided by the scheme of the connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKind {
    Postgres(String),
    Memory,
}

#[derive(Debug, thiserror::Error)]
#[error("unsupported store connection string '{0}', expected postgres:// or memory://")]
pub struct UnsupportedStore(pub String);

impl Config {
    pub fn store_kind(&self) -> Result<StoreKind, UnsupportedStore> {
        let url = self.database_url.as_str();
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(StoreKind::Postgres(url.to_string()))
        } else if url.starts_with("memory://") {
            Ok(StoreKind::Memory)
        } else {
            Err(UnsupportedStore(url.to_string()))
        }
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::EmptyDatabaseUrl);
        }
        Ok(self)
    }
}

fn load_from_file(path: &str) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_string(),
        source,
    })?;

    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })
}

fn load_from_env<I>(vars: I) -> Result<Config, ConfigError>
where
    I: IntoIterator<Item = (String, String)>,
{
    envy::from_iter(vars).map_err(Into::into)
}

pub fn load_config() -> Result<Config, ConfigError> {
    // Retrieve env variable
    let config_path = env::var("MDNOTES_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    // Try env path
    if Path::new(&config_path).exists() {
        return load_from_file(&config_path)?.validated();
    }

    // Fallback to config.yaml
    if Path::new("config.yaml").exists() {
        tracing::warn!(
            "Config file '{}' not found, falling back to 'config.yaml'",
            config_path
        );
        return load_from_file("config.yaml")?.validated();
    }

    // Fallback to environment variables
    tracing::info!(
        "No config file found, attempting to load configuration from environment variables"
    );
    load_from_env(env::vars())?.validated()
}
