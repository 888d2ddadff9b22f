use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use config::{Config, ConfigError, File, FileFormat};
use serde::Deserialize;

pub const CONFIG_PATH_ENV: &str = "IDEA_HUB_CONFIG";
pub const CONFIG_ENV_ENV: &str = "IDEA_HUB_ENV";
const DEFAULT_CONFIG_PATH: &str = "config/api.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub news: NewsConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

impl ApiConfig {
    pub fn load() -> Result<Self> {
        let configured_path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        assert!(
            !configured_path.is_empty(),
            "Configuration path must be non-empty"
        );
        assert!(
            configured_path.len() < 4096,
            "Configuration path length exceeds hard limit"
        );

        let mut builder = Config::builder()
            .add_source(File::new(&configured_path, FileFormat::Toml).required(true));

        if let Ok(env_override) = std::env::var(CONFIG_ENV_ENV) {
            if !env_override.is_empty() {
                let env_file = format!("config/api.{}.toml", env_override);
                if Path::new(&env_file).exists() {
                    builder = builder.add_source(File::new(&env_file, FileFormat::Toml));
                }
            }
        }

        let settings = builder
            .build()
            .map_err(|err| map_config_error(err, &configured_path))?;
        Self::from_settings(settings)
    }

    fn from_settings(settings: Config) -> Result<Self> {
        let config: Self = settings
            .try_deserialize()
            .context("Failed to deserialize API configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.database.url.trim().is_empty() {
            bail!("Database URL must be specified");
        }
        if self.server.port == 0 {
            bail!("Server port must be greater than zero");
        }
        self.database.ensure_bounds()?;
        self.news.ensure_bounds()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: Option<IpAddr>,
    pub port: u16,
}

impl ServerConfig {
    pub fn address(&self) -> SocketAddr {
        let host = self.host.unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert!(self.port != 0, "HTTP port cannot be zero");
        SocketAddr::new(host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: Option<u32>,
}

impl DatabaseConfig {
    fn ensure_bounds(&self) -> Result<()> {
        if self.max_connections == 0 {
            bail!("database.max_connections must be positive");
        }
        if self.max_connections > 128 {
            bail!("database.max_connections exceeds 128");
        }
        if self.min_connections.unwrap_or(1) > self.max_connections {
            bail!("database.min_connections must not exceed max_connections");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsConfig {
    pub upstream_url: String,
    pub request_timeout_ms: Option<u64>,
    pub cache_ttl_seconds: Option<u64>,
    pub max_capacity: Option<u64>,
}

impl NewsConfig {
    pub fn request_timeout(&self) -> Duration {
        let millis = self.request_timeout_ms.unwrap_or(3_000);
        assert!(millis >= 100, "News timeout must be at least 100ms");
        assert!(millis <= 60_000, "News timeout cannot exceed 60 seconds");
        Duration::from_millis(millis)
    }

    /// Upstream news is refreshed at most every two hours by default.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds.unwrap_or(7_200))
    }

    pub fn max_capacity(&self) -> u64 {
        self.max_capacity.unwrap_or(16)
    }

    fn ensure_bounds(&self) -> Result<()> {
        if self.upstream_url.trim().is_empty() {
            bail!("news.upstream_url must be specified");
        }
        if let Some(millis) = self.request_timeout_ms {
            if !(100..=60_000).contains(&millis) {
                bail!("news.request_timeout_ms must be within 100..=60000");
            }
        }
        if self.cache_ttl().as_secs() > 86_400 {
            bail!("news.cache_ttl_seconds cannot exceed one day");
        }
        if self.max_capacity() == 0 {
            bail!("news.max_capacity must be positive");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminConfig {
    /// Enables `DELETE /api/admin/clear`. Development only.
    #[serde(default)]
    pub allow_reset: bool,
}

fn map_config_error(err: ConfigError, path: &str) -> ConfigError {
    match err {
        ConfigError::NotFound(_) => ConfigError::NotFound(path.to_string()),
        other => other,
    }
}
