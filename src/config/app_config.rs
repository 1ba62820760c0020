use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::domain::{Network, NetworkContext};

const DEFAULT_NET_A_QUOTA: u64 = 100_000;
const DEFAULT_NET_B_QUOTA: u64 = 10_000;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub key_service: KeyServiceConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Key-issuing service settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeyServiceConfig {
    /// Serve keys from the in-memory mock instead of the remote service
    pub use_mock: bool,
    /// Request timeout applied to every network
    pub timeout_secs: u64,
    pub networks: NetworksConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NetworksConfig {
    pub net_a: NetworkConfig,
    pub net_b: NetworkConfig,
}

#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub base_url: String,
    pub bearer_token: String,
    /// Falls back to the network's default quota when unset
    pub quota: Option<u64>,
}

/// Invalid or unloadable configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{network}: {field} must be set when the remote key service is enabled")]
    MissingSetting {
        network: Network,
        field: &'static str,
    },

    #[error("{network}: invalid base URL '{url}': {message}")]
    InvalidBaseUrl {
        network: Network,
        url: String,
        message: String,
    },

    #[error("{network}: quota must be greater than zero")]
    ZeroQuota { network: Network },

    #[error("key_service.timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    #[error(transparent)]
    Load(#[from] config::ConfigError),
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for KeyServiceConfig {
    fn default() -> Self {
        Self {
            use_mock: true,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            networks: NetworksConfig::default(),
        }
    }
}

fn default_quota(network: Network) -> u64 {
    match network {
        Network::NetA => DEFAULT_NET_A_QUOTA,
        Network::NetB => DEFAULT_NET_B_QUOTA,
    }
}

impl NetworkConfig {
    fn validate(&self, network: Network, quota: u64) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::MissingSetting {
                network,
                field: "base_url",
            });
        }

        let url = reqwest::Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            network,
            url: self.base_url.clone(),
            message: e.to_string(),
        })?;

        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl {
                network,
                url: self.base_url.clone(),
                message: "URL cannot be used as a base".to_string(),
            });
        }

        if self.bearer_token.trim().is_empty() {
            return Err(ConfigError::MissingSetting {
                network,
                field: "bearer_token",
            });
        }

        if quota == 0 {
            return Err(ConfigError::ZeroQuota { network });
        }

        Ok(())
    }
}

impl std::fmt::Debug for NetworkConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkConfig")
            .field("base_url", &self.base_url)
            .field("bearer_token", &"<redacted>")
            .field("quota", &self.quota)
            .finish()
    }
}

impl NetworksConfig {
    pub fn get(&self, network: Network) -> &NetworkConfig {
        match network {
            Network::NetA => &self.net_a,
            Network::NetB => &self.net_b,
        }
    }

    /// Configured quota for `network`, or its default
    pub fn quota(&self, network: Network) -> u64 {
        self.get(network)
            .quota
            .unwrap_or_else(|| default_quota(network))
    }

    pub fn context(&self, network: Network) -> NetworkContext {
        let slot = self.get(network);
        NetworkContext::new(&slot.base_url, &slot.bearer_token, self.quota(network))
    }
}

impl KeyServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check the settings the remote backend needs
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        for network in Network::ALL {
            self.networks
                .get(network)
                .validate(network, self.networks.quota(network))?;
        }

        Ok(())
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(Self::environment())
            .build()?;

        Ok(config.try_deserialize()?)
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("APP")
            .separator("__")
            .try_parsing(true)
    }
}
