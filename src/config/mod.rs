//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, ConfigError, KeyServiceConfig, LogFormat, LoggingConfig, NetworkConfig,
    NetworksConfig,
};
