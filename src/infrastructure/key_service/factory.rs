use std::sync::Arc;

use super::{HttpClient, MockKeyLifecycleClient, NetworkCredentialStore, RemoteKeyLifecycleClient};
use crate::config::{ConfigError, KeyServiceConfig};
use crate::domain::{KeyLifecycle, Network};

/// Factory for creating the key lifecycle backend
#[derive(Debug)]
pub struct KeyLifecycleFactory;

impl KeyLifecycleFactory {
    /// Create the backend selected by `use_mock`
    pub fn create(config: &KeyServiceConfig) -> Result<Arc<dyn KeyLifecycle>, ConfigError> {
        if config.use_mock {
            return Ok(Arc::new(MockKeyLifecycleClient::new()));
        }

        config.validate()?;

        let networks = NetworkCredentialStore::new(
            config.networks.context(Network::NetA),
            config.networks.context(Network::NetB),
        );
        let client = HttpClient::with_timeout(config.timeout())
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Arc::new(RemoteKeyLifecycleClient::new(client, networks)))
    }
}
