use async_trait::async_trait;

use crate::domain::{
    FetchError, Key, KeyLifecycle, Network, ProvisionError, RemoteServiceError,
};

/// Quota assigned to every mock key
pub const MOCK_QUOTA: u64 = 1000;

/// Deterministic stand-in for the key service, used when it is disabled.
///
/// Never fails and keeps no state: every network has one fixed token.
#[derive(Debug, Clone, Default)]
pub struct MockKeyLifecycleClient;

impl MockKeyLifecycleClient {
    pub fn new() -> Self {
        Self
    }

    pub fn token_for(network: Network) -> &'static str {
        match network {
            Network::NetA => "mock-net-a-token",
            Network::NetB => "mock-net-b-token",
        }
    }

    fn key_for(project_ref: &str, network: Network) -> Key {
        Key::issued(project_ref, Self::token_for(network), MOCK_QUOTA)
    }
}

#[async_trait]
impl KeyLifecycle for MockKeyLifecycleClient {
    async fn create_project(
        &self,
        project_ref: &str,
        network: Network,
    ) -> Result<Key, ProvisionError> {
        Ok(Self::key_for(project_ref, network))
    }

    async fn generate(
        &self,
        project_ref: &str,
        network: Network,
    ) -> Result<Key, RemoteServiceError> {
        Ok(Self::key_for(project_ref, network))
    }

    async fn fetch(&self, _project_ref: &str, network: Network) -> Result<String, FetchError> {
        Ok(Self::token_for(network).to_string())
    }

    async fn fetch_all(
        &self,
        _project_ref: &str,
        network: Network,
    ) -> Result<Vec<String>, RemoteServiceError> {
        Ok(vec![Self::token_for(network).to_string()])
    }

    async fn invalidate(
        &self,
        _project_ref: &str,
        _network: Network,
    ) -> Result<(), RemoteServiceError> {
        Ok(())
    }

    async fn rotate(
        &self,
        project_ref: &str,
        network: Network,
    ) -> Result<Key, RemoteServiceError> {
        self.generate(project_ref, network).await
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }
}
