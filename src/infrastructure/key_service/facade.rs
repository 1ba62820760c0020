use std::fmt;
use std::sync::Arc;

use tracing::info;

use super::KeyLifecycleFactory;
use crate::config::{ConfigError, KeyServiceConfig};
use crate::domain::{FetchError, Key, KeyLifecycle, Network, ProvisionError, RemoteServiceError};

/// Single entry point for key operations.
///
/// The backend is chosen once when the facade is built and never swapped, so
/// callers do not know whether the remote service or the mock serves them.
#[derive(Clone)]
pub struct KeyLifecycleFacade {
    inner: Arc<dyn KeyLifecycle>,
}

impl KeyLifecycleFacade {
    pub fn new(inner: Arc<dyn KeyLifecycle>) -> Self {
        Self { inner }
    }

    pub fn from_config(config: &KeyServiceConfig) -> Result<Self, ConfigError> {
        let inner = KeyLifecycleFactory::create(config)?;
        info!(backend = inner.backend_name(), "Key lifecycle backend selected");
        Ok(Self::new(inner))
    }

    pub fn backend_name(&self) -> &'static str {
        self.inner.backend_name()
    }

    pub async fn create_project(
        &self,
        project_ref: &str,
        network: Network,
    ) -> Result<Key, ProvisionError> {
        self.inner.create_project(project_ref, network).await
    }

    pub async fn generate(
        &self,
        project_ref: &str,
        network: Network,
    ) -> Result<Key, RemoteServiceError> {
        self.inner.generate(project_ref, network).await
    }

    pub async fn fetch(&self, project_ref: &str, network: Network) -> Result<String, FetchError> {
        self.inner.fetch(project_ref, network).await
    }

    pub async fn fetch_all(
        &self,
        project_ref: &str,
        network: Network,
    ) -> Result<Vec<String>, RemoteServiceError> {
        self.inner.fetch_all(project_ref, network).await
    }

    pub async fn invalidate(
        &self,
        project_ref: &str,
        network: Network,
    ) -> Result<(), RemoteServiceError> {
        self.inner.invalidate(project_ref, network).await
    }

    pub async fn rotate(
        &self,
        project_ref: &str,
        network: Network,
    ) -> Result<Key, RemoteServiceError> {
        self.inner.rotate(project_ref, network).await
    }
}

impl fmt::Debug for KeyLifecycleFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyLifecycleFacade")
            .field("backend", &self.backend_name())
            .finish()
    }
}
