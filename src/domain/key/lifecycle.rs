use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::{Key, Network};
use crate::domain::error::{FetchError, ProvisionError, RemoteServiceError};

/// Key lifecycle operations against the key-issuing service.
///
/// Implementations are stateless clients: the remote service is the system
/// of record for keys. Calls for different projects or networks are
/// independent; calls for the same pair are not coordinated here.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait KeyLifecycle: Send + Sync {
    /// Register a project and issue its first key
    async fn create_project(
        &self,
        project_ref: &str,
        network: Network,
    ) -> Result<Key, ProvisionError>;

    /// Issue a new key for the project
    async fn generate(
        &self,
        project_ref: &str,
        network: Network,
    ) -> Result<Key, RemoteServiceError>;

    /// Token of the project's current valid key
    async fn fetch(&self, project_ref: &str, network: Network) -> Result<String, FetchError>;

    /// Every token of the project, valid or not
    async fn fetch_all(
        &self,
        project_ref: &str,
        network: Network,
    ) -> Result<Vec<String>, RemoteServiceError>;

    /// Revoke the current key. A project without a valid key is left as is.
    async fn invalidate(
        &self,
        project_ref: &str,
        network: Network,
    ) -> Result<(), RemoteServiceError>;

    /// Invalidate the current key, then issue a new one
    async fn rotate(
        &self,
        project_ref: &str,
        network: Network,
    ) -> Result<Key, RemoteServiceError>;

    /// Backend name for logging/debugging
    fn backend_name(&self) -> &'static str;
}
