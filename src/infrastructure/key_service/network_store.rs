use crate::domain::{Network, NetworkContext, RemoteServiceError};

#[derive(Clone)]
struct NetworkSlot {
    context: NetworkContext,
    auth_header: String,
}

impl NetworkSlot {
    fn new(context: NetworkContext) -> Self {
        let auth_header = format!("Bearer {}", context.bearer_token);
        Self {
            context,
            auth_header,
        }
    }
}

/// Per-network key service settings, one isolated slot per network
#[derive(Clone)]
pub struct NetworkCredentialStore {
    net_a: NetworkSlot,
    net_b: NetworkSlot,
}

impl NetworkCredentialStore {
    pub fn new(net_a: NetworkContext, net_b: NetworkContext) -> Self {
        Self {
            net_a: NetworkSlot::new(net_a),
            net_b: NetworkSlot::new(net_b),
        }
    }

    fn slot(&self, network: Network) -> &NetworkSlot {
        match network {
            Network::NetA => &self.net_a,
            Network::NetB => &self.net_b,
        }
    }

    pub fn context(&self, network: Network) -> &NetworkContext {
        &self.slot(network).context
    }

    pub fn quota(&self, network: Network) -> u64 {
        self.slot(network).context.quota
    }

    /// `Authorization` header value for the network's service credential
    pub fn auth_header(&self, network: Network) -> &str {
        &self.slot(network).auth_header
    }

    /// Join path segments onto the network's base URL. Segments are
    /// percent-encoded, so a project ref always stays one segment.
    pub fn endpoint(
        &self,
        network: Network,
        segments: &[&str],
    ) -> Result<String, RemoteServiceError> {
        let base_url = &self.context(network).base_url;
        let mut url = reqwest::Url::parse(base_url)
            .map_err(|e| RemoteServiceError::transport(base_url.as_str(), e))?;

        url.path_segments_mut()
            .map_err(|_| {
                RemoteServiceError::transport(base_url.as_str(), "base URL cannot carry a path")
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url.into())
    }
}

impl std::fmt::Debug for NetworkCredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkCredentialStore")
            .field("net_a", &self.net_a.context)
            .field("net_b", &self.net_b.context)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> NetworkCredentialStore {
        NetworkCredentialStore::new(
            NetworkContext::new("https://keys.net-a.test", "token-a", 100_000),
            NetworkContext::new("https://keys.net-b.test/api/v1/", "token-b", 10_000),
        )
    }

    #[test]
    fn test_networks_are_isolated() {
        let store = store();

        assert_eq!(store.quota(Network::NetA), 100_000);
        assert_eq!(store.quota(Network::NetB), 10_000);
        assert_eq!(store.auth_header(Network::NetA), "Bearer token-a");
        assert_eq!(store.auth_header(Network::NetB), "Bearer token-b");
        assert_eq!(
            store.context(Network::NetB).base_url,
            "https://keys.net-b.test/api/v1/"
        );
    }

    #[test]
    fn test_debug_hides_credentials() {
        let rendered = format!("{:?}", store());

        assert!(!rendered.contains("token-a"));
        assert!(!rendered.contains("token-b"));
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let store = store();

        assert_eq!(
            store.endpoint(Network::NetA, &["token", "generate"]).unwrap(),
            "https://keys.net-a.test/token/generate"
        );
        assert_eq!(
            store
                .endpoint(Network::NetB, &["projects", "proj-1", "tokens"])
                .unwrap(),
            "https://keys.net-b.test/api/v1/projects/proj-1/tokens"
        );
    }

    #[test]
    fn test_endpoint_encodes_project_ref() {
        let store = store();

        assert_eq!(
            store
                .endpoint(Network::NetA, &["projects", "team a/1", "tokens"])
                .unwrap(),
            "https://keys.net-a.test/projects/team%20a%2F1/tokens"
        );
    }

    #[test]
    fn test_endpoint_rejects_unparseable_base() {
        let store = NetworkCredentialStore::new(
            NetworkContext::new("not a url", "token-a", 1),
            NetworkContext::new("mailto:ops@example.com", "token-b", 1),
        );

        assert!(matches!(
            store.endpoint(Network::NetA, &["projects"]),
            Err(RemoteServiceError::Transport { .. })
        ));
        assert!(matches!(
            store.endpoint(Network::NetB, &["projects"]),
            Err(RemoteServiceError::Transport { .. })
        ));
    }
}
