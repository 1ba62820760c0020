use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, warn};

use super::http_client::HttpClientTrait;
use super::network_store::NetworkCredentialStore;
use crate::domain::{
    FetchError, Key, KeyLifecycle, Network, ProvisionError, RemoteServiceError,
};

/// Key lifecycle client backed by the remote key-issuing service
#[derive(Debug)]
pub struct RemoteKeyLifecycleClient<C: HttpClientTrait> {
    client: C,
    networks: NetworkCredentialStore,
}

impl<C: HttpClientTrait> RemoteKeyLifecycleClient<C> {
    pub fn new(client: C, networks: NetworkCredentialStore) -> Self {
        Self { client, networks }
    }

    fn headers(&self, network: Network) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.networks.auth_header(network)),
            ("Accept", "application/json"),
        ]
    }

    async fn register_project(
        &self,
        project_ref: &str,
        network: Network,
    ) -> Result<(), RemoteServiceError> {
        let url = self.networks.endpoint(network, &["projects"])?;
        let body = json!({
            "project_ref": project_ref,
            "quota": self.networks.quota(network),
        });

        self.client
            .post_json(&url, self.headers(network), &body)
            .await?;

        Ok(())
    }

    async fn list_keys(
        &self,
        project_ref: &str,
        network: Network,
    ) -> Result<Vec<Key>, RemoteServiceError> {
        let url = self
            .networks
            .endpoint(network, &["projects", project_ref, "tokens"])?;
        let response = self.client.get_json(&url, self.headers(network)).await?;

        if !response.is_array() {
            return Err(RemoteServiceError::malformed(
                url,
                "expected a JSON array of keys",
            ));
        }

        serde_json::from_value(response).map_err(|e| {
            RemoteServiceError::malformed(url, format!("Failed to parse keys: {}", e))
        })
    }
}

#[async_trait]
impl<C: HttpClientTrait> KeyLifecycle for RemoteKeyLifecycleClient<C> {
    async fn create_project(
        &self,
        project_ref: &str,
        network: Network,
    ) -> Result<Key, ProvisionError> {
        self.register_project(project_ref, network)
            .await
            .map_err(|e| ProvisionError::project_creation(project_ref, network, e))?;

        info!(project_ref, %network, "Project created");

        self.generate(project_ref, network)
            .await
            .map_err(|e| ProvisionError::initial_token(project_ref, network, e))
    }

    async fn generate(
        &self,
        project_ref: &str,
        network: Network,
    ) -> Result<Key, RemoteServiceError> {
        let url = self.networks.endpoint(network, &["token", "generate"])?;
        let body = json!({
            "project_ref": project_ref,
            "quota": self.networks.quota(network),
        });

        let response = self
            .client
            .post_json(&url, self.headers(network), &body)
            .await?;

        let key: Key = serde_json::from_value(response).map_err(|e| {
            RemoteServiceError::malformed(url, format!("Failed to parse key: {}", e))
        })?;

        info!(project_ref, %network, quota = key.quota, "Key generated");
        Ok(key)
    }

    async fn fetch(&self, project_ref: &str, network: Network) -> Result<String, FetchError> {
        let keys = self.list_keys(project_ref, network).await?;

        keys.iter()
            .find(|key| key.is_valid())
            .map(|key| key.token.clone())
            .ok_or_else(|| FetchError::NoValidKey {
                project_ref: project_ref.to_string(),
                network,
                total: keys.len(),
            })
    }

    async fn fetch_all(
        &self,
        project_ref: &str,
        network: Network,
    ) -> Result<Vec<String>, RemoteServiceError> {
        let keys = self.list_keys(project_ref, network).await?;
        Ok(keys.into_iter().map(|key| key.token).collect())
    }

    async fn invalidate(
        &self,
        project_ref: &str,
        network: Network,
    ) -> Result<(), RemoteServiceError> {
        let token = match self.fetch(project_ref, network).await {
            Ok(token) => token,
            Err(FetchError::NoValidKey { total, .. }) => {
                debug!(project_ref, %network, total, "No valid key to invalidate");
                return Ok(());
            }
            Err(FetchError::Remote(e)) => return Err(e),
        };

        let url = self.networks.endpoint(network, &["token", "invalidate"])?;
        self.client
            .post_json(&url, self.headers(network), &json!({ "token": token }))
            .await?;

        info!(project_ref, %network, "Key invalidated");
        Ok(())
    }

    async fn rotate(
        &self,
        project_ref: &str,
        network: Network,
    ) -> Result<Key, RemoteServiceError> {
        self.invalidate(project_ref, network).await?;

        // No rollback: the old key is already revoked
        self.generate(project_ref, network).await.inspect_err(|e| {
            warn!(
                project_ref,
                %network,
                error = %e,
                "Rotation left project without a valid key"
            );
        })
    }

    fn backend_name(&self) -> &'static str {
        "remote"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NetworkContext;
    use crate::infrastructure::key_service::http_client::mock::{Endpoint, InMemoryKeyService};
    use crate::infrastructure::key_service::http_client::HttpClient;
    use serde_json::json;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const NET_A_HOST: &str = "keys.net-a.test";
    const NET_B_HOST: &str = "keys.net-b.test";

    fn networks() -> NetworkCredentialStore {
        NetworkCredentialStore::new(
            NetworkContext::new(format!("http://{}", NET_A_HOST), "token-a", 100_000),
            NetworkContext::new(format!("http://{}", NET_B_HOST), "token-b", 10_000),
        )
    }

    fn client_with(
        service: InMemoryKeyService,
    ) -> (
        Arc<InMemoryKeyService>,
        RemoteKeyLifecycleClient<Arc<InMemoryKeyService>>,
    ) {
        let service = Arc::new(service);
        let client = RemoteKeyLifecycleClient::new(service.clone(), networks());
        (service, client)
    }

    #[tokio::test]
    async fn test_provision_fetch_rotate_scenario() {
        let (service, client) = client_with(InMemoryKeyService::new());

        let key = client.create_project("proj-1", Network::NetA).await.unwrap();
        assert!(key.is_valid());
        assert_eq!(key.quota, 100_000);
        assert!(service.has_project(NET_A_HOST, "proj-1"));

        let token = client.fetch("proj-1", Network::NetA).await.unwrap();
        assert_eq!(token, key.token);

        let rotated = client.rotate("proj-1", Network::NetA).await.unwrap();
        assert_ne!(rotated.token, key.token);
        assert_eq!(client.fetch("proj-1", Network::NetA).await.unwrap(), rotated.token);

        let tokens = client.fetch_all("proj-1", Network::NetA).await.unwrap();
        assert_eq!(tokens.len(), 2);
        assert!(tokens.contains(&key.token));

        let keys = service.keys(NET_A_HOST, "proj-1");
        assert_eq!(keys.iter().filter(|k| k.is_valid()).count(), 1);
        let old = keys.iter().find(|k| k.token == key.token).unwrap();
        assert!(old.invalid);
        assert!(old.invalidated_at.is_some());
    }

    #[tokio::test]
    async fn test_fetch_returns_generated_token() {
        let (_, client) = client_with(InMemoryKeyService::new());

        let key = client.generate("proj-1", Network::NetB).await.unwrap();

        assert_eq!(client.fetch("proj-1", Network::NetB).await.unwrap(), key.token);
    }

    #[tokio::test]
    async fn test_fetch_without_keys_reports_zero() {
        let (_, client) = client_with(InMemoryKeyService::new());

        let err = client.fetch("proj-1", Network::NetA).await.unwrap_err();

        match err {
            FetchError::NoValidKey {
                project_ref,
                network,
                total,
            } => {
                assert_eq!(project_ref, "proj-1");
                assert_eq!(network, Network::NetA);
                assert_eq!(total, 0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_list_response() {
        let (_, client) = client_with(
            InMemoryKeyService::new().with_tokens_response(json!({"tokens": []})),
        );

        let err = client.fetch("proj-1", Network::NetA).await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::Remote(RemoteServiceError::MalformedResponse { .. })
        ));

        let err = client.fetch_all("proj-1", Network::NetA).await.unwrap_err();
        assert!(matches!(err, RemoteServiceError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_fetch_all_includes_invalid_tokens() {
        let (_, client) = client_with(InMemoryKeyService::new());

        let first = client.generate("proj-1", Network::NetA).await.unwrap();
        client.invalidate("proj-1", Network::NetA).await.unwrap();

        let tokens = client.fetch_all("proj-1", Network::NetA).await.unwrap();
        assert_eq!(tokens, vec![first.token]);
    }

    #[tokio::test]
    async fn test_invalidate_twice_is_idempotent() {
        let (service, client) = client_with(InMemoryKeyService::new());
        client.create_project("proj-1", Network::NetA).await.unwrap();

        client.invalidate("proj-1", Network::NetA).await.unwrap();
        client.invalidate("proj-1", Network::NetA).await.unwrap();

        assert_eq!(service.count(Endpoint::Invalidate), 1);
        let err = client.fetch("proj-1", Network::NetA).await.unwrap_err();
        assert!(matches!(err, FetchError::NoValidKey { total: 1, .. }));
    }

    #[tokio::test]
    async fn test_invalidate_propagates_listing_failure() {
        let (service, client) =
            client_with(InMemoryKeyService::new().with_failure(Endpoint::ListTokens));

        let err = client.invalidate("proj-1", Network::NetA).await.unwrap_err();

        assert!(matches!(err, RemoteServiceError::Status { status: 500, .. }));
        assert_eq!(service.count(Endpoint::Invalidate), 0);
    }

    #[tokio::test]
    async fn test_invalidate_propagates_revocation_failure() {
        let (service, client) = client_with(InMemoryKeyService::new());
        client.generate("proj-1", Network::NetA).await.unwrap();
        service.fail(Endpoint::Invalidate);

        let err = client.invalidate("proj-1", Network::NetA).await.unwrap_err();
        assert!(err.url().ends_with("/token/invalidate"));
    }

    #[tokio::test]
    async fn test_create_failure_never_generates() {
        let (service, client) =
            client_with(InMemoryKeyService::new().with_failure(Endpoint::CreateProject));

        let err = client.create_project("proj-1", Network::NetA).await.unwrap_err();

        assert!(matches!(err, ProvisionError::ProjectCreation { .. }));
        assert!(!err.project_created());
        assert_eq!(service.count(Endpoint::Generate), 0);
    }

    #[tokio::test]
    async fn test_generate_failure_after_create_is_distinct() {
        let (service, client) =
            client_with(InMemoryKeyService::new().with_failure(Endpoint::Generate));

        let err = client.create_project("proj-1", Network::NetA).await.unwrap_err();

        assert!(matches!(err, ProvisionError::InitialToken { .. }));
        assert!(err.project_created());
        assert!(service.has_project(NET_A_HOST, "proj-1"));
        assert!(err.remote_cause().url().ends_with("/token/generate"));
    }

    #[tokio::test]
    async fn test_rotate_stops_when_invalidate_fails() {
        let (service, client) = client_with(InMemoryKeyService::new());
        client.generate("proj-1", Network::NetA).await.unwrap();
        service.fail(Endpoint::Invalidate);

        assert!(client.rotate("proj-1", Network::NetA).await.is_err());

        assert_eq!(service.count(Endpoint::Generate), 1);
        assert_eq!(service.keys(NET_A_HOST, "proj-1").len(), 1);
    }

    #[tokio::test]
    async fn test_rotate_generate_failure_leaves_no_valid_key() {
        let (service, client) = client_with(InMemoryKeyService::new());
        client.generate("proj-1", Network::NetA).await.unwrap();
        service.fail(Endpoint::Generate);

        assert!(client.rotate("proj-1", Network::NetA).await.is_err());

        service.recover(Endpoint::Generate);
        let err = client.fetch("proj-1", Network::NetA).await.unwrap_err();
        assert!(err.is_no_valid_key());
    }

    #[tokio::test]
    async fn test_rotate_invalidates_before_generating() {
        let (service, client) = client_with(InMemoryKeyService::new());
        client.generate("proj-1", Network::NetA).await.unwrap();

        client.rotate("proj-1", Network::NetA).await.unwrap();

        let sequence: Vec<Endpoint> = service
            .requests()
            .into_iter()
            .map(|r| r.endpoint)
            .skip(1)
            .collect();
        assert_eq!(
            sequence,
            vec![Endpoint::ListTokens, Endpoint::Invalidate, Endpoint::Generate]
        );
    }

    #[tokio::test]
    async fn test_rotation_tokens_are_unique() {
        let (_, client) = client_with(InMemoryKeyService::new());
        client.create_project("proj-1", Network::NetA).await.unwrap();

        let mut seen = HashSet::new();
        for _ in 0..5 {
            let before = client.fetch("proj-1", Network::NetA).await.unwrap();
            let key = client.rotate("proj-1", Network::NetA).await.unwrap();
            assert_ne!(before, key.token);
            assert!(seen.insert(key.token));
        }
    }

    #[tokio::test]
    async fn test_networks_use_their_own_settings() {
        let (service, client) = client_with(InMemoryKeyService::new());

        let key = client.create_project("proj-1", Network::NetB).await.unwrap();
        assert_eq!(key.quota, 10_000);

        for request in service.requests() {
            assert_eq!(request.host, NET_B_HOST);
            assert_eq!(request.authorization.as_deref(), Some("Bearer token-b"));
            assert_eq!(request.body.unwrap()["quota"], 10_000);
        }
        assert!(service.keys(NET_A_HOST, "proj-1").is_empty());
        assert!(client.fetch("proj-1", Network::NetA).await.unwrap_err().is_no_valid_key());
    }

    #[tokio::test]
    async fn test_create_project_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/projects"))
            .and(header("Authorization", "Bearer token-a"))
            .and(body_json(json!({"project_ref": "proj-1", "quota": 100_000})))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/token/generate"))
            .and(header("Authorization", "Bearer token-a"))
            .and(body_json(json!({"project_ref": "proj-1", "quota": 100_000})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "project_ref": "proj-1",
                "invalid": false,
                "created_at": "2024-03-01T10:00:00Z",
                "invalidated_at": null,
                "token": "tok-1",
                "quota": 100_000
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = RemoteKeyLifecycleClient::new(
            HttpClient::with_timeout(Duration::from_secs(5)).unwrap(),
            NetworkCredentialStore::new(
                NetworkContext::new(server.uri(), "token-a", 100_000),
                NetworkContext::new("http://unused.test", "token-b", 10_000),
            ),
        );

        let key = client.create_project("proj-1", Network::NetA).await.unwrap();
        assert_eq!(key.token, "tok-1");
        assert_eq!(key.quota, 100_000);
    }

    #[tokio::test]
    async fn test_invalidate_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/proj-1/tokens"))
            .and(header("Authorization", "Bearer token-b"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "project_ref": "proj-1",
                    "invalid": true,
                    "created_at": "2024-03-01T10:00:00Z",
                    "invalidated_at": "2024-03-02T10:00:00Z",
                    "token": "tok-old",
                    "quota": 10_000
                },
                {
                    "project_ref": "proj-1",
                    "invalid": false,
                    "created_at": "2024-03-02T10:00:00Z",
                    "invalidated_at": null,
                    "token": "tok-new",
                    "quota": 10_000
                }
            ])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/token/invalidate"))
            .and(body_json(json!({"token": "tok-new"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = RemoteKeyLifecycleClient::new(
            HttpClient::with_timeout(Duration::from_secs(5)).unwrap(),
            NetworkCredentialStore::new(
                NetworkContext::new("http://unused.test", "token-a", 100_000),
                NetworkContext::new(server.uri(), "token-b", 10_000),
            ),
        );

        client.invalidate("proj-1", Network::NetB).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_failure_over_http_skips_generate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/projects"))
            .respond_with(ResponseTemplate::new(409).set_body_string("exists"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/token/generate"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = RemoteKeyLifecycleClient::new(
            HttpClient::with_timeout(Duration::from_secs(5)).unwrap(),
            NetworkCredentialStore::new(
                NetworkContext::new(server.uri(), "token-a", 100_000),
                NetworkContext::new("http://unused.test", "token-b", 10_000),
            ),
        );

        let err = client.create_project("proj-1", Network::NetA).await.unwrap_err();
        match err.remote_cause() {
            RemoteServiceError::Status { status, body, .. } => {
                assert_eq!(*status, 409);
                assert_eq!(body, "exists");
            }
            other => panic!("unexpected cause: {other:?}"),
        }
    }
}
