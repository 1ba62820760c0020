use async_trait::async_trait;
use std::time::Duration;

use crate::domain::RemoteServiceError;

/// Trait for HTTP client operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn get_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
    ) -> Result<serde_json::Value, RemoteServiceError>;

    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, RemoteServiceError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Every request is bounded by `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }

    async fn execute(
        &self,
        url: &str,
        mut request: reqwest::RequestBuilder,
        headers: Vec<(&str, &str)>,
    ) -> Result<serde_json::Value, RemoteServiceError> {
        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RemoteServiceError::transport(url, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RemoteServiceError::transport(url, e))?;

        if !status.is_success() {
            return Err(RemoteServiceError::status(url, status.as_u16(), body));
        }

        // Creation and invalidation answer without a body
        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| {
            RemoteServiceError::malformed(url, format!("Failed to parse response: {}", e))
        })
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn get_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
    ) -> Result<serde_json::Value, RemoteServiceError> {
        self.execute(url, self.client.get(url), headers).await
    }

    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, RemoteServiceError> {
        self.execute(url, self.client.post(url).json(body), headers)
            .await
    }
}

#[async_trait]
impl<T: HttpClientTrait + ?Sized> HttpClientTrait for std::sync::Arc<T> {
    async fn get_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
    ) -> Result<serde_json::Value, RemoteServiceError> {
        (**self).get_json(url, headers).await
    }

    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, RemoteServiceError> {
        (**self).post_json(url, headers, body).await
    }
}
