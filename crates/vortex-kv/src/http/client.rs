//! HTTP key-value store implementation.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};
use vortex_core::{KvError, RawValue, Result, value};

use super::config::HttpStoreConfig;
use super::interceptor::{HeaderInterceptor, Interceptor};
use crate::store::KvStore;

/// A `KvStore` speaking a Consul-style KV HTTP API.
///
/// - `GET {base}/{key}` returns the value body or 404
/// - `GET {base}/?keys` returns the JSON array of keys
/// - `PUT {base}/{key}` stores the body and answers `true` or `false`
pub struct HttpKvStore {
    client: Client,
    config: HttpStoreConfig,
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl HttpKvStore {
    /// Creates a new HTTP store.
    ///
    /// If the configuration carries a token, a `X-Consul-Token` interceptor is
    /// registered first.
    pub fn new(config: HttpStoreConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| KvError::invalid_config(format!("failed to build HTTP client: {e}")))?;

        let mut interceptors: Vec<Arc<dyn Interceptor>> = Vec::new();
        if let Some(token) = config.token() {
            interceptors.push(Arc::new(HeaderInterceptor::consul_token(token)?));
        }

        Ok(Self {
            client,
            config,
            interceptors,
        })
    }

    /// Registers an interceptor, applied after the ones already registered.
    pub fn with_interceptor(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &HttpStoreConfig {
        &self.config
    }

    /// Runs the request through the interceptor chain and sends it.
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let request = self
            .interceptors
            .iter()
            .fold(request, |request, interceptor| interceptor.on_request(request));

        let response = request
            .send()
            .await
            .map_err(|e| KvError::transport(e.to_string(), e.status().map(|s| s.as_u16())))?;

        for interceptor in &self.interceptors {
            interceptor.on_response(&response);
        }

        Ok(response)
    }
}

fn unexpected_status(status: StatusCode) -> KvError {
    KvError::transport(
        format!("unexpected response status {status}"),
        Some(status.as_u16()),
    )
}

fn body_error(e: reqwest::Error) -> KvError {
    KvError::transport(format!("failed to read response body: {e}"), None)
}

#[async_trait]
impl KvStore for HttpKvStore {
    async fn get_value(&self, key: &str) -> Result<RawValue> {
        let url = self.config.key_url(key);
        debug!(key = %key, url = %url, "GET value");

        let response = self.send(self.client.get(&url)).await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(KvError::not_found(key)),
            status if status.is_success() => {
                let body = response.bytes().await.map_err(body_error)?;
                value::from_slice(key, &body)
            },
            status => Err(unexpected_status(status)),
        }
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        let url = self.config.keys_url();
        debug!(url = %url, "GET keys");

        let response = self.send(self.client.get(&url)).await?;
        match response.status() {
            // El store responde 404 cuando no hay ninguna key.
            StatusCode::NOT_FOUND => Ok(Vec::new()),
            status if status.is_success() => {
                let body = response.bytes().await.map_err(body_error)?;
                serde_json::from_slice(&body)
                    .map_err(|e| KvError::decode("?keys", e.to_string()))
            },
            status => Err(unexpected_status(status)),
        }
    }

    async fn put_value(&self, key: &str, value: &RawValue) -> Result<()> {
        let url = self.config.key_url(key);
        let body = serde_json::to_vec(value).map_err(|e| KvError::write_failure(key, e.to_string()))?;
        debug!(key = %key, url = %url, bytes = body.len(), "PUT value");

        let response = self
            .send(self.client.put(&url).body(body))
            .await
            .map_err(|e| e.into_write_failure(key))?;

        let status = response.status();
        if !status.is_success() {
            warn!(key = %key, status = %status, "Store rejected write");
            return Err(KvError::write_failure(
                key,
                format!("store answered with status {status}"),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| body_error(e).into_write_failure(key))?;

        match serde_json::from_slice::<bool>(&body) {
            Ok(true) => Ok(()),
            Ok(false) => Err(KvError::write_failure(key, "store returned false")),
            Err(e) => Err(KvError::write_failure(
                key,
                format!("unexpected write acknowledgement: {e}"),
            )),
        }
    }

    fn name(&self) -> &str {
        "http"
    }
}

impl std::fmt::Debug for HttpKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpKvStore")
            .field("base_url", &self.config.base_url())
            .field("timeout", &self.config.timeout())
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_registers_interceptor() {
        let config = HttpStoreConfig::builder()
            .base_url("http://localhost:8500/v1/kv")
            .token("secret")
            .build()
            .unwrap();

        let store = HttpKvStore::new(config).unwrap();
        assert_eq!(store.interceptors.len(), 1);
        assert_eq!(store.name(), "http");
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let config = HttpStoreConfig::builder()
            .base_url("http://localhost:8500/v1/kv")
            .token("secret")
            .build()
            .unwrap();

        let store = HttpKvStore::new(config).unwrap();
        let debug = format!("{:?}", store);

        assert!(debug.contains("localhost:8500"));
        assert!(!debug.contains("secret"));
    }
}
