//! REST resource store implementation
//!
//! This module implements [`ResourceStore`] against a JSON REST backend:
//! `GET /{resource}`, `GET /{resource}/{id}`, `POST /{resource}`,
//! `PATCH /{resource}/{id}`. List filters are sent as query parameters.
//!
//! Conditional updates (`patch_if`) send the precondition object in an
//! `X-Precondition` header; a compliant backend evaluates it atomically with
//! the write and answers `412 Precondition Failed` when the precondition no
//! longer holds.

use super::traits::{Filter, ResourceStore};
use crate::config::StoreConfig;
use crate::domain::{Result, StoreError};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::time::Duration;

/// Resource store backed by a JSON REST API
pub struct RestStore {
    /// Base URL of the backend
    base_url: String,

    /// HTTP client for making requests
    client: Client,

    /// Optional API key sent as X-Api-Key
    api_key: Option<String>,
}

impl RestStore {
    /// Create a new REST store from configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Store configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .connect_timeout(Duration::from_secs(30));

        if !config.tls_verify {
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder
            .build()
            .map_err(|e| StoreError::ConnectionFailed(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            api_key: config
                .api_key
                .as_ref()
                .map(|key| key.expose_secret().to_string()),
        })
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header("X-Api-Key", key),
            None => builder,
        }
    }

    /// Render a filter value as a query parameter string
    ///
    /// Strings go through bare (no JSON quoting); everything else uses its
    /// JSON rendering.
    fn query_value(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    async fn check_status(resource: &str, id: &str, resp: reqwest::Response) -> Result<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let message = resp.text().await.unwrap_or_default();
        let err = match status {
            StatusCode::NOT_FOUND => StoreError::NotFound {
                resource: resource.to_string(),
                id: id.to_string(),
            },
            s if s.is_server_error() => StoreError::ServerError {
                status: s.as_u16(),
                message,
            },
            s => StoreError::ClientError {
                status: s.as_u16(),
                message,
            },
        };
        Err(err.into())
    }

    fn connection_error(e: reqwest::Error) -> StoreError {
        if e.is_timeout() {
            StoreError::Timeout(e.to_string())
        } else {
            StoreError::ConnectionFailed(e.to_string())
        }
    }

    async fn parse_json(resp: reqwest::Response) -> Result<Value> {
        resp.json::<Value>()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()).into())
    }
}

#[async_trait]
impl ResourceStore for RestStore {
    async fn list(&self, resource: &str, filter: &Filter) -> Result<Vec<Value>> {
        let url = format!("{}/{}", self.base_url, resource);
        let params: Vec<(String, String)> = filter
            .pairs()
            .iter()
            .map(|(field, value)| (field.clone(), Self::query_value(value)))
            .collect();

        let resp = self
            .request(self.client.get(&url).query(&params))
            .send()
            .await
            .map_err(Self::connection_error)?;
        let resp = Self::check_status(resource, "", resp).await?;

        let body = Self::parse_json(resp).await?;
        match body {
            Value::Array(entities) => Ok(entities),
            other => Err(StoreError::InvalidResponse(format!(
                "Expected a JSON array listing {resource}, got: {other}"
            ))
            .into()),
        }
    }

    async fn get(&self, resource: &str, id: &str) -> Result<Value> {
        let url = format!("{}/{}/{}", self.base_url, resource, id);
        let resp = self
            .request(self.client.get(&url))
            .send()
            .await
            .map_err(Self::connection_error)?;
        let resp = Self::check_status(resource, id, resp).await?;
        Self::parse_json(resp).await
    }

    async fn create(&self, resource: &str, body: Value) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, resource);
        let resp = self
            .request(self.client.post(&url).json(&body))
            .send()
            .await
            .map_err(Self::connection_error)?;
        let resp = Self::check_status(resource, "", resp).await?;
        Self::parse_json(resp).await
    }

    async fn patch(&self, resource: &str, id: &str, partial: Value) -> Result<Value> {
        let url = format!("{}/{}/{}", self.base_url, resource, id);
        let resp = self
            .request(self.client.patch(&url).json(&partial))
            .send()
            .await
            .map_err(Self::connection_error)?;
        let resp = Self::check_status(resource, id, resp).await?;
        Self::parse_json(resp).await
    }

    async fn patch_if(
        &self,
        resource: &str,
        id: &str,
        expected: Value,
        partial: Value,
    ) -> Result<Option<Value>> {
        let url = format!("{}/{}/{}", self.base_url, resource, id);
        let resp = self
            .request(
                self.client
                    .patch(&url)
                    .header("X-Precondition", expected.to_string())
                    .json(&partial),
            )
            .send()
            .await
            .map_err(Self::connection_error)?;

        // 412 means the precondition no longer held: the caller lost the race
        if resp.status() == StatusCode::PRECONDITION_FAILED {
            return Ok(None);
        }

        let resp = Self::check_status(resource, id, resp).await?;
        Ok(Some(Self::parse_json(resp).await?))
    }

    async fn health_check(&self) -> Result<()> {
        // Listing patients doubles as a reachability and auth probe
        match self.list("patients", &Filter::new()).await {
            Ok(_) => {
                tracing::info!(base_url = %self.base_url, "Store health check passed");
                Ok(())
            }
            Err(e) => {
                tracing::error!(base_url = %self.base_url, error = %e, "Store health check failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use serde_json::json;

    fn store_for(url: &str) -> RestStore {
        let config = StoreConfig {
            base_url: url.to_string(),
            ..Default::default()
        };
        RestStore::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_list_with_filter_builds_query_params() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/glycemiaReadings")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("patientId".into(), "p-1".into()),
                mockito::Matcher::UrlEncoded("read".into(), "false".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": "r-1", "patientId": "p-1"}]"#)
            .create_async()
            .await;

        let store = store_for(&server.url());
        let filter = Filter::new()
            .eq("patientId", json!("p-1"))
            .eq("read", json!(false));
        let results = store.list("glycemiaReadings", &filter).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["id"], "r-1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_maps_404_to_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/patients/missing")
            .with_status(404)
            .create_async()
            .await;

        let store = store_for(&server.url());
        let err = store.get("patients", "missing").await.unwrap_err();
        assert!(err.to_string().contains("patients/missing"));
    }

    #[tokio::test]
    async fn test_create_posts_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/patients")
            .match_body(mockito::Matcher::PartialJson(
                json!({"monitoringMode": "strict"}),
            ))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": "p-9", "monitoringMode": "strict"}"#)
            .create_async()
            .await;

        let store = store_for(&server.url());
        let created = store
            .create("patients", json!({"monitoringMode": "strict"}))
            .await
            .unwrap();

        assert_eq!(created["id"], "p-9");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_patch_if_precondition_failed_returns_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PATCH", "/trackingCodes/tc-1")
            .with_status(412)
            .create_async()
            .await;

        let store = store_for(&server.url());
        let result = store
            .patch_if(
                "trackingCodes",
                "tc-1",
                json!({"isActive": true}),
                json!({"isActive": false}),
            )
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_patch_if_sends_precondition_header() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PATCH", "/doctors/d-1")
            .match_header("x-precondition", r#"{"mfaCode":"123456"}"#)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": "d-1"}"#)
            .create_async()
            .await;

        let store = store_for(&server.url());
        let result = store
            .patch_if(
                "doctors",
                "d-1",
                json!({"mfaCode": "123456"}),
                json!({"mfaCode": null}),
            )
            .await
            .unwrap();

        assert!(result.is_some());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_api_key_header_sent_when_configured() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/patients")
            .match_header("x-api-key", "sekret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let config = StoreConfig {
            base_url: server.url(),
            api_key: Some(secret_string("sekret".to_string())),
            ..Default::default()
        };
        let store = RestStore::new(&config).unwrap();
        store.list("patients", &Filter::new()).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_surfaces_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/patients/p-1")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let store = store_for(&server.url());
        let err = store.get("patients", "p-1").await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }
}
