pub mod queries;
pub mod rate_limit;

use crate::components::archive::enrich::{InlineImage, MediaSource};
use crate::components::archive::models::EventPhoto;
use crate::config::Config;
use crate::error::{transport_error, ArchiveResult, Error};
use async_trait::async_trait;
use rate_limit::RateGovernor;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

/// Timeout for individual image downloads
const IMAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Executes a single GraphQL request and surfaces top-level errors.
/// No knowledge of pagination; the engine drives repeated calls.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(&self, query: &str, variables: Value) -> ArchiveResult<Value>;
}

/// Production client for the GraphQL endpoint
pub struct GraphqlClient {
    http: Client,
    endpoint: Url,
    token: String,
    governor: Mutex<RateGovernor>,
}

impl GraphqlClient {
    /// Create a client from the loaded configuration
    pub fn new(config: &Config) -> ArchiveResult<Self> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| Error::Environment(format!("Invalid endpoint URL: {}", e)))?;

        Ok(Self {
            http: Client::new(),
            endpoint,
            token: config.api_token.clone(),
            governor: Mutex::new(RateGovernor::default()),
        })
    }

    /// Issue the trivial self-identity query to verify the token up front
    pub async fn probe_auth(&self) -> ArchiveResult<()> {
        self.execute(queries::SELF_QUERY, json!({})).await?;
        Ok(())
    }

    /// Inspect the envelope's top-level error list. A throttling error maps
    /// to `RateLimited`, anything else to `GraphQl` with the first message.
    fn classify_errors(errors: &[Value]) -> Error {
        for err in errors {
            let message = err
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown error");
            let code = err
                .get("extensions")
                .and_then(|e| e.get("code"))
                .and_then(|c| c.as_str())
                .unwrap_or("");

            if code == "RATE_LIMITED" || message.to_lowercase().contains("throttl") {
                let reset_hint = err
                    .get("extensions")
                    .and_then(|e| e.get("resetAt"))
                    .and_then(|r| r.as_str())
                    .map(|s| s.to_string());
                return Error::RateLimited(reset_hint);
            }
        }

        let first = errors
            .first()
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
            .unwrap_or("unknown error");
        Error::GraphQl(first.to_string())
    }
}

#[async_trait]
impl QueryExecutor for GraphqlClient {
    async fn execute(&self, query: &str, variables: Value) -> ArchiveResult<Value> {
        // Gate the call on the rolling request budget, then count it
        let mut governor = self.governor.lock().await;
        governor.check().await;

        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.token)
            .json(&json!({
                "query": query,
                "variables": variables,
            }))
            .send()
            .await
            .map_err(|e| transport_error(&format!("Request failed: {}", e)))?;

        governor.record_call();
        drop(governor);

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::AuthenticationFailed);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(transport_error(&format!("HTTP {} - {}", status, body)));
        }

        let envelope: Value = response
            .json()
            .await
            .map_err(|e| transport_error(&format!("Failed to parse response: {}", e)))?;

        if let Some(errors) = envelope.get("errors").and_then(|e| e.as_array()) {
            if !errors.is_empty() {
                return Err(Self::classify_errors(errors));
            }
        }

        Ok(envelope.get("data").cloned().unwrap_or(Value::Null))
    }
}

#[async_trait]
impl MediaSource for GraphqlClient {
    async fn fetch_image(&self, url: &str) -> ArchiveResult<InlineImage> {
        debug!(url, "Downloading image");
        let response = self
            .http
            .get(url)
            .timeout(IMAGE_TIMEOUT)
            .send()
            .await
            .map_err(|e| transport_error(&format!("Image download failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(transport_error(&format!(
                "Image download failed: HTTP {}",
                response.status()
            )));
        }

        let mime = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(&format!("Failed to read image body: {}", e)))?;

        Ok(InlineImage {
            mime,
            bytes: bytes.to_vec(),
        })
    }

    async fn fetch_album_photos(&self, event_id: &str, amount: u32) -> ArchiveResult<Vec<EventPhoto>> {
        let data = self
            .execute(
                queries::ALBUM_PHOTOS_QUERY,
                queries::album_photo_variables(event_id, amount),
            )
            .await?;

        let photos = data
            .get("event")
            .and_then(|e| e.get("photoAlbum"))
            .and_then(|a| a.get("photoSample"))
            .and_then(|s| s.as_array())
            .map(|sample| {
                sample
                    .iter()
                    .filter_map(|photo| {
                        let base_url = photo.get("baseUrl").and_then(|u| u.as_str())?;
                        Some(EventPhoto {
                            base_url: base_url.to_string(),
                            photo_id: photo
                                .get("id")
                                .and_then(|i| i.as_str())
                                .map(|s| s.to_string()),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(photos)
    }
}
