//! HTTP layer: auth header, per-call timeout, status mapping.
//!
//! This is the ONLY place for status code handling. client/mod.rs never
//! interprets status codes. Nothing here retries.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{XrayError, XrayResult};

use super::helpers::truncate_chars;

/// Characters of an error body kept in [`XrayError::Http`].
const MAX_ERROR_BODY_CHARS: usize = 500;

/// HTTP backend (holds reqwest client, base URL and token).
#[derive(Debug, Clone)]
pub(crate) struct HttpBackend {
    pub(crate) client: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) token: String,
}

impl HttpBackend {
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
        timeout: Duration,
    ) -> XrayResult<T> {
        let url = self.url(endpoint);
        let request = self
            .client
            .request(Method::GET, &url)
            .query(query)
            .timeout(timeout);
        let response = self.send(request, &url).await?;

        response
            .json()
            .await
            .map_err(|e| XrayError::InvalidResponse {
                message: format!("failed to parse response from {}: {}", endpoint, e),
            })
    }

    /// POST a JSON body. An empty response body yields `Value::Null`.
    pub(crate) async fn post_json<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
        timeout: Duration,
    ) -> XrayResult<serde_json::Value> {
        let url = self.url(endpoint);
        let request = self
            .client
            .request(Method::POST, &url)
            .json(body)
            .timeout(timeout);
        let response = self.send(request, &url).await?;

        let bytes = response.bytes().await.map_err(|e| XrayError::Network {
            message: format!("failed to read response body: {}", e),
        })?;
        if bytes.is_empty() {
            return Ok(serde_json::Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(|e| XrayError::InvalidResponse {
            message: format!("failed to parse response from {}: {}", endpoint, e),
        })
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> XrayResult<reqwest::Response> {
        let response = request
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .send()
            .await?;
        let status = response.status();
        debug!(url, status = status.as_u16(), "xray response");

        match status {
            s if s.is_success() => Ok(response),

            StatusCode::UNAUTHORIZED => Err(XrayError::Unauthorized {
                message: "invalid or expired token".to_string(),
            }),

            StatusCode::NOT_FOUND => Err(XrayError::NotFound {
                url: url.to_string(),
            }),

            _ => {
                let body = response.text().await.unwrap_or_default();
                let message = if body.trim().is_empty() {
                    status.to_string()
                } else {
                    truncate_chars(body.trim(), MAX_ERROR_BODY_CHARS).to_string()
                };
                Err(XrayError::Http {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}
