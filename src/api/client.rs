//! HTTP client for backend API requests.
//!
//! This module provides a low-level HTTP client wrapper for making requests
//! to the messaging backend, handling authentication, JSON bodies, multipart
//! uploads, and error-response parsing.

use super::error::ApiError;
use log::*;
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Shape of the backend's error body on non-2xx responses.
///
#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Makes requests to the backend and tries to conform response data to the
/// explicitly-defined resource types.
///
#[derive(Clone)]
pub struct Client {
    pub(crate) api_token: Option<String>,
    pub(crate) base_url: String,
    pub(crate) http_client: reqwest::Client,
}

impl Client {
    /// Returns a new instance for the given base URL and optional bearer token.
    ///
    /// # Panics
    /// Panics if the HTTP client cannot be created. This should never happen
    /// in practice as reqwest::Client::builder().build() only fails on
    /// invalid configuration, which we don't use.
    pub fn new(base_url: &str, api_token: Option<&str>) -> Self {
        Client {
            api_token: api_token.map(str::to_owned),
            base_url: base_url.trim_end_matches('/').to_owned(),
            http_client: reqwest::Client::builder()
                .build()
                .expect("Failed to create HTTP client - this should never happen"),
        }
    }

    /// GET the given path and deserialize the JSON response.
    ///
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.call(Method::GET, path, None).await?;
        Self::decode(response).await
    }

    /// POST an optional JSON body to the given path and deserialize the
    /// JSON response.
    ///
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, ApiError> {
        let response = self.call(Method::POST, path, body).await?;
        Self::decode(response).await
    }

    /// DELETE the entity at the given path, discarding the response body.
    ///
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.call(Method::DELETE, path, None).await?;
        Ok(())
    }

    /// POST a multipart form to the given path, discarding the response body.
    ///
    pub async fn upload(&self, path: &str, form: reqwest::multipart::Form) -> Result<(), ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http_client.post(&url).multipart(form);
        if let Some(token) = &self.api_token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }
        let response = request.send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Make a request and return the response after status checking.
    ///
    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Response, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        trace!("{} {}", method, url);

        let mut request = self.http_client.request(method, &url);
        if let Some(token) = &self.api_token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        Self::check_status(response).await
    }

    /// Map non-2xx responses to [`ApiError::Api`], surfacing the server's
    /// `detail` field when present and a generic fallback otherwise.
    ///
    async fn check_status(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .map(|e| e.detail)
            .unwrap_or_else(|_| format!("operation failed (status {})", status.as_u16()));
        error!("API request failed with status {}: {}", status, detail);
        Err(ApiError::Api {
            status: status.as_u16(),
            detail,
        })
    }

    /// Deserialize a successful response body, failing fast on a shape
    /// mismatch instead of letting partial data through.
    ///
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            error!(
                "Failed to deserialize API response: {}. Response body: {}",
                e,
                String::from_utf8_lossy(&bytes)
            );
            ApiError::from(e)
        })
    }
}
