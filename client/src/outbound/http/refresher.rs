//! Reqwest-backed token endpoint adapter.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;
use url::Url;

use super::transport::{endpoint, map_transport_error, read_body};
use crate::domain::ports::{ApiError, ResourcePath, TokenRefresher};
use crate::domain::{LoginCredentials, TokenPair};

#[derive(Deserialize)]
struct TokenResponse {
    access: String,
    #[serde(default)]
    refresh: Option<String>,
}

/// Token refresher that talks to the API's `token` endpoints.
#[derive(Debug, Clone)]
pub struct HttpTokenRefresher {
    client: Client,
    base_url: Url,
}

impl HttpTokenRefresher {
    /// Build a refresher that shares `client`.
    pub const fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    async fn post_for_tokens(
        &self,
        path: &ResourcePath,
        body: &Value,
    ) -> Result<TokenResponse, ApiError> {
        let url = endpoint(&self.base_url, path)?;
        debug!(%path, "requesting tokens");
        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;
        let bytes = read_body(response).await?;
        serde_json::from_slice(&bytes)
            .map_err(|error| ApiError::decode(format!("invalid token response: {error}")))
    }
}

fn token_pair(access: String, refresh: String) -> Result<TokenPair, ApiError> {
    TokenPair::new(access, refresh).map_err(|error| ApiError::decode(error.to_string()))
}

#[async_trait]
impl TokenRefresher for HttpTokenRefresher {
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, ApiError> {
        let path = ResourcePath::new(["token", "refresh"]);
        let response = self
            .post_for_tokens(&path, &json!({ "refresh": refresh_token }))
            .await?;
        let refresh = response
            .refresh
            .unwrap_or_else(|| refresh_token.to_owned());
        token_pair(response.access, refresh)
    }

    async fn obtain(&self, credentials: &LoginCredentials) -> Result<TokenPair, ApiError> {
        let path = ResourcePath::new(["token"]);
        let body = json!({
            "username": credentials.username(),
            "password": credentials.password(),
        });
        let response = self.post_for_tokens(&path, &body).await?;
        let refresh = response
            .refresh
            .ok_or_else(|| ApiError::decode("token response lacks a refresh token"))?;
        token_pair(response.access, refresh)
    }
}
