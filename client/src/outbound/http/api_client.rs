//! Reqwest-backed adapter for the [`ApiRequest`] port.
//!
//! This adapter owns transport details only: bearer authentication, one
//! refresh-and-retry on `401`, HTTP error mapping and key conversion of the
//! decoded body.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;
use zeroize::Zeroizing;

use super::refresher::HttpTokenRefresher;
use super::transport::{endpoint, map_transport_error, parse_body, read_body, reqwest_method};
use crate::config::{ClientSettings, ConfigError};
use crate::domain::ports::{
    ApiError, ApiRequest, Method, ResourcePath, TokenRefresher, TokenStore, TokenStoreError,
};
use crate::domain::{Either, LoginCredentials, TokenPair};

/// Failures while building an [`ApiClient`] from settings.
#[derive(Debug, Error)]
pub enum ApiClientBuildError {
    /// The settings do not describe a usable API root.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The reqwest client could not be constructed.
    #[error("failed to build http client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Authenticated client for the ranking API.
pub struct ApiClient<R = HttpTokenRefresher> {
    client: Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
    refresher: R,
    login_required: AtomicBool,
}

impl ApiClient {
    /// Build a client rooted at `base_url` with a per-request timeout.
    ///
    /// `base_url` should end with `/`; paths are resolved beneath it.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        timeout: Duration,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        let refresher = HttpTokenRefresher::with_client(client.clone(), base_url.clone());
        Ok(Self {
            client,
            base_url,
            tokens,
            refresher,
            login_required: AtomicBool::new(false),
        })
    }

    /// Build a client from loaded settings.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientBuildError`] for invalid settings or when the
    /// reqwest client cannot be constructed.
    pub fn from_settings(
        settings: &ClientSettings,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, ApiClientBuildError> {
        let client = Self::new(settings.api_base_url()?, settings.request_timeout(), tokens)?;
        Ok(client)
    }
}

impl<R> ApiClient<R> {
    /// Replace the token refresher.
    pub fn with_refresher<S>(self, refresher: S) -> ApiClient<S> {
        ApiClient {
            client: self.client,
            base_url: self.base_url,
            tokens: self.tokens,
            refresher,
            login_required: self.login_required,
        }
    }

    /// API root requests are resolved against.
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether authentication failed and could not be refreshed.
    pub fn login_required(&self) -> bool {
        self.login_required.load(Ordering::Acquire)
    }

    /// Forget the stored tokens.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError`] when the store cannot be cleared.
    pub fn logout(&self) -> Result<(), TokenStoreError> {
        self.tokens.clear()?;
        self.login_required.store(true, Ordering::Release);
        info!("signed out");
        Ok(())
    }

    fn require_login(&self, message: impl Into<String>) -> ApiError {
        self.login_required.store(true, Ordering::Release);
        let error = ApiError::login_required(message);
        warn!(%error, "authentication could not be restored");
        error
    }

    fn stored_access_token(&self) -> Option<Zeroizing<String>> {
        match self.tokens.access_token() {
            Ok(token) => token,
            Err(error) => {
                warn!(%error, "access token unreadable; sending unauthenticated");
                None
            }
        }
    }

    async fn send(
        &self,
        method: Method,
        url: &Url,
        body: Option<&Value>,
        access_token: Option<&str>,
    ) -> Result<Response, ApiError> {
        let mut request = self
            .client
            .request(reqwest_method(method), url.clone())
            .header(ACCEPT, "application/json");
        if let Some(token) = access_token {
            request = request.bearer_auth(token);
        }
        if let Some(json) = body {
            request = request.json(json);
        }
        let response = request.send().await.map_err(map_transport_error)?;
        debug!(%method, path = url.path(), status = response.status().as_u16(), "api responded");
        Ok(response)
    }
}

impl<R: TokenRefresher> ApiClient<R> {
    /// Exchange credentials for tokens and store them.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the credentials are rejected or the tokens
    /// cannot be stored.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<(), ApiError> {
        let pair = self.refresher.obtain(credentials).await?;
        self.tokens
            .store(&pair)
            .map_err(|error| ApiError::transport(format!("failed to store tokens: {error}")))?;
        self.login_required.store(false, Ordering::Release);
        info!(username = credentials.username(), "signed in");
        Ok(())
    }

    async fn refresh_tokens(&self) -> Result<TokenPair, ApiError> {
        let refresh_token = match self.tokens.refresh_token() {
            Ok(Some(token)) => token,
            Ok(None) => return Err(self.require_login("no refresh token stored")),
            Err(error) => {
                return Err(self.require_login(format!("refresh token unreadable: {error}")));
            }
        };
        let pair = match self.refresher.refresh(&refresh_token).await {
            Ok(pair) => pair,
            Err(error) => return Err(self.require_login(format!("token refresh failed: {error}"))),
        };
        if let Err(error) = self.tokens.store(&pair) {
            warn!(%error, "refreshed tokens could not be persisted");
        }
        debug!("access token refreshed");
        Ok(pair)
    }

    async fn perform(
        &self,
        method: Method,
        path: &ResourcePath,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let url = endpoint(&self.base_url, path)?;
        let access_token = self.stored_access_token();
        let first = self
            .send(method, &url, body, access_token.as_deref().map(String::as_str))
            .await?;

        let response = if first.status() == StatusCode::UNAUTHORIZED {
            debug!(%method, %path, "access token rejected; refreshing");
            let pair = self.refresh_tokens().await?;
            let retried = self.send(method, &url, body, Some(pair.access())).await?;
            if retried.status() == StatusCode::UNAUTHORIZED {
                return Err(self.require_login("access token rejected after refresh"));
            }
            retried
        } else {
            first
        };

        let bytes = read_body(response).await?;
        parse_body(&bytes)
    }
}

#[async_trait]
impl<R: TokenRefresher> ApiRequest for ApiClient<R> {
    async fn request(
        &self,
        method: Method,
        path: &ResourcePath,
        body: Option<Value>,
    ) -> Either<Value, ApiError> {
        let result = self.perform(method, path, body.as_ref()).await;
        if let Err(error) = &result {
            debug!(%method, %path, kind = error.kind(), %error, "api request failed");
        }
        result.into()
    }
}
