//! Driven port for the token endpoints of the ranking API.

use async_trait::async_trait;

use super::ApiError;
use crate::domain::{LoginCredentials, TokenPair};

/// Port for exchanging credentials or a refresh token for a new pair.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Mint a new access token from `refresh_token`.
    ///
    /// When the server does not rotate refresh tokens the returned pair keeps
    /// `refresh_token`.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, ApiError>;

    /// Exchange credentials for a fresh pair.
    async fn obtain(&self, credentials: &LoginCredentials) -> Result<TokenPair, ApiError>;
}
