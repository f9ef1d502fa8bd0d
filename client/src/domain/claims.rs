//! Access-token claims needed to start a session.
//!
//! The payload segment is decoded without verifying the signature; the API
//! verifies tokens on every request, the client only needs the user id.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use thiserror::Error;

use super::user::UserId;

/// Failures while reading claims out of an access token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimsError {
    /// The token is not a three-segment JWT or its payload is not JSON.
    #[error("malformed access token: {message}")]
    Malformed {
        /// What was wrong with the token.
        message: String,
    },
    /// The payload carries no usable `user_id` claim.
    #[error("access token has no user_id claim")]
    MissingUserId,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawUserId {
    Number(u64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct RawClaims {
    #[serde(default)]
    user_id: Option<RawUserId>,
    #[serde(default)]
    exp: Option<i64>,
}

/// Claims the client reads from an access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessTokenClaims {
    user_id: UserId,
    expires_at: Option<i64>,
}

impl AccessTokenClaims {
    /// Decode the payload segment of `token`.
    ///
    /// # Examples
    /// ```
    /// use base64::Engine as _;
    /// use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    /// use inhouse_client::domain::{AccessTokenClaims, UserId};
    ///
    /// let payload = URL_SAFE_NO_PAD.encode(r#"{"user_id": 42}"#);
    /// let token = format!("header.{payload}.signature");
    /// let claims = AccessTokenClaims::decode(&token).unwrap();
    /// assert_eq!(claims.user_id(), UserId::new(42));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ClaimsError`] when the token is malformed or lacks a user id.
    pub fn decode(token: &str) -> Result<Self, ClaimsError> {
        let mut segments = token.split('.');
        let (Some(_header), Some(payload), Some(_signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(ClaimsError::Malformed {
                message: "expected three dot-separated segments".to_owned(),
            });
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|err| ClaimsError::Malformed {
                message: format!("payload is not base64url: {err}"),
            })?;
        let raw: RawClaims = serde_json::from_slice(&bytes).map_err(|err| ClaimsError::Malformed {
            message: format!("payload is not a JSON object: {err}"),
        })?;

        let user_id = match raw.user_id {
            Some(RawUserId::Number(id)) => UserId::new(id),
            Some(RawUserId::Text(text)) => text
                .trim()
                .parse::<u64>()
                .map(UserId::new)
                .map_err(|_| ClaimsError::MissingUserId)?,
            None => return Err(ClaimsError::MissingUserId),
        };

        Ok(Self {
            user_id,
            expires_at: raw.exp,
        })
    }

    /// User the token was issued to.
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Expiry as seconds since the Unix epoch, when present.
    pub const fn expires_at(&self) -> Option<i64> {
        self.expires_at
    }
}
