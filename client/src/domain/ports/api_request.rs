//! Driven port for authenticated calls to the ranking API.
//!
//! The session store only sees this trait: a method, a resource path and an
//! optional JSON body go in, an [`Either`] comes out. Transport, token
//! refresh and key conversion live in the outbound adapter.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;
use crate::domain::Either;

/// HTTP verbs used by the ranking API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Read a resource.
    Get,
    /// Create or register a resource.
    Post,
    /// Replace a resource.
    Put,
    /// Remove a resource.
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        };
        f.write_str(verb)
    }
}

/// Resource path relative to the API base URL.
///
/// Segments are kept separate so adapters can percent-encode user-supplied
/// names (summoner names may contain spaces). Displays as `a/b/c`.
///
/// # Examples
/// ```
/// use inhouse_client::domain::ports::ResourcePath;
///
/// let path = ResourcePath::new(["valorant-accounts", "Faker", "KR1"]);
/// assert_eq!(path.to_string(), "valorant-accounts/Faker/KR1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourcePath {
    segments: Vec<String>,
}

impl ResourcePath {
    /// Build a path from its segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Path segments in order, unencoded.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

define_port_error! {
    /// Failures captured at the API client boundary.
    pub enum ApiError {
        /// The request never produced an HTTP response.
        Transport { message: String } =>
            "api transport failed: {message}",
        /// The request exceeded the configured timeout.
        Timeout { message: String } =>
            "api request timed out: {message}",
        /// The API answered with a non-success status.
        HttpStatus { status: u16, message: String } =>
            "api responded with status {status}: {message}",
        /// Authentication failed and could not be refreshed.
        LoginRequired { message: String } =>
            "login required: {message}",
        /// The response body could not be decoded.
        Decode { message: String } =>
            "api response decode failed: {message}",
        /// The request could not be built.
        InvalidRequest { message: String } =>
            "api request invalid: {message}",
    }
}

impl ApiError {
    /// Whether the user has to sign in again before retrying.
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::LoginRequired { .. })
    }

    /// HTTP status carried by the error, if any.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Port for issuing one authenticated API request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiRequest: Send + Sync {
    /// Perform `method` on `path` with an optional snake_case JSON body.
    ///
    /// Successful responses are returned with camelCase keys.
    async fn request(
        &self,
        method: Method,
        path: &ResourcePath,
        body: Option<Value>,
    ) -> Either<Value, ApiError>;
}
