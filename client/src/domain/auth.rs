//! Authentication primitives: login credentials and the bearer token pair.
//!
//! Secrets are held in [`Zeroizing`] buffers so they are wiped on drop.

use std::fmt;

use zeroize::Zeroizing;

/// Error returned when login or token values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
    /// A token was blank or contained whitespace.
    InvalidToken,
}

impl fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::InvalidToken => write!(f, "token must be non-empty and contain no whitespace"),
        }
    }
}

impl std::error::Error for CredentialsError {}

/// Validated login credentials exchanged for a token pair.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` must be non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use inhouse_client::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" faker ", "hunter2").unwrap();
/// assert_eq!(creds.username(), "faker");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialsError`] when either part is blank.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, CredentialsError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(CredentialsError::EmptyUsername);
        }

        if password.is_empty() {
            return Err(CredentialsError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username sent to the token endpoint.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password sent to the token endpoint.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Access and refresh token pair persisted between runs.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    access: Zeroizing<String>,
    refresh: Zeroizing<String>,
}

impl TokenPair {
    /// Construct a pair, rejecting blank or whitespace-bearing tokens.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialsError::InvalidToken`] for malformed input.
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Result<Self, CredentialsError> {
        let access_token = Zeroizing::new(access.into());
        let refresh_token = Zeroizing::new(refresh.into());
        if !is_valid_token(&access_token) || !is_valid_token(&refresh_token) {
            return Err(CredentialsError::InvalidToken);
        }
        Ok(Self {
            access: access_token,
            refresh: refresh_token,
        })
    }

    /// Short-lived bearer token.
    pub fn access(&self) -> &str {
        self.access.as_str()
    }

    /// Long-lived token used to mint new access tokens.
    pub fn refresh(&self) -> &str {
        self.refresh.as_str()
    }
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access", &"<redacted>")
            .field("refresh", &"<redacted>")
            .finish()
    }
}

fn is_valid_token(token: &str) -> bool {
    !token.is_empty() && !token.chars().any(char::is_whitespace)
}
