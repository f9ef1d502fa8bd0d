//! Driven port for persisted bearer tokens.
//!
//! Two values live under fixed keys: the access token and the refresh
//! token. Both must be present before a session is silently restored.

use std::sync::{Mutex, PoisonError};

use zeroize::Zeroizing;

use super::define_port_error;
use crate::domain::TokenPair;

/// Storage key for the access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Storage key for the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

define_port_error! {
    /// Errors raised by token storage adapters.
    pub enum TokenStoreError {
        /// Reading or writing the backing store failed.
        Io { message: String } =>
            "token storage failed: {message}",
        /// A stored value is not a usable token.
        InvalidToken { key: String } =>
            "stored value under {key} is not a valid token",
    }
}

/// Port for reading and replacing the persisted token pair.
#[cfg_attr(test, mockall::automock)]
pub trait TokenStore: Send + Sync {
    /// Current access token, if stored.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError`] when the store cannot be read.
    fn access_token(&self) -> Result<Option<Zeroizing<String>>, TokenStoreError>;

    /// Current refresh token, if stored.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError`] when the store cannot be read.
    fn refresh_token(&self) -> Result<Option<Zeroizing<String>>, TokenStoreError>;

    /// Overwrite both tokens.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError`] when the store cannot be written.
    fn store(&self, tokens: &TokenPair) -> Result<(), TokenStoreError>;

    /// Remove both tokens.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError`] when the store cannot be written.
    fn clear(&self) -> Result<(), TokenStoreError>;

    /// Whether both tokens are present.
    ///
    /// Read failures count as "not stored".
    fn has_token_pair(&self) -> bool {
        matches!(
            (self.access_token(), self.refresh_token()),
            (Ok(Some(_)), Ok(Some(_)))
        )
    }
}

/// Process-local token storage, cleared when the process exits.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<Option<TokenPair>>,
}

impl MemoryTokenStore {
    /// Start with `tokens` already stored.
    pub fn with_tokens(tokens: TokenPair) -> Self {
        Self {
            tokens: Mutex::new(Some(tokens)),
        }
    }

    fn read<R>(&self, f: impl FnOnce(Option<&TokenPair>) -> R) -> R {
        let guard = self.tokens.lock().unwrap_or_else(PoisonError::into_inner);
        f(guard.as_ref())
    }

    fn write(&self, value: Option<TokenPair>) {
        let mut guard = self.tokens.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = value;
    }
}

impl TokenStore for MemoryTokenStore {
    fn access_token(&self) -> Result<Option<Zeroizing<String>>, TokenStoreError> {
        Ok(self.read(|tokens| tokens.map(|pair| Zeroizing::new(pair.access().to_owned()))))
    }

    fn refresh_token(&self) -> Result<Option<Zeroizing<String>>, TokenStoreError> {
        Ok(self.read(|tokens| tokens.map(|pair| Zeroizing::new(pair.refresh().to_owned()))))
    }

    fn store(&self, tokens: &TokenPair) -> Result<(), TokenStoreError> {
        self.write(Some(tokens.clone()));
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        self.write(None);
        Ok(())
    }
}
