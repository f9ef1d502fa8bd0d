//! Client-side core for the in-house ranking application.
//!
//! The crate is split the same way as a hexagonal service, only pointed the
//! other way round: the `domain` owns the session model, the result wrapper
//! and the ports, while `outbound` holds the reqwest-backed API client and
//! the token and notification adapters.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use inhouse_client::config::ClientSettings;
//! use inhouse_client::domain::SessionStore;
//! use inhouse_client::domain::ports::{MemoryTokenStore, TokenStore};
//! use inhouse_client::outbound::http::ApiClient;
//! use inhouse_client::outbound::notify::TracingNotifier;
//! use ortho_config::OrthoConfig;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = ClientSettings::load_from_iter(std::env::args_os())?;
//! let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::default());
//! let api = Arc::new(ApiClient::from_settings(&settings, Arc::clone(&tokens))?);
//! let store = SessionStore::new(api, tokens, Arc::new(TracingNotifier));
//!
//! store.bootstrap().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod domain;
pub mod outbound;
