//! HTTP outbound adapters for the ranking API.
//!
//! This module provides the reqwest implementation of the `ApiRequest` and
//! `TokenRefresher` ports plus the response key conversion they share.

mod api_client;
mod case;
mod refresher;
mod transport;

pub use api_client::{ApiClient, ApiClientBuildError};
pub use case::{camelize, camelize_keys};
pub use refresher::HttpTokenRefresher;
