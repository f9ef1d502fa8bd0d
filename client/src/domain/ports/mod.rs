//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod api_request;
mod notifier;
mod token_refresher;
mod token_store;

#[cfg(test)]
pub use api_request::MockApiRequest;
pub use api_request::{ApiError, ApiRequest, Method, ResourcePath};
#[cfg(test)]
pub use notifier::MockNotifier;
pub use notifier::{Notifier, Severity};
#[cfg(test)]
pub use token_refresher::MockTokenRefresher;
pub use token_refresher::TokenRefresher;
#[cfg(test)]
pub use token_store::MockTokenStore;
pub use token_store::{
    ACCESS_TOKEN_KEY, MemoryTokenStore, REFRESH_TOKEN_KEY, TokenStore, TokenStoreError,
};
