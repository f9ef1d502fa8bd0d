//! Errors returned by session store operations.
//!
//! Every failure here has already been reported through the notifier (or
//! recorded on the session state) by the time the caller sees it.

use thiserror::Error;

use super::Lifecycle;
use super::ports::ApiError;

/// Failures of a session mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The operation needs a loaded session.
    #[error("session is not ready (currently {lifecycle:?})")]
    NotReady {
        /// Lifecycle at the time of the call.
        lifecycle: Lifecycle,
    },
    /// A Valorant account identifier lacked its `#tag` suffix.
    #[error("account '{account}' is not in name#tag form")]
    InvalidAccountName {
        /// Identifier as given by the caller.
        account: String,
    },
    /// The API rejected or failed the request.
    #[error(transparent)]
    Api(#[from] ApiError),
}
