//! Driven port for transient user-facing notifications.

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// A mutation was confirmed by the server.
    Success,
    /// A mutation failed; local state was left unchanged.
    Error,
}

/// Port for the toast/snackbar side-channel.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Show `message` with the given severity.
    fn notify(&self, message: &str, severity: Severity);
}
