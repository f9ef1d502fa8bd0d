//! Notification adapters.
//!
//! `TracingNotifier` writes notifications to the log; `NotificationLog`
//! keeps them in memory for a UI to drain and render as toasts.

use std::sync::{Mutex, PoisonError};

use tracing::{error, info};

use crate::domain::ports::{Notifier, Severity};

/// Notifier that emits each notification as a tracing event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Success => info!(notification = message, "notification"),
            Severity::Error => error!(notification = message, "notification"),
        }
    }
}

/// One recorded notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Text shown to the user.
    pub message: String,
    /// Presentation hint.
    pub severity: Severity,
}

/// In-memory notification queue.
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: Mutex<Vec<Notification>>,
}

impl NotificationLog {
    /// Copy of every notification not yet drained, oldest first.
    pub fn entries(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Take every pending notification, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.entries.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, message: &str, severity: Severity) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Notification {
                message: message.to_owned(),
                severity,
            });
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the in-memory notification queue.

    use super::*;

    #[test]
    fn drain_returns_notifications_in_order_and_empties_the_log() {
        let log = NotificationLog::default();
        log.notify("Failed to add Faker.", Severity::Error);
        log.notify("Updated League role preferences.", Severity::Success);

        assert_eq!(log.entries().len(), 2);
        let drained = log.drain();
        assert_eq!(
            drained,
            vec![
                Notification {
                    message: "Failed to add Faker.".to_owned(),
                    severity: Severity::Error,
                },
                Notification {
                    message: "Updated League role preferences.".to_owned(),
                    severity: Severity::Success,
                },
            ]
        );
        assert!(log.entries().is_empty());
    }

    #[test]
    fn tracing_notifier_accepts_both_severities() {
        TracingNotifier.notify("Successfully updated ranking of Doublelift", Severity::Success);
        TracingNotifier.notify("Failed to remove Faker#KR1.", Severity::Error);
    }
}
