// SPDX-License-Identifier: MPL-2.0
//! User-facing diagnostics.
//!
//! The shell reports degraded conditions (engine fallback, failed restarts)
//! through a [`Notifier`]. Nothing depends on a notification being shown;
//! a notifier that drops everything is a valid implementation.
//!
//! [`Manager`] is the toast queue used by the shell: up to three visible,
//! the rest queued, info/success gone after 3 s, warnings after 5 s, errors
//! kept until dismissed.

mod manager;
mod notification;

pub use manager::{Manager, MAX_VISIBLE};
pub use notification::{Notification, NotificationId, Severity};

/// Notification collaborator.
pub trait Notifier {
    fn notify(&mut self, notification: Notification);

    fn show_info(&mut self, message_key: &str) {
        self.notify(Notification::info(message_key));
    }

    fn show_success(&mut self, message_key: &str) {
        self.notify(Notification::success(message_key));
    }

    fn show_warning(&mut self, message_key: &str) {
        self.notify(Notification::warning(message_key));
    }

    fn show_error(&mut self, message_key: &str) {
        self.notify(Notification::error(message_key));
    }
}
