// SPDX-License-Identifier: MPL-2.0
//! Notification data and severity levels.

use std::time::{Duration, Instant};

/// Unique identifier for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(u64);

impl NotificationId {
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    /// Stays until dismissed.
    Error,
}

impl Severity {
    /// How long a notification of this severity stays visible, if it auto-dismisses.
    #[must_use]
    pub fn auto_dismiss_duration(self) -> Option<Duration> {
        match self {
            Severity::Success | Severity::Info => Some(Duration::from_secs(3)),
            Severity::Warning => Some(Duration::from_secs(5)),
            Severity::Error => None,
        }
    }
}

/// A diagnostic shown to the user.
///
/// `message_key` is a stable identifier (e.g. `notification-engine-degraded`);
/// turning it into text is the presentation layer's concern.
#[derive(Debug, Clone)]
pub struct Notification {
    id: NotificationId,
    severity: Severity,
    message_key: String,
    message_args: Vec<(String, String)>,
    created_at: Instant,
}

impl Notification {
    pub fn new(severity: Severity, message_key: impl Into<String>) -> Self {
        Self {
            id: NotificationId::new(),
            severity,
            message_key: message_key.into(),
            message_args: Vec::new(),
            created_at: Instant::now(),
        }
    }

    pub fn info(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Info, message_key)
    }

    pub fn success(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Success, message_key)
    }

    pub fn warning(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message_key)
    }

    pub fn error(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Error, message_key)
    }

    #[must_use]
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.message_args.push((key.into(), value.into()));
        self
    }

    /// Overrides the creation time. Used to replay or backdate notifications.
    #[must_use]
    pub fn created(mut self, at: Instant) -> Self {
        self.created_at = at;
        self
    }

    #[must_use]
    pub fn id(&self) -> NotificationId {
        self.id
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn message_key(&self) -> &str {
        &self.message_key
    }

    #[must_use]
    pub fn message_args(&self) -> &[(String, String)] {
        &self.message_args
    }

    #[must_use]
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Returns true once the notification has outlived its severity's duration.
    #[must_use]
    pub fn should_auto_dismiss(&self, now: Instant) -> bool {
        self.severity
            .auto_dismiss_duration()
            .is_some_and(|d| now.saturating_duration_since(self.created_at) >= d)
    }
}
