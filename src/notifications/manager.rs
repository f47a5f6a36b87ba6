// SPDX-License-Identifier: MPL-2.0
//! Notification queue with a visible window and auto-dismiss.

use super::notification::{Notification, NotificationId, Severity};
use super::Notifier;
use std::collections::VecDeque;
use std::time::Instant;

/// Maximum number of notifications visible at once.
pub const MAX_VISIBLE: usize = 3;

/// Holds visible notifications and queues the overflow.
#[derive(Debug, Default)]
pub struct Manager {
    visible: VecDeque<Notification>,
    queue: VecDeque<Notification>,
}

impl Manager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a notification. It becomes visible immediately if there is room.
    pub fn push(&mut self, notification: Notification) {
        match notification.severity() {
            Severity::Error => {
                tracing::error!(key = notification.message_key(), "notification");
            }
            Severity::Warning => {
                tracing::warn!(key = notification.message_key(), "notification");
            }
            Severity::Info | Severity::Success => {
                tracing::info!(key = notification.message_key(), "notification");
            }
        }

        if self.visible.len() < MAX_VISIBLE {
            self.visible.push_back(notification);
        } else {
            self.queue.push_back(notification);
        }
    }

    /// Removes a notification. Returns true if it was found.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        if let Some(pos) = self.visible.iter().position(|n| n.id() == id) {
            self.visible.remove(pos);
            self.promote_from_queue();
            return true;
        }

        if let Some(pos) = self.queue.iter().position(|n| n.id() == id) {
            self.queue.remove(pos);
            return true;
        }

        false
    }

    /// Dismisses expired notifications and promotes queued ones.
    pub fn tick(&mut self, now: Instant) {
        let expired: Vec<NotificationId> = self
            .visible
            .iter()
            .filter(|n| n.should_auto_dismiss(now))
            .map(Notification::id)
            .collect();

        for id in expired {
            self.dismiss(id);
        }
    }

    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        self.visible.iter()
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    #[must_use]
    pub fn queued_count(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn has_notifications(&self) -> bool {
        !self.visible.is_empty() || !self.queue.is_empty()
    }

    /// Returns true if any visible or queued notification carries `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.visible
            .iter()
            .chain(self.queue.iter())
            .any(|n| n.message_key() == key)
    }

    pub fn clear(&mut self) {
        self.visible.clear();
        self.queue.clear();
    }

    fn promote_from_queue(&mut self) {
        while self.visible.len() < MAX_VISIBLE {
            match self.queue.pop_front() {
                Some(notification) => self.visible.push_back(notification),
                None => break,
            }
        }
    }
}

impl Notifier for Manager {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}
