//! Notifications
//!
//! Short-lived feedback messages raised by cart mutations. Each notification expires on
//! its own after a per-kind duration; the newest one is the "current" notification.
//! Expiry is driven by the caller passing the current time, so the queue never spawns
//! timers of its own.

use std::fmt;

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

use crate::products::ProductId;

/// Kind of notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Operation succeeded
    Success,

    /// Operation was rejected
    Error,

    /// Something needs attention
    Warning,

    /// Neutral information
    Info,
}

/// Notification identifier, unique per emission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(String);

impl NotificationId {
    /// The id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A feedback message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Identifier
    pub id: NotificationId,

    /// Message text
    pub message: String,

    /// Kind
    pub kind: NotificationKind,

    /// Product the notification refers to
    pub product: Option<ProductId>,

    /// Lifetime in milliseconds
    pub duration_ms: u32,

    /// When the notification was raised
    pub created_at: Timestamp,

    /// Whether the notification is still shown
    pub visible: bool,
}

impl Notification {
    /// Instant after which the notification is removed.
    #[must_use]
    pub fn expires_at(&self) -> Timestamp {
        self.created_at
            .checked_add(SignedDuration::from_millis(i64::from(self.duration_ms)))
            .unwrap_or(Timestamp::MAX)
    }
}

/// Lifetimes per kind and display behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    /// Lifetime of success notifications, in milliseconds
    pub success_ms: u32,

    /// Lifetime of error notifications, in milliseconds
    pub error_ms: u32,

    /// Lifetime of warning notifications, in milliseconds
    pub warning_ms: u32,

    /// Lifetime of info notifications, in milliseconds
    pub info_ms: u32,

    /// Whether a new notification hides the current one
    pub hide_previous: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            success_ms: 3_000,
            error_ms: 5_000,
            warning_ms: 5_000,
            info_ms: 3_000,
            hide_previous: true,
        }
    }
}

impl NotificationSettings {
    /// Lifetime of a notification of `kind`, in milliseconds.
    #[must_use]
    pub fn duration_ms(&self, kind: NotificationKind) -> u32 {
        match kind {
            NotificationKind::Success => self.success_ms,
            NotificationKind::Error => self.error_ms,
            NotificationKind::Warning => self.warning_ms,
            NotificationKind::Info => self.info_ms,
        }
    }
}

/// Queue of active notifications, oldest first
#[derive(Debug, Clone, Default)]
pub struct NotificationQueue {
    settings: NotificationSettings,
    entries: Vec<Notification>,
    sequence: u64,
}

impl NotificationQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new(settings: NotificationSettings) -> Self {
        Self {
            settings,
            entries: Vec::new(),
            sequence: 0,
        }
    }

    /// Raise a notification and make it current.
    pub fn push(
        &mut self,
        kind: NotificationKind,
        message: impl Into<String>,
        product: Option<ProductId>,
        now: Timestamp,
    ) -> NotificationId {
        if self.settings.hide_previous {
            for entry in &mut self.entries {
                entry.visible = false;
            }
        }

        self.sequence = self.sequence.wrapping_add(1);

        let id = NotificationId(format!("{}-{}", now.as_millisecond(), self.sequence));

        self.entries.push(Notification {
            id: id.clone(),
            message: message.into(),
            kind,
            product,
            duration_ms: self.settings.duration_ms(kind),
            created_at: now,
            visible: true,
        });

        id
    }

    /// The newest notification still shown.
    #[must_use]
    pub fn current(&self) -> Option<&Notification> {
        self.entries.iter().rev().find(|entry| entry.visible)
    }

    /// Notifications still shown.
    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter().filter(|entry| entry.visible)
    }

    /// Remove a notification. Removing an unknown or already removed id is a no-op.
    pub fn remove(&mut self, id: &NotificationId) -> bool {
        let before = self.entries.len();

        self.entries.retain(|entry| &entry.id != id);

        self.entries.len() != before
    }

    /// Remove every notification whose lifetime has elapsed at `now`.
    pub fn expire(&mut self, now: Timestamp) -> usize {
        let before = self.entries.len();

        self.entries.retain(|entry| entry.expires_at() > now);

        before - self.entries.len()
    }

    /// Iterate over queued notifications, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    /// Number of queued notifications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn at(millis: i64) -> Result<Timestamp, jiff::Error> {
        Timestamp::from_millisecond(millis)
    }

    #[test]
    fn ids_are_unique_within_the_same_millisecond() -> TestResult {
        let mut queue = NotificationQueue::default();

        let first = queue.push(NotificationKind::Info, "uno", None, at(1_000)?);
        let second = queue.push(NotificationKind::Info, "dos", None, at(1_000)?);

        assert_ne!(first, second);
        assert_eq!(first.as_str(), "1000-1");

        Ok(())
    }

    #[test]
    fn newest_notification_is_current_and_hides_the_rest() -> TestResult {
        let mut queue = NotificationQueue::default();

        queue.push(NotificationKind::Success, "uno", None, at(0)?);
        queue.push(
            NotificationKind::Error,
            "dos",
            Some(ProductId::new(4)),
            at(10)?,
        );

        let current = queue.current().ok_or("no current notification")?;

        assert_eq!(current.message, "dos");
        assert_eq!(current.product, Some(ProductId::new(4)));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.visible().count(), 1);

        Ok(())
    }

    #[test]
    fn previous_notifications_stay_visible_when_configured() -> TestResult {
        let mut queue = NotificationQueue::new(NotificationSettings {
            hide_previous: false,
            ..NotificationSettings::default()
        });

        queue.push(NotificationKind::Info, "uno", None, at(0)?);
        queue.push(NotificationKind::Info, "dos", None, at(0)?);

        assert_eq!(queue.visible().count(), 2);

        Ok(())
    }

    #[test]
    fn durations_depend_on_kind() -> TestResult {
        let mut queue = NotificationQueue::default();

        queue.push(NotificationKind::Success, "ok", None, at(0)?);
        queue.push(NotificationKind::Error, "mal", None, at(0)?);

        let durations: Vec<u32> = queue.iter().map(|entry| entry.duration_ms).collect();

        assert_eq!(durations, vec![3_000, 5_000]);

        Ok(())
    }

    #[test]
    fn expire_removes_elapsed_notifications() -> TestResult {
        let mut queue = NotificationQueue::default();

        queue.push(NotificationKind::Success, "ok", None, at(0)?);
        queue.push(NotificationKind::Error, "mal", None, at(0)?);

        assert_eq!(queue.expire(at(2_999)?), 0);
        assert_eq!(queue.expire(at(3_000)?), 1);
        assert_eq!(queue.expire(at(5_000)?), 1);
        assert!(queue.is_empty());

        Ok(())
    }

    #[test]
    fn hidden_notifications_are_never_current() -> TestResult {
        let mut queue = NotificationQueue::default();

        queue.push(NotificationKind::Error, "mal", None, at(0)?);
        queue.push(NotificationKind::Success, "ok", None, at(0)?);

        assert_eq!(queue.expire(at(3_000)?), 1);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.visible().count(), 0);
        assert!(queue.current().is_none());

        Ok(())
    }

    #[test]
    fn remove_is_idempotent() -> TestResult {
        let mut queue = NotificationQueue::default();

        let id = queue.push(NotificationKind::Info, "uno", None, at(0)?);

        assert!(queue.remove(&id));
        assert!(!queue.remove(&id));
        assert!(queue.current().is_none());

        Ok(())
    }
}
