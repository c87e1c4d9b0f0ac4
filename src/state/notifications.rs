use chrono::Local;
use serde::Serialize;
use std::collections::VecDeque;
use tracing::{error, info, warn};

/// Maximum number of notifications to keep before the oldest are dropped
const MAX_NOTIFICATIONS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A transient, non-blocking user notice (toast-equivalent)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub timestamp: String,
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now().format("%H:%M:%S%.3f").to_string(),
            level,
            message: message.into(),
        }
    }

    /// Format for display in a status line
    pub fn format_for_display(&self) -> String {
        let tag = match self.level {
            NotificationLevel::Success => "OK",
            NotificationLevel::Info => "INFO",
            NotificationLevel::Warning => "WARN",
            NotificationLevel::Error => "ERROR",
        };
        format!("[{}] {} {}", self.timestamp, tag, self.message)
    }
}

/// Bounded queue of pending notifications
#[derive(Debug, Clone, Default)]
pub struct NotificationQueue {
    entries: VecDeque<Notification>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(MAX_NOTIFICATIONS),
        }
    }

    pub fn push(&mut self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => {
                error!(target: "notify", "{}", notification.message)
            }
            NotificationLevel::Warning => {
                warn!(target: "notify", "{}", notification.message)
            }
            _ => info!(target: "notify", "{}", notification.message),
        }
        if self.entries.len() >= MAX_NOTIFICATIONS {
            self.entries.pop_front();
        }
        self.entries.push_back(notification);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Notification::new(NotificationLevel::Success, message));
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Notification::new(NotificationLevel::Info, message));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Notification::new(NotificationLevel::Warning, message));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Notification::new(NotificationLevel::Error, message));
    }

    /// Take every pending notification, oldest first
    pub fn drain(&mut self) -> Vec<Notification> {
        self.entries.drain(..).collect()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
