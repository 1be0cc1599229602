//! Transient user-visible notifications.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
}

impl std::fmt::Display for ToastLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A short notification: a title and a message.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub level: ToastLevel,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Toast {
    pub fn new(level: ToastLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Error, title, message)
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Success, title, message)
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// Prints toasts to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, toast: Toast) {
        let tag = match toast.level {
            ToastLevel::Success => "[OK]",
            ToastLevel::Error => "[!!]",
        };
        eprintln!("{} {}: {}", tag, toast.title, toast.message);
    }
}

/// Holds the most recent toast until it times out.
///
/// A newer toast replaces the current one and restarts the display window.
pub struct MessageCenter {
    display_for: Duration,
    current: Mutex<Option<(Toast, Instant)>>,
}

impl MessageCenter {
    pub fn new(display_for: Duration) -> Self {
        Self {
            display_for,
            current: Mutex::new(None),
        }
    }

    /// The toast currently on screen, if it has not expired.
    pub fn current(&self) -> Option<Toast> {
        let mut current = self.current.lock();
        match current.as_ref() {
            Some((toast, shown_at)) if shown_at.elapsed() < self.display_for => {
                Some(toast.clone())
            }
            Some(_) => {
                *current = None;
                None
            }
            None => None,
        }
    }

    pub fn dismiss(&self) {
        *self.current.lock() = None;
    }
}

impl Notifier for MessageCenter {
    fn notify(&self, toast: Toast) {
        tracing::debug!(level = %toast.level, title = %toast.title, "Showing toast");
        *self.current.lock() = Some((toast, Instant::now()));
    }
}
