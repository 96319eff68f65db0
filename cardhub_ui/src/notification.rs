//! Transient toast notifications.

use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// The severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl Severity {
    /// Returns the Font Awesome icon name (without the `fa-` prefix).
    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "check-circle",
            Self::Error => "exclamation-circle",
            Self::Warning => "exclamation-triangle",
            Self::Info => "info-circle",
        }
    }

    /// Returns the CSS background colour.
    pub fn color(self) -> &'static str {
        match self {
            Self::Success => "var(--primary-green)",
            Self::Error => "#dc3545",
            Self::Warning => "var(--primary-orange)",
            Self::Info => "var(--dark-gray)",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::Info
    }
}

/// Unknown names map to [`Severity::Info`].
impl From<&str> for Severity {
    fn from(name: &str) -> Self {
        match name {
            "success" => Self::Success,
            "error" => Self::Error,
            "warning" => Self::Warning,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification on screen.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    /// Set once the fade out has started.
    pub leaving: bool,
}

#[derive(Debug)]
struct Current {
    notification: Notification,
    deadline: Instant,
}

/// Shows at most one notification at a time.
#[derive(Debug)]
pub struct Notifier {
    lifetime: Duration,
    fade: Duration,
    current: Option<Current>,
}

impl Notifier {
    pub fn new(lifetime: Duration, fade: Duration) -> Self {
        Self {
            lifetime,
            fade,
            current: None,
        }
    }

    /// Shows `message`, replacing the notification currently on screen.
    pub fn notify<M>(&mut self, message: M, severity: Severity, now: Instant)
    where
        M: Into<String>,
    {
        let message = message.into();
        match severity {
            Severity::Error | Severity::Warning => tracing::warn!(%severity, %message, "notify"),
            Severity::Success | Severity::Info => tracing::info!(%severity, %message, "notify"),
        }
        self.current = Some(Current {
            notification: Notification {
                message,
                severity,
                leaving: false,
            },
            deadline: now + self.lifetime,
        });
    }

    /// Removes the notification immediately (its close button).
    pub fn dismiss(&mut self) {
        self.current = None;
    }

    pub fn tick(&mut self, now: Instant) {
        let Some(current) = &mut self.current else {
            return;
        };
        if now < current.deadline {
            return;
        }
        if current.notification.leaving {
            self.current = None;
        } else {
            current.notification.leaving = true;
            current.deadline += self.fade;
            if current.deadline <= now {
                self.current = None;
            }
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.current.as_ref().map(|current| current.deadline)
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref().map(|current| &current.notification)
    }
}

/// Formats the message shown when a request fails, e.g. `Error deleting card: not found`.
///
/// Uses the server's message when it supplied one and falls back to the bare prefix otherwise.
pub fn failure_message(prefix: &str, error: &cardhub::Error) -> String {
    match error {
        cardhub::Error::Validation(e) => e.to_string(),
        e => match e.server_message() {
            Some(message) => format!("{}: {}", prefix, message),
            None => prefix.to_owned(),
        },
    }
}
