//! Transient, auto-expiring alert banners (Portal wrong-type warning,
//! Prompt Manager save/failure notices).

use chrono::{DateTime, Duration, Utc};

/// Severity of an alert banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Warning,
    Error,
}

/// A dismissible banner with an optional expiry deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
    expires_at: Option<DateTime<Utc>>,
}

/// Holds at most one active alert; raising a new one replaces the old.
#[derive(Debug, Clone, Default)]
pub struct AlertSlot {
    current: Option<Alert>,
}

impl AlertSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises an alert that auto-dismisses after `ttl`, or stays until
    /// dismissed when `ttl` is `None`.
    pub fn raise(
        &mut self,
        kind: AlertKind,
        title: impl Into<String>,
        message: impl Into<String>,
        ttl: Option<Duration>,
    ) {
        self.current = Some(Alert {
            kind,
            title: title.into(),
            message: message.into(),
            expires_at: ttl.map(|ttl| Utc::now() + ttl),
        });
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// The active alert, expiring it first when its deadline passed.
    pub fn active(&mut self) -> Option<&Alert> {
        self.expire_at(Utc::now());
        self.current.as_ref()
    }

    /// Drops the alert when `now` is past its deadline.
    pub fn expire_at(&mut self, now: DateTime<Utc>) {
        if let Some(alert) = &self.current {
            if matches!(alert.expires_at, Some(deadline) if now >= deadline) {
                self.current = None;
            }
        }
    }
}
