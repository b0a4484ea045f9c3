//! User-facing status channel
//!
//! Every message clears itself after a short delay. A newer message always
//! replaces the current one and re-arms the clear deadline.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::history::NavigationState;

/// Delay before an informational message is cleared
pub const MESSAGE_CLEAR_DELAY: Duration = Duration::from_millis(2000);

/// Delay before an error or transcript is cleared
pub const ERROR_CLEAR_DELAY: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Info,
    Error,
    /// Echo of what the recognizer heard
    Transcript,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
    #[serde(serialize_with = "serialize_millis")]
    pub clear_after: Duration,
}

fn serialize_millis<S: serde::Serializer>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

impl StatusMessage {
    pub fn new(kind: StatusKind, text: impl Into<String>, clear_after: Duration) -> Self {
        Self {
            kind,
            text: text.into(),
            clear_after,
        }
    }
}

/// Receives everything the session wants the user to see
pub trait StatusView {
    fn post(&mut self, message: StatusMessage);

    /// Back/forward availability after a history change
    fn navigation_changed(&mut self, _state: &NavigationState) {}

    fn listening_changed(&mut self, _listening: bool) {}
}

// =============================================================================
// Status Board
// =============================================================================

#[derive(Debug, Clone)]
struct Posted {
    message: StatusMessage,
    expires_at: Instant,
}

/// Holds the newest status message until its deadline passes
#[derive(Debug, Clone, Default)]
pub struct StatusBoard {
    current: Option<Posted>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `message`, replacing whatever was there
    pub fn post(&mut self, message: StatusMessage, now: Instant) {
        let expires_at = now + message.clear_after;
        self.current = Some(Posted {
            message,
            expires_at,
        });
    }

    pub fn current(&self) -> Option<&StatusMessage> {
        self.current.as_ref().map(|posted| &posted.message)
    }

    /// When the current message should be cleared
    pub fn deadline(&self) -> Option<Instant> {
        self.current.as_ref().map(|posted| posted.expires_at)
    }

    /// Clear the current message if its deadline has passed
    pub fn expire(&mut self, now: Instant) -> Option<StatusMessage> {
        let expired = self
            .current
            .as_ref()
            .is_some_and(|posted| posted.expires_at <= now);
        if expired {
            self.current.take().map(|posted| posted.message)
        } else {
            None
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
