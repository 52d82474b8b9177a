//! Transient status line shown below the canvas.

use std::time::Duration;
use web_time::Instant;

/// Default time a status message stays visible.
pub const DEFAULT_STATUS_TTL: Duration = Duration::from_secs(5);

/// The most recent status message and when it was posted.
#[derive(Debug, Clone)]
pub struct StatusLine {
    message: Option<(String, Instant)>,
    ttl: Duration,
}

impl StatusLine {
    pub fn new(ttl: Duration) -> Self {
        Self { message: None, ttl }
    }

    /// Replace the current message.
    pub fn set(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::debug!("💬 {}", message);
        self.message = Some((message, Instant::now()));
    }

    pub fn clear(&mut self) {
        self.message = None;
    }

    /// The message if it has not expired yet.
    pub fn current(&self) -> Option<&str> {
        self.current_at(Instant::now())
    }

    fn current_at(&self, now: Instant) -> Option<&str> {
        match &self.message {
            Some((text, posted)) if now.duration_since(*posted) < self.ttl => Some(text),
            _ => None,
        }
    }

    /// The last message regardless of expiry.
    pub fn last(&self) -> Option<&str> {
        self.message.as_ref().map(|(text, _)| text.as_str())
    }
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new(DEFAULT_STATUS_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_visible_until_ttl() {
        let mut status = StatusLine::new(Duration::from_secs(5));
        assert!(status.current().is_none());

        status.set("Drawing cancelled");
        assert_eq!(status.current(), Some("Drawing cancelled"));

        let later = Instant::now() + Duration::from_secs(6);
        assert!(status.current_at(later).is_none());
        assert_eq!(status.last(), Some("Drawing cancelled"));
    }

    #[test]
    fn test_set_replaces_and_clear_removes() {
        let mut status = StatusLine::default();
        status.set("one");
        status.set("two");
        assert_eq!(status.current(), Some("two"));
        status.clear();
        assert!(status.last().is_none());
    }
}
