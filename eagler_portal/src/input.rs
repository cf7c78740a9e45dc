//! Escape-key interceptor for the active game view.
//!
//! Browsers do not let a page reliably block Escape from leaving fullscreen,
//! so nothing is suppressed. While a session is active and the browser is in
//! fullscreen, each Escape press produces an advisory pointing at the
//! in-view control instead.

use crate::{browser::Key, notify::Notification, session::PhaseKind};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct InputInterceptor {
    armed: bool,
    advisory_duration: Duration,
}

impl InputInterceptor {
    pub fn new(advisory_duration: Duration) -> Self {
        Self {
            armed: false,
            advisory_duration,
        }
    }

    /// Listener registered for the active view
    pub fn arm(&mut self) {
        self.armed = true;
    }

    /// Listener removed
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Inspect a key press. Returns the advisory to show, if any.
    pub fn on_key(&self, key: &Key, phase: PhaseKind, is_fullscreen: bool) -> Option<Notification> {
        if !self.armed || phase != PhaseKind::Active || *key != Key::Escape || !is_fullscreen {
            return None;
        }

        Some(
            Notification::info(
                "Fullscreen Active",
                "Use the in-page button or F11 to exit fullscreen.",
            )
            .with_duration(self.advisory_duration),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn armed() -> InputInterceptor {
        let mut interceptor = InputInterceptor::new(Duration::from_secs(3));
        interceptor.arm();
        interceptor
    }

    #[test]
    fn test_escape_in_fullscreen_advises() {
        let advisory = armed()
            .on_key(&Key::Escape, PhaseKind::Active, true)
            .unwrap();
        assert_eq!(advisory.title, "Fullscreen Active");
        assert_eq!(advisory.duration, Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_escape_outside_active_is_ignored() {
        let interceptor = armed();
        assert!(interceptor.on_key(&Key::Escape, PhaseKind::Idle, true).is_none());
        assert!(interceptor
            .on_key(&Key::Escape, PhaseKind::Launching, true)
            .is_none());
    }

    #[test]
    fn test_escape_when_not_fullscreen_is_ignored() {
        assert!(armed().on_key(&Key::Escape, PhaseKind::Active, false).is_none());
    }

    #[test]
    fn test_other_keys_ignored() {
        let key = Key::Other("w".to_string());
        assert!(armed().on_key(&key, PhaseKind::Active, true).is_none());
    }

    #[test]
    fn test_disarmed_listener_ignores_everything() {
        let mut interceptor = armed();
        interceptor.disarm();
        assert!(!interceptor.is_armed());
        assert!(interceptor.on_key(&Key::Escape, PhaseKind::Active, true).is_none());
    }
}
