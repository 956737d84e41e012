use std::time::{Duration, Instant};

/// How long a notification stays on screen.
pub const DISMISS_AFTER: Duration = Duration::from_millis(3500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

/// Holds at most one notification together with its dismissal deadline.
///
/// A new notification replaces the current one and restarts the timer.
#[derive(Debug, Default)]
pub struct Notifier {
    current: Option<(Notification, Instant)>,
}

impl Notifier {
    pub fn show(&mut self, message: impl Into<String>, kind: NotificationKind) {
        self.show_at(message, kind, Instant::now());
    }

    pub fn show_at(&mut self, message: impl Into<String>, kind: NotificationKind, now: Instant) {
        let notification = Notification {
            message: message.into(),
            kind,
        };
        tracing::debug!("notification: {:?}", notification);
        self.current = Some((notification, now + DISMISS_AFTER));
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref().map(|(notification, _)| notification)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.current.as_ref().map(|(_, deadline)| *deadline)
    }

    /// Drop the notification once its deadline has passed. Returns true when
    /// something was dismissed.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.deadline() {
            Some(deadline) if now >= deadline => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    /// Stop the timer and drop whatever is shown.
    pub fn cancel(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dismissed_after_delay() {
        let start = Instant::now();
        let mut notifier = Notifier::default();
        notifier.show_at("saved", NotificationKind::Success, start);

        assert!(!notifier.expire(start + Duration::from_millis(3499)));
        assert_eq!(notifier.current().unwrap().message, "saved");

        assert!(notifier.expire(start + DISMISS_AFTER));
        assert!(notifier.current().is_none());
    }

    #[test]
    fn newer_notification_replaces_and_restarts_timer() {
        let start = Instant::now();
        let mut notifier = Notifier::default();
        notifier.show_at("first", NotificationKind::Success, start);
        notifier.show_at("second", NotificationKind::Error, start + Duration::from_secs(3));

        let current = notifier.current().unwrap();
        assert_eq!(current.message, "second");
        assert_eq!(current.kind, NotificationKind::Error);

        assert!(!notifier.expire(start + DISMISS_AFTER));
        assert!(notifier.expire(start + Duration::from_secs(3) + DISMISS_AFTER));
    }

    #[test]
    fn cancel_clears_pending_timer() {
        let mut notifier = Notifier::default();
        notifier.show("bye", NotificationKind::Success);

        notifier.cancel();

        assert!(notifier.current().is_none());
        assert!(notifier.deadline().is_none());
    }
}
