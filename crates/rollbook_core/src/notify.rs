//! Non-fatal user notifications.
//!
//! Used by bulk helpers that swallow errors and tell the user instead.

use log::warn;
use std::cell::RefCell;

/// Receives messages meant for the end user.
pub trait NotificationSink {
    fn notify(&self, message: &str);
}

/// Forwards notifications to the log as warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotificationSink;

impl NotificationSink for LogNotificationSink {
    fn notify(&self, message: &str) {
        warn!("event=notification module=notify status=ok message={message}");
    }
}

/// Keeps notifications in memory for the caller to present later.
#[derive(Debug, Default)]
pub struct CollectingNotificationSink {
    messages: RefCell<Vec<String>>,
}

impl CollectingNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub fn take(&self) -> Vec<String> {
        self.messages.take()
    }
}

impl NotificationSink for CollectingNotificationSink {
    fn notify(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}
