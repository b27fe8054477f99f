use tokio::task::AbortHandle;

pub const DEFAULT_NOTIFICATION_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    serial: u64,
}

impl Notification {
    pub fn serial(&self) -> u64 {
        self.serial
    }
}

/// Single notification slot with one cancellable expiry.
///
/// Replacing the message aborts the previous expiry task, and an expiry only
/// clears the notification it was armed for, so an old timer never wipes a
/// newer message.
#[derive(Debug, Default)]
pub struct NotificationSlot {
    current: Option<Notification>,
    expiry: Option<AbortHandle>,
    next_serial: u64,
}

impl NotificationSlot {
    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    /// Shows a new message and returns its serial for [`Self::expire`].
    pub fn replace(&mut self, kind: NotificationKind, message: impl Into<String>) -> u64 {
        self.cancel_expiry();
        self.next_serial += 1;
        self.current = Some(Notification {
            kind,
            message: message.into(),
            serial: self.next_serial,
        });
        self.next_serial
    }

    pub fn arm(&mut self, expiry: AbortHandle) {
        self.cancel_expiry();
        self.expiry = Some(expiry);
    }

    /// Clears the slot if it still holds the notification `serial`.
    pub fn expire(&mut self, serial: u64) -> bool {
        if self.current.as_ref().map(Notification::serial) != Some(serial) {
            return false;
        }
        self.current = None;
        self.expiry = None;
        true
    }

    fn cancel_expiry(&mut self) {
        if let Some(handle) = self.expiry.take() {
            handle.abort();
        }
    }
}

impl Drop for NotificationSlot {
    fn drop(&mut self) {
        self.cancel_expiry();
    }
}
