use std::cell::RefCell;

/// How the core surfaces feedback to the interactive session. Both calls
/// are fire-and-forget: implementations must not block and must not fail;
/// a notification that cannot be displayed is simply lost.
pub trait Notifier {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Buffers notifications for a host that renders them itself (a status
/// line, a message log). Also the assertion point in tests.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    messages: RefCell<Vec<Notification>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub is_error: bool,
    pub text: String,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains and returns everything notified so far, oldest first.
    pub fn take(&self) -> Vec<Notification> {
        self.messages.take()
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages
            .borrow()
            .iter()
            .filter(|n| n.is_error)
            .map(|n| n.text.clone())
            .collect()
    }

    pub fn infos(&self) -> Vec<String> {
        self.messages
            .borrow()
            .iter()
            .filter(|n| !n.is_error)
            .map(|n| n.text.clone())
            .collect()
    }
}

impl Notifier for MemoryNotifier {
    fn info(&self, message: &str) {
        self.messages.borrow_mut().push(Notification {
            is_error: false,
            text: message.to_string(),
        });
    }

    fn error(&self, message: &str) {
        self.messages.borrow_mut().push(Notification {
            is_error: true,
            text: message.to_string(),
        });
    }
}
