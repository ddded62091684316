use std::sync::{Arc, Mutex};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A short user-facing message, shown as a toast or log line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Human-readable text.
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

pub trait NotificationSink {
    fn notify(&mut self, notice: Notice);
}

/// Forwards notices to `tracing` at a matching level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&mut self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info | NoticeLevel::Success => {
                tracing::info!(level = ?notice.level, "{}", notice.message)
            }
            NoticeLevel::Warning => tracing::warn!("{}", notice.message),
            NoticeLevel::Error => tracing::error!("{}", notice.message),
        }
    }
}

/// Collects notices; clones share the same buffer.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl MemorySink {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|v| v.clone())
            .unwrap_or_default()
    }

    pub fn take(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|mut v| std::mem::take(&mut *v))
            .unwrap_or_default()
    }
}

impl NotificationSink for MemorySink {
    fn notify(&mut self, notice: Notice) {
        if let Ok(mut v) = self.notices.lock() {
            v.push(notice);
        }
    }
}
