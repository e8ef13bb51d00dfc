use std::sync::{Mutex, MutexGuard};

use crate::severity::NativePriority;
use crate::sink::LogSink;

/// One line as it reached the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedLine {
    pub priority: NativePriority,
    pub tag: String,
    pub text: String,
}

/// Keeps every written line in memory. Meant for tests and for
/// applications that want to inspect what would have gone to the device
/// log.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<CapturedLine>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the captured lines.
    pub fn lines(&self) -> Vec<CapturedLine> {
        self.guard().clone()
    }

    /// Drain the captured lines.
    pub fn take(&self) -> Vec<CapturedLine> {
        std::mem::take(&mut *self.guard())
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<CapturedLine>> {
        self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl LogSink for MemorySink {
    fn write(&self, priority: NativePriority, tag: &str, text: &str) -> i32 {
        self.guard().push(CapturedLine {
            priority,
            tag: tag.to_string(),
            text: text.to_string(),
        });
        i32::try_from(text.len()).unwrap_or(i32::MAX)
    }
}
