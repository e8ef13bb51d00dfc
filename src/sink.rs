use crate::severity::NativePriority;

/// Native log buffer the handler writes formatted lines to.
///
/// This mirrors `__android_log_write`: a priority, a tag and the text of
/// one line, returning the native status code. Callers never act on the
/// status; a failing sink must not disturb the code that is logging.
pub trait LogSink: Send + Sync {
    /// Write a single line.
    ///
    /// **Parameters**
    /// - `priority`: native priority already mapped from the façade level.
    /// - `tag`: handler label, shown by `logcat` as the tag column.
    /// - `text`: fully formatted line.
    ///
    /// **Returns**
    /// - A non-negative value on success (Android returns bytes written).
    /// - A negative errno-style value on failure.
    fn write(&self, priority: NativePriority, tag: &str, text: &str) -> i32;
}

/// Sink used when nothing else is configured: the Android log buffer on
/// Android targets, stderr everywhere else.
pub fn default_sink() -> std::sync::Arc<dyn LogSink> {
    #[cfg(target_os = "android")]
    {
        std::sync::Arc::new(crate::android::AndroidLogSink)
    }

    #[cfg(not(target_os = "android"))]
    {
        std::sync::Arc::new(crate::stderr_sink::StderrSink::default())
    }
}
