use chrono::{SecondsFormat, Utc};
use std::io::Write;

use crate::severity::NativePriority;
use crate::sink::LogSink;

/// Host fallback that prints lines the way `logcat` shows them:
/// `<timestamp> <P>/<tag>:<text>`.
///
/// Used off-device so the same logging setup works in desktop builds and
/// test runs.
#[derive(Clone, Debug)]
pub struct StderrSink {
    /// Prefix each line with an RFC 3339 UTC timestamp.
    pub timestamps: bool,
}

impl Default for StderrSink {
    fn default() -> Self {
        Self { timestamps: true }
    }
}

impl StderrSink {
    pub fn without_timestamps() -> Self {
        Self { timestamps: false }
    }

    pub(crate) fn format_line(&self, priority: NativePriority, tag: &str, text: &str) -> String {
        if self.timestamps {
            format!(
                "{} {}/{}:{}\n",
                Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                priority.as_char(),
                tag,
                text
            )
        } else {
            format!("{}/{}:{}\n", priority.as_char(), tag, text)
        }
    }
}

impl LogSink for StderrSink {
    fn write(&self, priority: NativePriority, tag: &str, text: &str) -> i32 {
        let line = self.format_line(priority, tag, text);
        let mut stderr = std::io::stderr().lock();
        match stderr.write_all(line.as_bytes()) {
            Ok(()) => i32::try_from(line.len()).unwrap_or(i32::MAX),
            Err(_) => -1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_like_logcat_brief() {
        let sink = StderrSink::without_timestamps();
        assert_eq!(
            sink.format_line(NativePriority::Warn, "app", " [net] slow"),
            "W/app: [net] slow\n"
        );
    }

    #[test]
    fn prefixes_timestamp() {
        let line = StderrSink::default().format_line(NativePriority::Info, "app", " x");
        assert!(line.ends_with(" I/app: x\n"));
        assert!(line.contains('T'));
    }

    #[test]
    fn reports_bytes_written() {
        let sink = StderrSink::without_timestamps();
        assert_eq!(sink.write(NativePriority::Debug, "t", "x"), 6);
    }
}
