use crate::severity::NativePriority;
use crate::sink::LogSink;

/// A sink that simply drops all lines.
///
/// Useful for measuring the overhead of formatting and metadata merging
/// without any native I/O.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn write(&self, _priority: NativePriority, _tag: &str, _text: &str) -> i32 {
        0
    }
}
