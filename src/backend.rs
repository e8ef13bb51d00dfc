use std::str::FromStr;
use std::sync::Arc;

use crate::noop_sink::NoopSink;
use crate::sink::{default_sink, LogSink};
use crate::stderr_sink::StderrSink;

/// Sink implementations that can be selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(try_from = "String")]
pub enum SinkKind {
    /// Android log buffer on Android, stderr elsewhere.
    #[default]
    Default,
    Android,
    Stderr,
    Noop,
}

/// Error type returned when parsing a sink name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown or unsupported sink kind: {0:?}")]
pub struct SinkKindError(pub String);

impl FromStr for SinkKind {
    type Err = SinkKindError;

    /// Accepts `default`, `android` (alias `logcat`), `stderr` and `noop`
    /// (alias `none`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" | "" => Ok(SinkKind::Default),
            "android" | "logcat" => Ok(SinkKind::Android),
            "stderr" => Ok(SinkKind::Stderr),
            "noop" | "none" => Ok(SinkKind::Noop),
            _ => Err(SinkKindError(s.to_string())),
        }
    }
}

/// Deserialization accepts exactly what [`FromStr`] accepts.
impl TryFrom<String> for SinkKind {
    type Error = SinkKindError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Error type returned when building a sink.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkBuildError {
    #[error("the Android log sink is only available on Android targets")]
    AndroidUnavailable,
}

/// Create a concrete [`LogSink`] for `kind`.
///
/// This is the entry point for applications that pick the sink from
/// configuration instead of constructing one directly.
pub fn make_sink(kind: SinkKind) -> Result<Arc<dyn LogSink>, SinkBuildError> {
    match kind {
        SinkKind::Default => Ok(default_sink()),
        SinkKind::Android => {
            #[cfg(target_os = "android")]
            {
                Ok(Arc::new(crate::android::AndroidLogSink) as Arc<dyn LogSink>)
            }

            #[cfg(not(target_os = "android"))]
            {
                Err(SinkBuildError::AndroidUnavailable)
            }
        }
        SinkKind::Stderr => Ok(Arc::new(StderrSink::default()) as Arc<dyn LogSink>),
        SinkKind::Noop => Ok(Arc::new(NoopSink) as Arc<dyn LogSink>),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::severity::NativePriority;

    #[test]
    fn parses_sink_names() {
        assert_eq!("Android".parse::<SinkKind>(), Ok(SinkKind::Android));
        assert_eq!("logcat".parse::<SinkKind>(), Ok(SinkKind::Android));
        assert_eq!(" stderr".parse::<SinkKind>(), Ok(SinkKind::Stderr));
        assert_eq!("none".parse::<SinkKind>(), Ok(SinkKind::Noop));
        assert_eq!("".parse::<SinkKind>(), Ok(SinkKind::Default));
        assert_eq!(
            "kafka".parse::<SinkKind>(),
            Err(SinkKindError("kafka".to_string()))
        );
    }

    #[test]
    fn deserializes_through_from_str() {
        let kinds: Vec<SinkKind> =
            serde_json::from_str(r#"["logcat","none","Stderr","default"]"#).unwrap();
        assert_eq!(
            kinds,
            vec![SinkKind::Android, SinkKind::Noop, SinkKind::Stderr, SinkKind::Default]
        );
        assert!(serde_json::from_str::<SinkKind>(r#""kafka""#).is_err());
    }

    #[test]
    fn builds_portable_sinks() {
        let sink = make_sink(SinkKind::Noop).unwrap();
        assert_eq!(sink.write(NativePriority::Info, "t", "x"), 0);
        assert!(make_sink(SinkKind::Stderr).is_ok());
        assert!(make_sink(SinkKind::Default).is_ok());
    }

    #[cfg(not(target_os = "android"))]
    #[test]
    fn android_sink_needs_android() {
        assert_eq!(
            make_sink(SinkKind::Android).err(),
            Some(SinkBuildError::AndroidUnavailable)
        );
    }
}
