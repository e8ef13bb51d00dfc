use std::fmt;
use std::str::FromStr;

/// Importance of a log event as seen by the façade.
///
/// Variants are ordered from least to most severe, so `Severity::Info <
/// Severity::Error` holds and a threshold check is a plain comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Severity {
    Trace,
    Debug,
    #[default]
    Info,
    Notice,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// Every variant, least severe first.
    pub const ALL: [Severity; 7] = [
        Severity::Trace,
        Severity::Debug,
        Severity::Info,
        Severity::Notice,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
    ];

    /// Priority code understood by the Android log buffer.
    ///
    /// The native side has one level fewer than the façade: `Info` and
    /// `Notice` both land on `INFO`.
    pub fn native_priority(self) -> NativePriority {
        match self {
            Severity::Trace => NativePriority::Verbose,
            Severity::Debug => NativePriority::Debug,
            Severity::Info | Severity::Notice => NativePriority::Info,
            Severity::Warning => NativePriority::Warn,
            Severity::Error => NativePriority::Error,
            Severity::Critical => NativePriority::Fatal,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Trace => "trace",
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Notice => "notice",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a severity name cannot be parsed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown severity: {0:?}")]
pub struct ParseSeverityError(pub String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" | "verbose" => Ok(Severity::Trace),
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "notice" => Ok(Severity::Notice),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" | "err" => Ok(Severity::Error),
            "critical" | "crit" | "fatal" => Ok(Severity::Critical),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

/// Deserialization accepts exactly what [`FromStr`] accepts.
impl TryFrom<String> for Severity {
    type Error = ParseSeverityError;

    fn try_from(value: String) -> Result<Self, <Self as TryFrom<String>>::Error> {
        value.parse()
    }
}

impl From<tracing::Level> for Severity {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Severity::Trace,
            tracing::Level::DEBUG => Severity::Debug,
            tracing::Level::INFO => Severity::Info,
            tracing::Level::WARN => Severity::Warning,
            tracing::Level::ERROR => Severity::Error,
        }
    }
}

/// Android `android_LogPriority` values accepted by `__android_log_write`.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NativePriority {
    Verbose = 2,
    Debug = 3,
    Info = 4,
    Warn = 5,
    Error = 6,
    Fatal = 7,
}

impl NativePriority {
    pub fn as_raw(self) -> i32 {
        self as i32
    }

    /// Single-letter tag used by `logcat` output (`I/tag: ...`).
    pub fn as_char(self) -> char {
        match self {
            NativePriority::Verbose => 'V',
            NativePriority::Debug => 'D',
            NativePriority::Info => 'I',
            NativePriority::Warn => 'W',
            NativePriority::Error => 'E',
            NativePriority::Fatal => 'F',
        }
    }
}
