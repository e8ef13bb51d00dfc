//! Environment variable names read by [`crate::init::LayerConfig::from_env`].
//!
//! These are purely helpers; the handler and sinks never touch the
//! environment themselves.

/// Tag (handler label) shown in the `logcat` tag column.
pub const LOGCAT_TAG_ENV: &str = "LOGCAT_TAG";

/// Minimum severity, e.g. `debug` or `warning`.
pub const LOGCAT_LEVEL_ENV: &str = "LOGCAT_LEVEL";

/// Sink selection: `default`, `android`, `stderr` or `noop`.
pub const LOGCAT_SINK_ENV: &str = "LOGCAT_SINK";

/// Set to `1`/`true`/`yes`/`on` to also print events to stdout.
pub const LOGCAT_STDOUT_ENV: &str = "LOGCAT_STDOUT";

/// Base metadata as a JSON object, e.g. `{"env":"prod"}`.
pub const LOGCAT_METADATA_ENV: &str = "LOGCAT_METADATA";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read an environment variable, treating unset and blank values alike.
pub fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Interpret common spellings of a boolean flag.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        assert_eq!(parse_flag("ON"), Some(true));
        assert_eq!(parse_flag(" 0 "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn falls_back_when_unset() {
        assert_eq!(env_or("TRACING_LOGCAT_SURELY_UNSET", "x"), "x");
        assert_eq!(env_opt("TRACING_LOGCAT_SURELY_UNSET"), None);
    }
}
