use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

use crate::backend::{make_sink, SinkBuildError, SinkKind, SinkKindError};
use crate::env::{
    env_opt, parse_flag, LOGCAT_LEVEL_ENV, LOGCAT_METADATA_ENV, LOGCAT_SINK_ENV,
    LOGCAT_STDOUT_ENV, LOGCAT_TAG_ENV,
};
use crate::handler::LogcatHandler;
use crate::layer::{HandlerHandle, LogcatLayer};
use crate::metadata::{Metadata, MetadataValue};
use crate::severity::{ParseSeverityError, Severity};
use crate::sink::LogSink;

/// Configuration of the logging layer.
///
/// **Fields**
/// - `tag`: label of the handler, shown as the `logcat` tag.
/// - `min_level`: events below this severity are dropped.
/// - `sink`: which [`LogSink`] receives the formatted lines.
/// - `enable_stdout`: if `true` (and the `console` feature is on), a
///   `tracing_subscriber::fmt::Layer` is installed next to the logcat layer.
/// - `metadata`: base metadata attached to every line.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    pub tag: String,
    pub min_level: Severity,
    pub sink: SinkKind,
    pub enable_stdout: bool,
    pub metadata: Metadata,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            tag: "rust".to_string(),
            min_level: Severity::Info,
            sink: SinkKind::Default,
            enable_stdout: false,
            metadata: Metadata::new(),
        }
    }
}

/// Error type returned when reading [`LayerConfig`] from the environment.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid LOGCAT_LEVEL: {0}")]
    Level(#[from] ParseSeverityError),

    #[error("invalid LOGCAT_SINK: {0}")]
    Sink(#[from] SinkKindError),

    #[error("invalid boolean in {key}: {value:?}")]
    Flag { key: &'static str, value: String },

    #[error("invalid LOGCAT_METADATA: {0}")]
    MetadataJson(#[from] serde_json::Error),

    #[error("LOGCAT_METADATA must be a JSON object")]
    MetadataNotObject,
}

/// Error type returned when installing the global subscriber.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sink(#[from] SinkBuildError),

    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized(#[from] tracing::subscriber::SetGlobalDefaultError),
}

impl LayerConfig {
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_level(mut self, level: Severity) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_sink(mut self, sink: SinkKind) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_stdout(mut self, enable: bool) -> Self {
        self.enable_stdout = enable;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Defaults overridden by the `LOGCAT_*` environment variables that
    /// are set (see [`crate::env`]).
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(tag) = env_opt(LOGCAT_TAG_ENV) {
            config.tag = tag;
        }
        if let Some(level) = env_opt(LOGCAT_LEVEL_ENV) {
            config.min_level = Severity::from_str(&level)?;
        }
        if let Some(sink) = env_opt(LOGCAT_SINK_ENV) {
            config.sink = SinkKind::from_str(&sink)?;
        }
        if let Some(flag) = env_opt(LOGCAT_STDOUT_ENV) {
            config.enable_stdout = parse_flag(&flag).ok_or_else(|| ConfigError::Flag {
                key: LOGCAT_STDOUT_ENV,
                value: flag.clone(),
            })?;
        }
        if let Some(json) = env_opt(LOGCAT_METADATA_ENV) {
            config.metadata = parse_metadata_json(&json)?;
        }

        Ok(config)
    }

    /// Build the layer around `sink` without installing anything.
    pub fn build_layer(&self, sink: Arc<dyn LogSink>) -> LogcatLayer {
        let mut handler = LogcatHandler::with_sink(self.tag.clone(), sink);
        handler.set_log_level(self.min_level);
        handler.set_metadata(self.metadata.clone());
        LogcatLayer::new(handler)
    }
}

/// Parse a JSON object into base metadata. Non-string scalars keep their
/// JSON text (`7`, `true`).
pub fn parse_metadata_json(json: &str) -> Result<Metadata, ConfigError> {
    match serde_json::from_str::<serde_json::Value>(json)? {
        serde_json::Value::Object(map) => Ok(map
            .into_iter()
            .map(|(key, value)| (key, MetadataValue::from(value)))
            .collect()),
        _ => Err(ConfigError::MetadataNotObject),
    }
}

/// Install a global `tracing` subscriber writing to `sink`, configured by
/// `config`.
///
/// **Effects**
///
/// Installs a [`Registry`] combined with [`LogcatLayer`] (plus the `fmt`
/// layer when `enable_stdout` is set) as the global default subscriber.
///
/// **Returns**
/// - The [`HandlerHandle`] for changing level or metadata at runtime.
/// - `Err(InitError::AlreadyInitialized)` if a global subscriber exists.
pub fn init_tracing_with_sink(
    sink: Arc<dyn LogSink>,
    config: &LayerConfig,
) -> Result<HandlerHandle, InitError> {
    let layer = config.build_layer(sink);
    let handle = layer.handle();

    #[cfg(feature = "console")]
    {
        if config.enable_stdout {
            let fmt_layer = tracing_subscriber::fmt::layer();
            let subscriber = Registry::default().with(layer).with(fmt_layer);
            tracing::subscriber::set_global_default(subscriber)?;
            return Ok(handle);
        }
    }

    let subscriber = Registry::default().with(layer);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(handle)
}

/// Install a global subscriber using the sink selected by `config.sink`.
pub fn init_tracing_with_config(config: &LayerConfig) -> Result<HandlerHandle, InitError> {
    let sink = make_sink(config.sink)?;
    init_tracing_with_sink(sink, config)
}

/// Install a global subscriber with default settings and the given tag.
///
/// This is the recommended entrypoint for typical applications.
pub fn init_tracing(tag: impl Into<String>) -> Result<HandlerHandle, InitError> {
    init_tracing_with_config(&LayerConfig::default().with_tag(tag))
}

/// Install a global subscriber configured from the `LOGCAT_*` variables.
pub fn init_from_env() -> Result<HandlerHandle, InitError> {
    let config = LayerConfig::from_env()?;
    init_tracing_with_config(&config)
}
