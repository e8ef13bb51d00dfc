use std::fmt;
use std::sync::Arc;

use crate::metadata::{prepare_metadata, prettify, BaseMetadata, Metadata, MetadataValue};
use crate::provider::MetadataProvider;
use crate::record::LogRecord;
use crate::severity::Severity;
use crate::sink::{default_sink, LogSink};

/// Formats log calls for one label and writes them to a [`LogSink`].
///
/// A handler is built once per logging label. It keeps the label (used as
/// the native tag), a minimum level, an optional shared metadata provider
/// and the base metadata with its pre-rendered form. Nothing is kept per
/// call.
///
/// Setters take `&mut self`; sharing one handler between threads needs an
/// outer lock (see [`crate::layer::LogcatLayer`]).
#[derive(Clone)]
pub struct LogcatHandler {
    label: String,
    log_level: Severity,
    metadata_provider: Option<Arc<dyn MetadataProvider>>,
    metadata: BaseMetadata,
    sink: Arc<dyn LogSink>,
}

impl LogcatHandler {
    /// Handler writing to the platform's default sink.
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_sink(label, default_sink())
    }

    pub fn with_sink(label: impl Into<String>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            label: label.into(),
            log_level: Severity::Info,
            metadata_provider: None,
            metadata: BaseMetadata::default(),
            sink,
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn MetadataProvider>) -> Self {
        self.metadata_provider = Some(provider);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn log_level(&self) -> Severity {
        self.log_level
    }

    pub fn set_log_level(&mut self, level: Severity) {
        self.log_level = level;
    }

    /// Whether an event at `level` passes the threshold. The façade checks
    /// this before calling [`LogcatHandler::log`].
    pub fn is_enabled(&self, level: Severity) -> bool {
        level >= self.log_level
    }

    pub fn metadata_provider(&self) -> Option<&Arc<dyn MetadataProvider>> {
        self.metadata_provider.as_ref()
    }

    pub fn set_metadata_provider(&mut self, provider: Option<Arc<dyn MetadataProvider>>) {
        self.metadata_provider = provider;
    }

    pub fn metadata(&self) -> &Metadata {
        self.metadata.map()
    }

    pub fn set_metadata(&mut self, metadata: Metadata) {
        self.metadata.set(metadata);
    }

    pub fn metadata_value(&self, key: &str) -> Option<&MetadataValue> {
        self.metadata.get(key)
    }

    /// Set a base metadata key; `None` removes it.
    pub fn set_metadata_value(&mut self, key: impl Into<String>, value: Option<MetadataValue>) {
        self.metadata.set_value(key, value);
    }

    /// Cached rendering of the base metadata.
    pub fn pretty_metadata(&self) -> Option<&str> {
        self.metadata.pretty()
    }

    pub fn sink(&self) -> &Arc<dyn LogSink> {
        &self.sink
    }

    /// Build the text of the line for `record`:
    /// `[" " + metadata] + " [" + source + "] " + message`.
    ///
    /// When the provider and the record add nothing, the cached base
    /// rendering is reused; otherwise the merged metadata is rendered for
    /// this call only.
    pub fn format_line(&self, record: &LogRecord<'_>) -> String {
        let merged = prepare_metadata(
            self.metadata.map(),
            self.metadata_provider.as_deref(),
            record.metadata,
        );

        let fresh;
        let pretty = match merged {
            Some(merged) => {
                fresh = prettify(&merged);
                fresh.as_deref()
            }
            None => self.metadata.pretty(),
        };

        match pretty {
            Some(pretty) => format!(" {} [{}] {}", pretty, record.source, record.message),
            None => format!(" [{}] {}", record.source, record.message),
        }
    }

    /// Write one line for `record`. The level is not checked here and the
    /// sink's status is ignored.
    pub fn log(&self, record: &LogRecord<'_>) {
        let line = self.format_line(record);
        let _ = self
            .sink
            .write(record.level.native_priority(), &self.label, &line);
    }
}

impl fmt::Debug for LogcatHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogcatHandler")
            .field("label", &self.label)
            .field("log_level", &self.log_level)
            .field("has_metadata_provider", &self.metadata_provider.is_some())
            .field("metadata", self.metadata.map())
            .finish()
    }
}
