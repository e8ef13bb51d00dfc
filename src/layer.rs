use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use crate::handler::LogcatHandler;
use crate::metadata::{Metadata, MetadataValue};
use crate::provider::MetadataProvider;
use crate::record::LogRecord;
use crate::severity::Severity;

/// `tracing_subscriber` layer that turns events into log lines through a
/// shared [`LogcatHandler`].
///
/// Event fields become the call's explicit metadata, layered over the
/// fields of every enclosing span (outermost first, so inner spans win).
/// The event target is used as the source and the `message` field as the
/// message. Events below the handler's level are dropped before any
/// formatting happens.
pub struct LogcatLayer {
    handler: HandlerHandle,
    /// Total events seen by the layer (before filtering by level).
    pub total_events: Arc<AtomicU64>,
    /// Events handed to the handler.
    pub emitted_events: Arc<AtomicU64>,
    /// Events dropped because they were below the handler's level.
    pub filtered_events: Arc<AtomicU64>,
}

impl LogcatLayer {
    pub fn new(handler: LogcatHandler) -> Self {
        Self {
            handler: HandlerHandle::new(handler),
            total_events: Arc::new(AtomicU64::new(0)),
            emitted_events: Arc::new(AtomicU64::new(0)),
            filtered_events: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Handle for adjusting the handler after the layer was installed.
    pub fn handle(&self) -> HandlerHandle {
        self.handler.clone()
    }
}

/// Shared access to the handler owned by a [`LogcatLayer`].
///
/// The handler sits behind an `Arc` inside the lock. Logging clones that
/// `Arc` and releases the lock before the provider and the sink run, so
/// either of them may call back into the handle. Mutations copy the handler
/// when a snapshot is still in use; the base metadata and its cached
/// rendering always change together.
#[derive(Clone)]
pub struct HandlerHandle {
    inner: Arc<RwLock<Arc<LogcatHandler>>>,
}

impl HandlerHandle {
    pub fn new(handler: LogcatHandler) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(handler))),
        }
    }

    /// Current handler state. Later mutations do not affect the snapshot.
    pub fn read(&self) -> Arc<LogcatHandler> {
        // Poisoned locks are recovered; logging keeps working after a panic.
        let guard = self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// Apply `f` to the handler under the write lock.
    pub fn update<R>(&self, f: impl FnOnce(&mut LogcatHandler) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(Arc::make_mut(&mut guard))
    }

    pub fn log_level(&self) -> Severity {
        self.read().log_level()
    }

    pub fn set_log_level(&self, level: Severity) {
        self.update(|handler| handler.set_log_level(level));
    }

    pub fn metadata(&self) -> Metadata {
        self.read().metadata().clone()
    }

    pub fn set_metadata(&self, metadata: Metadata) {
        self.update(|handler| handler.set_metadata(metadata));
    }

    pub fn metadata_value(&self, key: &str) -> Option<MetadataValue> {
        self.read().metadata_value(key).cloned()
    }

    pub fn set_metadata_value(&self, key: impl Into<String>, value: Option<MetadataValue>) {
        self.update(|handler| handler.set_metadata_value(key, value));
    }

    pub fn set_metadata_provider(&self, provider: Option<Arc<dyn MetadataProvider>>) {
        self.update(|handler| handler.set_metadata_provider(provider));
    }
}

impl fmt::Debug for HandlerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HandlerHandle").field(&self.read()).finish()
    }
}

/// Fields recorded on a span, kept in the span's extensions.
struct SpanFields(Metadata);

impl<S> Layer<S> for LogcatLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut fields = Metadata::new();
        attrs.record(&mut FieldVisitor { fields: &mut fields, message: None });
        span.extensions_mut().insert(SpanFields(fields));
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut extensions = span.extensions_mut();
        if let Some(SpanFields(fields)) = extensions.get_mut::<SpanFields>() {
            values.record(&mut FieldVisitor { fields, message: None });
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        self.total_events.fetch_add(1, Ordering::Relaxed);

        let meta = event.metadata();
        let level = Severity::from(*meta.level());
        let handler = self.handler.read();
        if !handler.is_enabled(level) {
            self.filtered_events.fetch_add(1, Ordering::Relaxed);
            return;
        }

        let mut fields = Metadata::new();
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope.from_root() {
                if let Some(SpanFields(span_fields)) = span.extensions().get::<SpanFields>() {
                    fields.extend(span_fields.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
            }
        }

        let mut message: Option<String> = None;
        event.record(&mut FieldVisitor {
            fields: &mut fields,
            message: Some(&mut message),
        });
        let message = message.unwrap_or_else(|| meta.name().to_string());

        let record = LogRecord {
            level,
            message: &message,
            metadata: Some(&fields),
            source: meta.target(),
            file: meta.file().unwrap_or_default(),
            function: meta.module_path().unwrap_or_default(),
            line: meta.line().unwrap_or_default(),
        };
        handler.log(&record);
        self.emitted_events.fetch_add(1, Ordering::Relaxed);
    }
}

/// Collects `tracing` fields into [`Metadata`].
///
/// With `message` set, the `message` field is captured there instead of
/// becoming metadata (events); without it every field is metadata (spans).
pub struct FieldVisitor<'a> {
    pub fields: &'a mut Metadata,
    pub message: Option<&'a mut Option<String>>,
}

impl<'a> FieldVisitor<'a> {
    fn record_value(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            if let Some(message) = self.message.as_deref_mut() {
                *message = Some(value);
                return;
            }
        }
        self.fields
            .insert(field.name().to_string(), MetadataValue::String(value));
    }
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_value(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_value(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record_value(field, value.to_string());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.record_value(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record_value(field, value.to_string());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.record_value(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_value(field, format!("{:?}", value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_sink::MemorySink;
    use crate::severity::NativePriority;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::Registry;

    fn setup(label: &str) -> (LogcatLayer, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let layer = LogcatLayer::new(LogcatHandler::with_sink(label, sink.clone()));
        (layer, sink)
    }

    #[test]
    fn forwards_events_with_fields() {
        let (layer, sink) = setup("app");
        let subscriber = Registry::default().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(target: "net", attempt = 3, host = "example.org", "retrying {}", "now");
        });

        let lines = sink.take();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].priority, NativePriority::Warn);
        assert_eq!(lines[0].tag, "app");
        assert_eq!(lines[0].text, " attempt=3 host=example.org [net] retrying now");
    }

    #[test]
    fn filters_below_threshold() {
        let (layer, sink) = setup("app");
        let total = Arc::clone(&layer.total_events);
        let filtered = Arc::clone(&layer.filtered_events);
        let emitted = Arc::clone(&layer.emitted_events);
        let subscriber = Registry::default().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("hidden");
            tracing::info!("shown");
        });

        assert_eq!(sink.len(), 1);
        assert_eq!(total.load(Ordering::Relaxed), 2);
        assert_eq!(filtered.load(Ordering::Relaxed), 1);
        assert_eq!(emitted.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn span_fields_are_inherited() {
        let (layer, sink) = setup("app");
        let subscriber = Registry::default().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            let outer = tracing::info_span!("request", id = 7, user = "outer");
            let _outer = outer.enter();
            let inner = tracing::info_span!("step", user = "inner", phase = tracing::field::Empty);
            inner.record("phase", "load");
            let _inner = inner.enter();
            tracing::error!(target: "svc", id = 8, "failed");
        });

        assert_eq!(sink.take()[0].text, " id=8 phase=load user=inner [svc] failed");
    }

    #[test]
    fn handle_mutations_reach_the_layer() {
        let (layer, sink) = setup("app");
        let handle = layer.handle();
        let subscriber = Registry::default().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!(target: "m", "skipped");
            handle.set_log_level(Severity::Debug);
            handle.set_metadata_value("build", Some("42".into()));
            tracing::debug!(target: "m", "kept");
        });

        let lines = sink.take();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, " build=42 [m] kept");
        assert_eq!(handle.metadata_value("build"), Some(MetadataValue::from("42")));
    }

    #[test]
    fn provider_may_mutate_the_handler_while_logging() {
        let (layer, sink) = setup("app");
        let handle = layer.handle();
        let inner = handle.clone();
        handle.set_metadata_provider(Some(Arc::new(move || {
            let seen = inner
                .metadata_value("calls")
                .map(|v| v.to_string())
                .unwrap_or_default();
            inner.set_metadata_value("calls", Some(format!("{}x", seen).into()));
            Metadata::new()
        })));
        let subscriber = Registry::default().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "t", "first");
            tracing::info!(target: "t", "second");
        });

        let texts: Vec<_> = sink.take().into_iter().map(|l| l.text).collect();
        assert_eq!(texts, vec![" [t] first", " calls=x [t] second"]);
        assert_eq!(handle.metadata_value("calls"), Some(MetadataValue::from("xx")));
    }

    #[test]
    fn message_field_on_span_is_metadata() {
        let (layer, sink) = setup("app");
        let subscriber = Registry::default().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            let span = tracing::info_span!("s", message = "from span");
            let _guard = span.enter();
            tracing::info!(target: "t", "event");
        });

        assert_eq!(sink.take()[0].text, " message=from span [t] event");
    }
}
