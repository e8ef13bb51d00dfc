use std::sync::Arc;

use tracing_logcat::memory_sink::{CapturedLine, MemorySink};
use tracing_logcat::provider::MultiplexProvider;
use tracing_logcat::{
    prettify, LogRecord, LogcatHandler, LogcatLayer, Metadata, MetadataProvider, MetadataValue,
    NativePriority, Severity,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

fn md(pairs: &[(&str, &str)]) -> Metadata {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), MetadataValue::from(*v)))
        .collect()
}

#[test]
fn base_metadata_line_matches_native_format() {
    let sink = Arc::new(MemorySink::new());
    let mut handler = LogcatHandler::with_sink("L", sink.clone());
    handler.set_metadata(md(&[("env", "prod")]));

    handler.log(
        &LogRecord::new(Severity::Info, "hello")
            .with_source("Mod")
            .with_location("src/lib.rs", "run", 10),
    );

    assert_eq!(
        sink.lines(),
        vec![CapturedLine {
            priority: NativePriority::Info,
            tag: "L".to_string(),
            text: " env=prod [Mod] hello".to_string(),
        }]
    );
}

#[test]
fn same_metadata_renders_identically_on_every_path() {
    let sink = Arc::new(MemorySink::new());
    let mut handler = LogcatHandler::with_sink("L", sink.clone());
    handler.set_metadata(md(&[("b", "2"), ("a", "1")]));

    // Cached base rendering.
    handler.log(&LogRecord::new(Severity::Notice, "m").with_source("s"));
    // Fresh rendering of merged metadata carrying the same values.
    let same = md(&[("a", "1")]);
    handler.log(&LogRecord::new(Severity::Notice, "m").with_metadata(&same).with_source("s"));

    let lines = sink.take();
    assert_eq!(lines[0], lines[1]);
    assert_eq!(lines[0].text, " a=1 b=2 [s] m");
    assert_eq!(prettify(handler.metadata()).as_deref(), handler.pretty_metadata());
}

#[test]
fn multiplexed_providers_sit_between_base_and_explicit() {
    let sink = Arc::new(MemorySink::new());
    let first: Arc<dyn MetadataProvider> = Arc::new(|| md(&[("k", "p1"), ("p", "1")]));
    let second: Arc<dyn MetadataProvider> = Arc::new(|| md(&[("k", "p2")]));
    let mut handler = LogcatHandler::with_sink("L", sink.clone())
        .with_provider(Arc::new(MultiplexProvider::new(vec![first, second])));
    handler.set_metadata(md(&[("k", "base"), ("x", "base")]));

    handler.log(&LogRecord::new(Severity::Error, "one").with_source("s"));
    let explicit = md(&[("k", "explicit")]);
    handler.log(&LogRecord::new(Severity::Error, "two").with_metadata(&explicit).with_source("s"));

    let texts: Vec<_> = sink.take().into_iter().map(|l| l.text).collect();
    assert_eq!(
        texts,
        vec![" k=p2 p=1 x=base [s] one", " k=explicit p=1 x=base [s] two"]
    );
}

#[test]
fn tracing_events_reach_the_sink() {
    let sink = Arc::new(MemorySink::new());
    let mut handler = LogcatHandler::with_sink("app", sink.clone());
    handler.set_log_level(Severity::Trace);
    handler.set_metadata(md(&[("env", "test")]));
    let layer = LogcatLayer::new(handler);
    let handle = layer.handle();
    let subscriber = Registry::default().with(layer);

    tracing::subscriber::with_default(subscriber, || {
        tracing::trace!(target: "boot", "tracing");
        let span = tracing::info_span!("job", job = "sync");
        let _guard = span.enter();
        tracing::info!(target: "worker", items = 3, "done");
        handle.set_metadata_value("env", None);
        tracing::error!(target: "worker", "gone");
    });

    let lines = sink.take();
    let summary: Vec<_> = lines.iter().map(|l| (l.priority, l.text.as_str())).collect();
    assert_eq!(
        summary,
        vec![
            (NativePriority::Verbose, " env=test [boot] tracing"),
            (NativePriority::Info, " env=test items=3 job=sync [worker] done"),
            (NativePriority::Error, " job=sync [worker] gone"),
        ]
    );
    assert!(lines.iter().all(|l| l.tag == "app"));
}
