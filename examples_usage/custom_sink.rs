use std::sync::Arc;

use tracing::{error, info};
use tracing_logcat::init::{init_tracing_with_sink, LayerConfig};
use tracing_logcat::{LogSink, NativePriority};

/// Example of plugging in a completely custom destination by implementing
/// the `LogSink` trait directly, e.g. a JNI bridge into `android.util.Log`.
struct PrintlnSink;

impl LogSink for PrintlnSink {
    fn write(&self, priority: NativePriority, tag: &str, text: &str) -> i32 {
        println!("[{}] {}:{}", priority.as_raw(), tag, text);
        0
    }
}

fn main() {
    let sink: Arc<dyn LogSink> = Arc::new(PrintlnSink);
    let config = LayerConfig::default()
        .with_tag("custom")
        .with_metadata("build", "dev");

    if let Err(e) = init_tracing_with_sink(sink, &config) {
        eprintln!("failed to install subscriber: {}", e);
        return;
    }

    info!("custom sink example started");
    error!(db = "sqlite", "simulated error sent via custom sink");
}
