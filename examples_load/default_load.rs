use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use tracing_logcat::init::{init_tracing_with_sink, LayerConfig};
use tracing_logcat::noop_sink::NoopSink;

fn main() {
    let sink = Arc::new(NoopSink);
    let config = LayerConfig::default()
        .with_tag("load")
        .with_metadata("env", "bench");
    let handle = match init_tracing_with_sink(sink, &config) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("failed to install subscriber: {}", e);
            return;
        }
    };

    let n: u64 = 100_000;
    let start = Instant::now();

    for i in 0..n {
        info!(iteration = i, "default load test event");
    }

    let elapsed = start.elapsed();
    println!("default config: formatted {} events in {:?} (~{:.0} ev/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );

    // Base-only lines reuse the cached metadata rendering.
    handle.set_metadata_value("phase", Some("cached".into()));
    let start = Instant::now();
    for _ in 0..n {
        info!("base metadata only");
    }
    println!("base-only: {:?}", start.elapsed());
}
