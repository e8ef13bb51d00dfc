use std::sync::Arc;

use tracing::{info, info_span};
use tracing_logcat::init::{init_tracing_with_config, LayerConfig};
use tracing_logcat::{Metadata, MetadataProvider, MetadataValue, Severity};

/// Ambient metadata taken from the process, queried on every line.
struct ProcessInfo;

impl MetadataProvider for ProcessInfo {
    fn get(&self) -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert("pid".to_string(), MetadataValue::from(std::process::id()));
        metadata
    }
}

fn main() {
    let config = LayerConfig::default()
        .with_tag("spans")
        .with_level(Severity::Debug)
        .with_stdout(true);
    let handle = match init_tracing_with_config(&config) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("logging unavailable: {}", e);
            return;
        }
    };
    handle.set_metadata_provider(Some(Arc::new(ProcessInfo)));

    let request = info_span!("request", request_id = "r-17", route = "/sync");
    let _request = request.enter();
    info!("accepted");

    let step = info_span!("step", name = "fetch");
    let _step = step.enter();
    info!(bytes = 2048, "downloaded");
}
