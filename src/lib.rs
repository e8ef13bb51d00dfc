pub mod severity;
pub mod metadata;
pub mod provider;
pub mod record;
pub mod sink;
pub mod handler;
pub mod layer;

#[cfg(target_os = "android")]
pub mod android;

pub mod backend;
pub mod env;
pub mod init;
pub mod memory_sink;
pub mod noop_sink;
pub mod stderr_sink;

pub use handler::LogcatHandler;
pub use layer::{HandlerHandle, LogcatLayer};
pub use metadata::{prepare_metadata, prettify, Metadata, MetadataValue};
pub use provider::MetadataProvider;
pub use record::LogRecord;
pub use severity::{NativePriority, Severity};
pub use sink::LogSink;
