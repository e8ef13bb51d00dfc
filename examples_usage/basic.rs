use tracing::{error, info, warn};
use tracing_logcat::init::init_tracing;
use tracing_logcat::Severity;

fn main() {
    // On a device this lands in `adb logcat -s demo`; elsewhere on stderr.
    let handle = match init_tracing("demo") {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("logging unavailable: {}", e);
            return;
        }
    };

    handle.set_metadata_value("env", Some("prod".into()));
    info!("starting service");

    warn!(user_id = 42, reason = "invalid password", "authentication failed");

    handle.set_log_level(Severity::Error);
    info!("not shown");
    error!(target: "db", "connection lost");
}
