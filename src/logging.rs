// Logging setup: stdout plus an on-disk live log that can be exported later

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LIVE_LOG_FILE: &str = "skin-picker-live.log";

/// Install the global subscriber. Keep the returned guard alive for the whole
/// process or buffered file output is lost.
pub fn init_logging(log_dir: &Path) -> Option<WorkerGuard> {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

  // Non-fatal: without a log dir we still log to stdout
  let file_layer = match std::fs::create_dir_all(log_dir) {
    Ok(()) => {
      let appender = tracing_appender::rolling::daily(log_dir, LIVE_LOG_FILE);
      let (writer, guard) = tracing_appender::non_blocking(appender);
      Some((fmt::layer().with_ansi(false).with_writer(writer), guard))
    }
    Err(e) => {
      eprintln!(
        "[Logging] Failed to ensure logs dir {} exists: {}",
        log_dir.display(),
        e
      );
      None
    }
  };

  let (file_layer, guard) = match file_layer {
    Some((layer, guard)) => (Some(layer), Some(guard)),
    None => (None, None),
  };

  tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().with_target(false))
    .with(file_layer)
    .init();

  guard
}
