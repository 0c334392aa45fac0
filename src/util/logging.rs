//! Diagnostics setup for host processes.
//!
//! The library itself only emits `tracing` events. Hosts that do not install
//! their own subscriber can call [`init`]; the filter comes from
//! `CURVES_IMAGING_LOG` (same syntax as `RUST_LOG`) and defaults to `warn`.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "CURVES_IMAGING_LOG";

/// Environment variable enabling chrome tracing output.
pub const TRACE_ENV: &str = "CURVES_IMAGING_TRACE";

/// Install a formatted stderr subscriber.
///
/// Returns `false` if a global subscriber was already set.
pub fn init() -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .is_ok()
}

/// Install a chrome trace writer when `CURVES_IMAGING_TRACE=1`.
///
/// Keep the returned guard alive; the trace file is flushed when it drops.
#[cfg(feature = "chrome-trace")]
pub fn init_chrome_tracing(path: impl AsRef<std::path::Path>) -> Option<tracing_chrome::FlushGuard> {
    if std::env::var(TRACE_ENV).ok().as_deref() != Some("1") {
        return None;
    }

    let (chrome_layer, guard) = tracing_chrome::ChromeLayerBuilder::new()
        .file(path.as_ref())
        .build();

    let subscriber = tracing_subscriber::registry().with(chrome_layer);
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return None;
    }

    Some(guard)
}

/// Run `f` under a scoped subscriber and return everything it logged.
#[cfg(test)]
pub(crate) fn capture(f: impl FnOnce()) -> String {
    use std::io;
    use std::sync::Arc;

    use parking_lot::Mutex;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let buffer = Buffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .without_time()
        .finish();
    tracing::subscriber::with_default(subscriber, f);

    let bytes = buffer.0.lock().clone();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// True if `log` has a line at `level` containing `needle`.
#[cfg(test)]
pub(crate) fn logged(log: &str, level: &str, needle: &str) -> bool {
    log.lines().any(|line| line.contains(level) && line.contains(needle))
}
