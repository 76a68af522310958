//! This module provides observability and diagnostics for the handler layer.
//!
//! Two tiers are kept strictly apart:
//! 1.  Schema-level events (handler construction, decimal clamping, build and
//!     extract summaries) go through the `log` facade. `log_metric!` emits a
//!     structured key/value summary and is compiled out of release builds.
//! 2.  Per-value events are never logged unconditionally. They are reachable
//!     only through a caller-supplied `ValueObserver` registered on a
//!     `HandlerManager`, which is `None` by default.

use std::sync::Once;

use log::{Level, LevelFilter};

use crate::types::FieldDescriptor;
use crate::value::Value;

/// Logs a structured key-value metric string at `debug`, only in debug builds.
///
/// # Example
/// ```
/// use arrowconv::log_metric;
/// let rows = 3;
/// log_metric!("event"="build_record", "rows"=&rows);
/// ```
#[macro_export]
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        #[cfg(debug_assertions)]
        {
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+
            log::debug!("ARROWCONV_METRIC: {{ {} }}", parts.join(", "));
        }
    };
}

/// The per-value hook. Both callbacks default to doing nothing.
pub trait ValueObserver: Send + Sync {
    /// Called after `value` was accepted into column `field` at `row`.
    fn on_add(&self, _field: &FieldDescriptor, _row: usize, _value: &Value) {}

    /// Called after `value` was decoded from column `field` at `row`.
    fn on_decode(&self, _field: &FieldDescriptor, _row: usize, _value: &Value) {}
}

/// Forwards every observed value to `log` at one level.
#[derive(Debug, Clone, Copy)]
pub struct LogObserver {
    level: Level,
}

impl LogObserver {
    pub fn new(level: Level) -> Self {
        Self { level }
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new(Level::Trace)
    }
}

impl ValueObserver for LogObserver {
    fn on_add(&self, field: &FieldDescriptor, row: usize, value: &Value) {
        log::log!(self.level, "add {}[{}] = {}", field.name, row, value);
    }

    fn on_decode(&self, field: &FieldDescriptor, row: usize, value: &Value) {
        log::log!(self.level, "decode {}[{}] = {}", field.name, row, value);
    }
}

static INIT_LOGGING: Once = Once::new();

/// Installs `env_logger` once per process. `RUST_LOG` still wins when set.
/// Later calls are no-ops.
pub fn init_logging(level: LevelFilter) {
    INIT_LOGGING.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(level);
        if let Ok(spec) = std::env::var("RUST_LOG") {
            builder.parse_filters(&spec);
        }
        if builder.try_init().is_ok() {
            log::debug!("arrowconv logging enabled at {}", level);
        }
    });
}
