//! Process-wide `tracing` setup for the driver binary: a compact,
//! uptime-stamped formatter plus `RUST_LOG`-driven filtering, following
//! `env-tracing-logger`'s init pattern.

use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::{
    fmt::{self, format, time},
    prelude::*,
    EnvFilter,
};

struct Guard {}

impl Drop for Guard {
    fn drop(&mut self) {}
}

/// Installs the global subscriber. Panics if a global subscriber is
/// already set. The returned guard does nothing on drop; it exists so
/// callers hold logging alive for the scope they intend (matching the
/// `env-tracing-logger` convention this is grounded on).
pub fn init() -> impl Drop {
    init_result().map_err(|e| e.1).expect("could not set global default subscriber")
}

fn init_result() -> Result<impl Drop, (impl Drop, SetGlobalDefaultError)> {
    let evt_fmt = format().with_timer(time::Uptime::default()).compact();
    let fmt_layer = fmt::layer().event_format(evt_fmt);

    tracing_subscriber::registry().with(fmt_layer).with(EnvFilter::from_default_env()).init();

    Ok::<_, (Guard, SetGlobalDefaultError)>(Guard {})
}
