use std::sync::OnceLock;

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt as _,
    util::SubscriberInitExt as _,
};

/// Filter applied when `RUST_LOG` is unset: dependencies at `warn`, this crate's
/// call spans and observer output at `debug`.
pub const DEFAULT_DIRECTIVES: &str = "warn,universign_rpc=debug";

static INSTALLED: OnceLock<bool> = OnceLock::new();

/// Installs a process-wide fmt subscriber for applications and tests embedding
/// the client. See [`init_tracing_with`].
pub fn init_tracing() -> bool {
    init_tracing_with(DEFAULT_DIRECTIVES)
}

/// Installs the subscriber with `fallback` as filter when `RUST_LOG` is unset.
///
/// Each remote call is logged once its span closes, with the service, the
/// method and the time spent. Only the first call in a process has an effect;
/// the return value tells whether this crate's subscriber is the active one,
/// which is `false` when the application installed its own beforehand.
pub fn init_tracing_with(fallback: &str) -> bool {
    *INSTALLED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(fallback))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
        let calls = fmt::layer()
            .with_target(false)
            .with_span_events(FmtSpan::CLOSE);

        tracing_subscriber::registry()
            .with(filter)
            .with(calls)
            .try_init()
            .is_ok()
    })
}
