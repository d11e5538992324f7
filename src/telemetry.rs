//! Opt-in tracing setup for binaries and hosts rendering `catbars` charts.
//!
//! Layout steps log at `debug`, bisection iterations at `trace`. Hosts may
//! install their own subscriber instead of calling these helpers.

/// Installs a stderr `fmt` subscriber filtered at `info`.
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber was already set by the host application.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_filter("info")
}

/// Like [`init_default_tracing`] with a custom fallback directive such as
/// `catbars=debug`. `RUST_LOG` still wins when set.
#[must_use]
pub fn init_tracing_with_filter(default_directive: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = default_directive;
        false
    }
}
