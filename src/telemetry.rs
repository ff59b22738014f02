//! Opt-in tracing setup for hosts embedding the histogram engine.
//!
//! The controller and the click state machine emit `tracing` events; nothing
//! subscribes to them by default. Hosts either call [`init_default_tracing`]
//! once at startup or install their own subscriber and filters.

/// Installs a compact subscriber honoring `RUST_LOG`, falling back to
/// `histogram_rs=debug`.
///
/// Returns `true` when the subscriber was installed. Returns `false` when the
/// `telemetry` feature is off or a global subscriber is already set.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("histogram_rs=debug"));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
