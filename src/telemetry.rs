//! Opt-in tracing setup for rig hosts.
//!
//! The library only emits `tracing` events. Run transitions and prepared-run
//! figures log at `debug`, per-sample emission at `trace`, fail-soft speed
//! conversions and limit breaches at `warn`.

/// Filter applied when `RUST_LOG` is unset.
pub const DEFAULT_FILTER_DIRECTIVE: &str = "tensile_rig=info";

/// Installs a compact `fmt` subscriber when the `telemetry` feature is
/// enabled, honouring `RUST_LOG` and falling back to
/// [`DEFAULT_FILTER_DIRECTIVE`].
///
/// Returns `false` when the feature is disabled or the host already set a
/// global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_fallback(DEFAULT_FILTER_DIRECTIVE)
}

/// Like [`init_default_tracing`] with a caller-chosen fallback directive,
/// e.g. `"tensile_rig=trace"` to follow every plotted sample.
#[must_use]
pub fn init_tracing_with_fallback(fallback_directive: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback_directive));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_directive;
        false
    }
}
