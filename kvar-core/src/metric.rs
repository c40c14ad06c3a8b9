use lazy_static::lazy_static;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

lazy_static! {
    static ref KV_READ_COUNT: IntCounterVec = IntCounterVec::new(
        Opts::new("kv_read_count", "Key-Value Read Count").namespace("kvar_core"),
        &["client", "outcome"]
    )
    .expect("failed to initialize metric: KV_READ_COUNT");
    static ref KV_WRITE_COUNT: IntCounterVec = IntCounterVec::new(
        Opts::new("kv_write_count", "Key-Value Write Count").namespace("kvar_core"),
        &["client", "outcome"]
    )
    .expect("failed to initialize metric: KV_WRITE_COUNT");
    static ref RESOLVE_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new("resolve_duration_seconds", "Bulk Resolution Duration")
            .namespace("kvar_core"),
        &["task"]
    )
    .expect("failed to initialize metric: RESOLVE_DURATION_SECONDS");
}

pub fn kv_read_count_metric() -> &'static IntCounterVec {
    &KV_READ_COUNT
}

pub fn kv_write_count_metric() -> &'static IntCounterVec {
    &KV_WRITE_COUNT
}

pub fn resolve_duration_seconds_metric() -> &'static HistogramVec {
    &RESOLVE_DURATION_SECONDS
}

/// Registers all metrics of this crate with the given registry.
pub fn register(registry: &prometheus::Registry) -> prometheus::Result<()> {
    registry.register(Box::new(KV_READ_COUNT.clone()))?;
    registry.register(Box::new(KV_WRITE_COUNT.clone()))?;
    registry.register(Box::new(RESOLVE_DURATION_SECONDS.clone()))?;

    Ok(())
}
