// src/telemetry.rs
use anyhow::{Context, Result};
use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use once_cell::sync::OnceCell;
use std::net::SocketAddr;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const DEFAULT_LOG_FILTER: &str = "deal_alerts=info,warn";

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json().with_target(false)).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

/// Serve `/metrics` in Prometheus exposition format on `addr`.
pub fn install_prometheus(addr: SocketAddr) -> Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .context("installing prometheus exporter")?;
    ensure_metrics_described();
    Ok(())
}

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "collector_posts_seen_total",
            "Posts read from the feed listing."
        );
        describe_counter!(
            "collector_posts_duplicate_total",
            "Posts skipped because the store already has them."
        );
        describe_counter!(
            "collector_posts_unmatched_total",
            "New posts carrying no tracked category tag."
        );
        describe_counter!(
            "collector_posts_inserted_total",
            "Records written by the collector."
        );
        describe_counter!(
            "notifier_published_total",
            "Alerts published by the notifier."
        );
    });
}
