//! Offline sync worker.
//!
//! Opens the local store, probes API reachability to drive the
//! connectivity state, and runs the sync-on-restore and retention
//! cleanup loops until ctrl-c.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tourcast_offline::{
    retention_loop, ConnState, ConnectivityHandle, ConnectivityMonitor, FsQuota, ProgressSync,
    StorageAccountant, WatchSource,
};
use tourcast_remote::{HttpProgressSink, HttpStatusSink};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;

use config::WorkerConfig;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tourcast_worker=debug,tourcast_offline=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = WorkerConfig::from_env();
    let timeout = Duration::from_secs(config.request_timeout_secs);

    let pool = match tourcast_db::open(&config.database_path).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(path = %config.database_path, error = %e, "Cannot open local store");
            std::process::exit(1);
        }
    };
    tracing::info!(path = %config.database_path, "Local store ready");

    let progress_sink = match HttpProgressSink::new(&config.api_base_url, timeout) {
        Ok(sink) => Arc::new(sink),
        Err(e) => {
            tracing::error!(error = %e, "Cannot build progress client");
            std::process::exit(1);
        }
    };
    let status_sink = match HttpStatusSink::new(&config.api_base_url, timeout) {
        Ok(sink) => Arc::new(sink),
        Err(e) => {
            tracing::error!(error = %e, "Cannot build status client");
            std::process::exit(1);
        }
    };

    let probe = reqwest::Client::new();
    let health_url = format!("{}/health", config.api_base_url);
    let initial = probe_once(&probe, &health_url).await;
    let source = Arc::new(WatchSource::new(initial));
    tracing::info!(state = ?initial, "Connectivity seeded");

    let sync = Arc::new(ProgressSync::new(
        pool.clone(),
        progress_sink,
        ConnectivityHandle::from_source(source.as_ref()),
    ));
    let accountant = Arc::new(StorageAccountant::new(
        pool.clone(),
        Arc::new(FsQuota::new(&config.database_path)),
        status_sink,
        config.user_id.clone(),
    ));

    let cancel = CancellationToken::new();

    let monitor = ConnectivityMonitor::new(source.as_ref(), Arc::clone(&sync));
    let monitor_task = tokio::spawn(monitor.run(cancel.clone()));

    let retention_task = tokio::spawn(retention_loop(
        Arc::clone(&accountant),
        config.retention_days,
        Duration::from_secs(config.cleanup_interval_secs),
        cancel.clone(),
    ));

    let probe_task = tokio::spawn(connectivity_probe(
        probe,
        health_url,
        Arc::clone(&source),
        Duration::from_secs(config.probe_interval_secs),
        cancel.clone(),
    ));

    tracing::info!("Offline sync worker running");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
    cancel.cancel();

    let _ = monitor_task.await;
    let _ = retention_task.await;
    let _ = probe_task.await;
    pool.close().await;
}

/// One reachability check against the API health endpoint.
async fn probe_once(http: &reqwest::Client, url: &str) -> ConnState {
    match http.get(url).send().await {
        Ok(response) if response.status().is_success() => ConnState::Online,
        _ => ConnState::Offline,
    }
}

/// Periodically re-probe the API and publish the result as the host
/// connectivity signal.
async fn connectivity_probe(
    http: reqwest::Client,
    url: String,
    source: Arc<WatchSource>,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let state = probe_once(&http, &url).await;
                source.set(state);
            }
        }
    }
}
