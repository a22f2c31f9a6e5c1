//! Connectivity state machine.
//!
//! The host environment delivers online/offline transitions through a
//! [`ConnectivitySource`]; [`ConnectivityMonitor`] consumes them and
//! fires a sync pass on every offline → online edge. Going offline has
//! no side effect beyond the state update; subsequent progress writes
//! simply queue as `pending`.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::sync::ProgressSync;

/// Current connectivity of the host environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    Online,
    Offline,
}

/// Capability interface for the host connectivity signal: a synchronous
/// current-state query plus a subscription for transition events.
pub trait ConnectivitySource: Send + Sync {
    fn current(&self) -> ConnState;
    fn watch(&self) -> watch::Receiver<ConnState>;
}

/// A channel-backed [`ConnectivitySource`] for platform adapters and
/// tests: the owner flips the state with [`set`](Self::set).
pub struct WatchSource {
    tx: watch::Sender<ConnState>,
}

impl WatchSource {
    pub fn new(initial: ConnState) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    /// Publish a new state. Subscribers only observe actual changes.
    pub fn set(&self, state: ConnState) {
        self.tx.send_replace(state);
    }
}

impl ConnectivitySource for WatchSource {
    fn current(&self) -> ConnState {
        *self.tx.borrow()
    }

    fn watch(&self) -> watch::Receiver<ConnState> {
        self.tx.subscribe()
    }
}

/// A cheap clonable read handle on the connectivity state.
#[derive(Clone)]
pub struct ConnectivityHandle {
    rx: watch::Receiver<ConnState>,
}

impl ConnectivityHandle {
    pub fn from_source(source: &dyn ConnectivitySource) -> Self {
        Self { rx: source.watch() }
    }

    pub fn state(&self) -> ConnState {
        *self.rx.borrow()
    }

    pub fn is_online(&self) -> bool {
        self.state() == ConnState::Online
    }
}

/// Watches transitions and triggers sync on restore.
pub struct ConnectivityMonitor {
    rx: watch::Receiver<ConnState>,
    seeded: ConnState,
    sync: Arc<ProgressSync>,
}

impl ConnectivityMonitor {
    /// The state observed here at construction seeds the machine, so a
    /// transition published before [`run`](Self::run) first polls is
    /// still detected.
    pub fn new(source: &dyn ConnectivitySource, sync: Arc<ProgressSync>) -> Self {
        let mut rx = source.watch();
        let seeded = *rx.borrow_and_update();
        Self { rx, seeded, sync }
    }

    /// Consume transition events until `cancel` is triggered.
    ///
    /// The sync pass runs on its own task; the monitor never blocks on
    /// it and keeps consuming transitions while a pass is in flight.
    pub async fn run(mut self, cancel: CancellationToken) {
        let mut previous = self.seeded;
        tracing::info!(state = ?previous, "Connectivity monitor started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Connectivity monitor stopping");
                    break;
                }
                changed = self.rx.changed() => {
                    if changed.is_err() {
                        // Source dropped; no more transitions will arrive.
                        tracing::warn!("Connectivity source closed");
                        break;
                    }
                    let state = *self.rx.borrow_and_update();
                    if state == previous {
                        continue;
                    }
                    tracing::info!(from = ?previous, to = ?state, "Connectivity changed");

                    if previous == ConnState::Offline && state == ConnState::Online {
                        let sync = Arc::clone(&self.sync);
                        tokio::spawn(async move {
                            match sync.sync_offline_data().await {
                                Ok(report) => tracing::info!(
                                    attempted = report.attempted,
                                    synced = report.synced,
                                    failed = report.failed,
                                    "Offline data sync finished",
                                ),
                                Err(e) => {
                                    tracing::error!(error = %e, "Offline data sync failed")
                                }
                            }
                        });
                    }
                    previous = state;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_source_reports_current_state() {
        let source = WatchSource::new(ConnState::Offline);
        assert_eq!(source.current(), ConnState::Offline);

        source.set(ConnState::Online);
        assert_eq!(source.current(), ConnState::Online);
    }

    #[test]
    fn handle_tracks_source_transitions() {
        let source = WatchSource::new(ConnState::Online);
        let handle = ConnectivityHandle::from_source(&source);
        assert!(handle.is_online());

        source.set(ConnState::Offline);
        assert!(!handle.is_online());
    }

    #[tokio::test]
    async fn watcher_observes_changes() {
        let source = WatchSource::new(ConnState::Offline);
        let mut rx = source.watch();

        source.set(ConnState::Online);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), ConnState::Online);
    }
}
