use crate::core::config::GridConfig;
use crate::core::constants::DEFAULT_WORKER_IDLE_TICK;
use crate::tiles::provider::TileProvider;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Configuration for the background generation worker
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// How long the worker waits for a nudge before polling the queue
    /// anyway. Doubles as the pacing between generation steps.
    pub idle_tick: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            idle_tick: DEFAULT_WORKER_IDLE_TICK,
        }
    }
}

impl From<&GridConfig> for WorkerConfig {
    fn from(config: &GridConfig) -> Self {
        Self {
            idle_tick: config.worker_idle_tick,
        }
    }
}

enum Control {
    Wake,
    Shutdown,
}

/// The single background consumer of a provider's generation queue.
///
/// Owns a dedicated thread that repeatedly invokes
/// [`TileProvider::generate_next_pending`], paced by the idle tick and
/// nudged via [`GenerationWorker::notify`] after range changes. Exactly
/// one worker per provider is supported; the queue strategy assumes at
/// most one generation in flight.
///
/// A generation call may take arbitrarily long; foreground interaction is
/// never blocked on it, only the visibility of that one tile is delayed.
pub struct GenerationWorker {
    control_tx: Sender<Control>,
    handle: Option<JoinHandle<()>>,
}

impl GenerationWorker {
    /// Starts the worker thread for the given provider
    pub fn spawn(provider: Arc<dyn TileProvider>, config: WorkerConfig) -> Self {
        let (control_tx, control_rx) = crossbeam_channel::unbounded();
        let idle_tick = config.idle_tick;

        let spawned = std::thread::Builder::new()
            .name("tilegrid-generation".into())
            .spawn(move || Self::run(provider, control_rx, idle_tick));

        let handle = match spawned {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::error!("failed to spawn generation worker: {e}");
                None
            }
        };

        Self { control_tx, handle }
    }

    fn run(provider: Arc<dyn TileProvider>, control_rx: Receiver<Control>, idle_tick: Duration) {
        log::debug!("generation worker started, tick {idle_tick:?}");

        loop {
            match control_rx.recv_timeout(idle_tick) {
                Ok(Control::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                Ok(Control::Wake) | Err(RecvTimeoutError::Timeout) => {}
            }

            // Coalesce a burst of nudges from a fast swipe into one pass;
            // the queue was rebuilt wholesale anyway.
            loop {
                match control_rx.try_recv() {
                    Ok(Control::Shutdown) => {
                        log::debug!("generation worker stopping");
                        return;
                    }
                    Ok(Control::Wake) => {}
                    Err(_) => break,
                }
            }

            provider.generate_next_pending();
        }

        log::debug!("generation worker stopped");
    }

    /// Nudges the worker after a visible-range change, so the first
    /// missing tile starts generating without waiting out the idle tick.
    pub fn notify(&self) {
        let _ = self.control_tx.send(Control::Wake);
    }

    /// Stops the worker thread and waits for it to exit
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let _ = self.control_tx.send(Control::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for GenerationWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::coord::{TileCoordinate, TileRange};
    use crate::tiles::provider::GridAnchor;
    use crate::tiles::tile::Tile;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    /// Provider stub counting generation calls
    struct CountingProvider {
        calls: AtomicUsize,
    }

    impl TileProvider for CountingProvider {
        fn tile_edge_length(&self) -> u32 {
            1
        }

        fn get_tile(&self, _coord: TileCoordinate) -> Option<Tile> {
            None
        }

        fn grid_anchor(&self) -> GridAnchor {
            GridAnchor::NorthWest
        }

        fn on_visible_range_changed(&self, _new_range: TileRange) {}

        fn generate_next_pending(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }

        fn debug_summary(&self) -> String {
            format!("CountingProvider[calls={}]", self.calls.load(Ordering::SeqCst))
        }
    }

    #[test]
    fn test_worker_polls_provider_until_shutdown() {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });
        let worker = GenerationWorker::spawn(
            provider.clone(),
            WorkerConfig {
                idle_tick: Duration::from_millis(1),
            },
        );

        let deadline = Instant::now() + Duration::from_secs(5);
        while provider.calls.load(Ordering::SeqCst) < 10 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(provider.calls.load(Ordering::SeqCst) >= 10);

        worker.shutdown();
        let calls_at_shutdown = provider.calls.load(Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(provider.calls.load(Ordering::SeqCst), calls_at_shutdown);
    }

    #[test]
    fn test_notify_wakes_a_long_idle_tick() {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });
        let worker = GenerationWorker::spawn(
            provider.clone(),
            WorkerConfig {
                idle_tick: Duration::from_secs(60),
            },
        );

        // Without a nudge the first poll is a minute away
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);

        worker.notify();
        let deadline = Instant::now() + Duration::from_secs(5);
        while provider.calls.load(Ordering::SeqCst) == 0 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(provider.calls.load(Ordering::SeqCst) >= 1);

        worker.shutdown();
    }

    #[test]
    fn test_drop_joins_the_thread() {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });
        {
            let _worker = GenerationWorker::spawn(
                provider.clone(),
                WorkerConfig {
                    idle_tick: Duration::from_millis(1),
                },
            );
            std::thread::sleep(Duration::from_millis(10));
        }
        // Dropped: only the provider Arc we hold remains
        assert_eq!(Arc::strong_count(&provider), 1);
    }
}
