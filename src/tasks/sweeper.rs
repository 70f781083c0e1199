//! TTL Sweep Task
//!
//! Background worker that periodically removes expired cache entries.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, error, info, warn};

use crate::cache::CacheStore;
use crate::error::{CacheError, Result};

/// Stop flag plus the condvar the worker sleeps on.
#[derive(Default)]
struct StopSignal {
    stopped: Mutex<bool>,
    wake: Condvar,
}

impl StopSignal {
    /// Sleeps until `interval` elapses or a stop is requested.
    ///
    /// An interval too large to form a deadline sleeps until stopped.
    ///
    /// Returns true when the worker should exit.
    fn wait(&self, interval: Duration) -> bool {
        let deadline = Instant::now().checked_add(interval);
        let mut stopped = self.stopped.lock();
        while !*stopped {
            match deadline {
                Some(deadline) => {
                    if self.wake.wait_until(&mut stopped, deadline).timed_out() {
                        break;
                    }
                }
                None => self.wake.wait(&mut stopped),
            }
        }
        *stopped
    }

    fn raise(&self) {
        *self.stopped.lock() = true;
        self.wake.notify_all();
    }
}

/// Owner of the background sweep worker.
///
/// Stopping is idempotent; dropping the sweeper stops and joins the worker.
pub struct Sweeper {
    signal: Arc<StopSignal>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Sweeper {
    /// Spawns a worker that purges expired entries from `store` once per
    /// `interval`, re-scanning the live entries each time.
    ///
    /// The store lock is taken only for the purge itself, never across the
    /// sleep.
    pub fn spawn(store: Arc<Mutex<CacheStore>>, interval: Duration) -> Result<Self> {
        let signal = Arc::new(StopSignal::default());
        let worker_signal = Arc::clone(&signal);

        let handle = thread::Builder::new()
            .name("cache-sweeper".to_string())
            .spawn(move || {
                info!(interval_ms = interval.as_millis() as u64, "starting TTL sweep task");
                while !worker_signal.wait(interval) {
                    run_pass(&store);
                }
                debug!("TTL sweep task stopped");
            })
            .map_err(|e| CacheError::Internal(format!("failed to spawn sweep worker: {}", e)))?;

        Ok(Self {
            signal,
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Signals the worker and waits for it to exit.
    pub fn stop(&self) {
        self.signal.raise();
        let handle = self.handle.lock().take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                warn!("TTL sweep worker exited abnormally");
            }
        }
    }

    /// Returns true while the worker thread has not exited.
    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .as_ref()
            .map_or(false, |handle| !handle.is_finished())
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One sweep pass. A panic inside the purge is logged and swallowed so the
/// worker keeps running and never takes callers down with it.
fn run_pass(store: &Mutex<CacheStore>) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| store.lock().purge_expired()));

    match outcome {
        Ok(0) => debug!("TTL sweep: no expired entries found"),
        Ok(removed) => info!(removed, "TTL sweep: removed expired entries"),
        Err(_) => error!("TTL sweep pass panicked; continuing"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::with_ttl;
    use std::thread::sleep;

    fn shared_store(ttl: Duration) -> Arc<Mutex<CacheStore>> {
        let mut store = CacheStore::new(100);
        store.apply_options(&[with_ttl(ttl)]).unwrap();
        Arc::new(Mutex::new(store))
    }

    #[test]
    fn test_sweeper_removes_expired_entries() {
        let store = shared_store(Duration::from_millis(50));
        let sweeper = Sweeper::spawn(Arc::clone(&store), Duration::from_millis(20)).unwrap();

        // Inserted after the worker started, so the sweep must see live state
        store.lock().set("b", "expire_soon", b"v".to_vec(), &[]).unwrap();

        sleep(Duration::from_millis(300));

        assert!(!store.lock().contains("b", "expire_soon"));
        assert_eq!(store.lock().stats().expirations, 1);
        sweeper.stop();
    }

    #[test]
    fn test_sweeper_preserves_valid_entries() {
        let store = shared_store(Duration::from_secs(3600));
        let sweeper = Sweeper::spawn(Arc::clone(&store), Duration::from_millis(20)).unwrap();

        store.lock().set("b", "long_lived", b"v".to_vec(), &[]).unwrap();
        sleep(Duration::from_millis(100));

        assert_eq!(store.lock().get("b", "long_lived", &[]).unwrap(), b"v");
        sweeper.stop();
    }

    #[test]
    fn test_stop_is_prompt_and_idempotent() {
        let store = shared_store(Duration::from_secs(1));
        let sweeper = Sweeper::spawn(store, Duration::from_secs(3600)).unwrap();
        assert!(sweeper.is_running());

        let started = Instant::now();
        sweeper.stop();
        sweeper.stop();

        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(!sweeper.is_running());
    }

    #[test]
    fn test_unbounded_interval_keeps_worker_alive() {
        let store = shared_store(Duration::from_secs(1));
        let sweeper = Sweeper::spawn(store, Duration::MAX).unwrap();

        sleep(Duration::from_millis(100));
        assert!(sweeper.is_running());

        let started = Instant::now();
        sweeper.stop();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(!sweeper.is_running());
    }

    #[test]
    fn test_wait_returns_on_raise_without_deadline() {
        let signal = Arc::new(StopSignal::default());
        let waiter = {
            let signal = Arc::clone(&signal);
            thread::spawn(move || signal.wait(Duration::MAX))
        };

        sleep(Duration::from_millis(50));
        signal.raise();

        assert!(waiter.join().unwrap());
    }

    #[test]
    fn test_drop_joins_worker() {
        let store = shared_store(Duration::from_secs(1));
        let sweeper = Sweeper::spawn(Arc::clone(&store), Duration::from_secs(3600)).unwrap();

        drop(sweeper);

        // Only the test's reference remains once the worker has exited
        assert_eq!(Arc::strong_count(&store), 1);
    }
}
