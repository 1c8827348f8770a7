/// Poll loop for the exporter.
///
/// This module implements:
/// 1. `Scheduler` — runs a closure once immediately, then on a fixed interval
///    on a background thread, until stopped
/// 2. `Daemon` — one poll cycle: fetch the station's current measurement and
///    write it to the metric store
///
/// Ticks are serialized on the scheduler thread. A tick that outlasts the
/// interval delays the next one; firings missed meanwhile are dropped and the
/// next tick lands on the following interval boundary.

use crate::ingest::pegelonline::Fetcher;
use crate::model::{FetchResult, Measurement};
use crate::monitor::MetricStore;
use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Fixed-interval trigger. Consumed by `start`.
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    interval: Duration,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Invoke `on_tick` once on the calling thread, then every `interval`
    /// on a dedicated thread.
    ///
    /// The initial call returns before this function does, so callers can
    /// rely on its effects being visible. Fails only if the thread cannot
    /// be spawned.
    pub fn start<F>(self, mut on_tick: F) -> io::Result<SchedulerHandle>
    where
        F: FnMut() + Send + 'static,
    {
        let interval = self.interval;
        let anchor = Instant::now();

        on_tick();

        let (stop, stop_rx) = mpsc::channel();
        let thread = thread::Builder::new()
            .name("poll-scheduler".to_string())
            .spawn(move || {
                let mut next = next_deadline(anchor, interval, Instant::now());
                loop {
                    let signal = match next {
                        Some(deadline) => stop_rx
                            .recv_timeout(deadline.saturating_duration_since(Instant::now())),
                        // Deadline not representable; only a stop can wake us.
                        None => stop_rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
                    };
                    match signal {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }

                    on_tick();
                    next = next_deadline(anchor, interval, Instant::now());
                }
                debug!("Scheduler stopped");
            })?;

        Ok(SchedulerHandle {
            stop,
            thread: Some(thread),
        })
    }
}

/// First `anchor + k * interval` strictly after `now`. Falls back to
/// `now + interval` when the grid point does not fit in a `Duration` of
/// nanoseconds, and to `None` when no later `Instant` exists at all.
fn next_deadline(anchor: Instant, interval: Duration, now: Instant) -> Option<Instant> {
    let step = interval.as_nanos().max(1);
    let elapsed = now.saturating_duration_since(anchor).as_nanos();
    let k = elapsed / step + 1;

    k.checked_mul(step)
        .and_then(|nanos| u64::try_from(nanos).ok())
        .and_then(|nanos| anchor.checked_add(Duration::from_nanos(nanos)))
        .or_else(|| now.checked_add(interval))
}

/// Running scheduler. Stopping (explicitly or by drop) waits for an
/// in-flight tick to finish.
#[derive(Debug)]
pub struct SchedulerHandle {
    stop: Sender<()>,
    thread: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // Send fails only if the thread already exited.
        let _ = self.stop.send(());
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("Scheduler thread panicked");
            }
        }
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ---------------------------------------------------------------------------
// Daemon
// ---------------------------------------------------------------------------

/// Poll cycle for one station.
#[derive(Debug)]
pub struct Daemon {
    location: String,
    fetcher: Fetcher,
    store: Arc<MetricStore>,
}

impl Daemon {
    pub fn new(location: impl Into<String>, fetcher: Fetcher, store: Arc<MetricStore>) -> Self {
        Self {
            location: location.into(),
            fetcher,
            store,
        }
    }

    /// Fetch, decode and store one sample. The store is written only after
    /// a successful decode.
    pub fn collect_sample(&self) -> FetchResult<Measurement> {
        info!(location = %self.location, "Collecting sample...");

        let measurement = self.fetcher.fetch_sample(&self.location)?;
        let current = &measurement.current_measurement;

        // Flood-stage states are not exported, only logged.
        debug!(
            location = %self.location,
            timestamp = ?current.timestamp,
            state_mnw_mhw = ?current.state_mnw_mhw,
            state_nsw_hsw = ?current.state_nsw_hsw,
            unit = ?measurement.unit,
            "Decoded sample"
        );

        self.store.record(&self.location, &measurement);
        info!(
            location = %self.location,
            value = current.value,
            trend = current.trend,
            "Updated gauges"
        );

        Ok(measurement)
    }

    /// One scheduler tick. Failures were logged by the fetcher; the store
    /// keeps serving the previous values.
    pub fn poll(&self) {
        if let Err(e) = self.collect_sample() {
            debug!(location = %self.location, kind = %e.kind(), "Poll cycle skipped");
        }
    }

    /// Poll now, then every `every` until the handle is stopped or dropped.
    pub fn start(self, every: Duration) -> io::Result<SchedulerHandle> {
        info!(location = %self.location, every = %humantime::format_duration(every), "Starting poll loop");
        Scheduler::new(every).start(move || self.poll())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
