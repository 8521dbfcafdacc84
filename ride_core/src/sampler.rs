//! Background GPS sampling.
//!
//! Spawns a thread that owns the `GpsSource`, pushes decoded fixes through a
//! bounded(1) channel, and tracks when the last valid fix was seen so the
//! tick loop can treat an old fix as absent.
//!
//! Each `GpsSampler` owns exactly one thread, shut down and joined on drop.
use crossbeam_channel as xch;
use ride_traits::clock::Clock;
use ride_traits::{GpsFix, GpsSource};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

pub struct GpsSampler {
    rx: xch::Receiver<Option<GpsFix>>,
    cached: Option<GpsFix>,
    last_fix_ms: Arc<AtomicU64>,
    stale_ms: u64,
    clock: Box<dyn Clock + Send + Sync>,
    epoch: Instant,
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl GpsSampler {
    /// Poll `gps` at `hz`. A fix older than `stale_ms` is reported as absent.
    pub fn spawn<G, C>(mut gps: G, hz: u32, stale_ms: u64, clock: C) -> Self
    where
        G: GpsSource + Send + 'static,
        C: Clock + Clone + Send + Sync + 'static,
    {
        let (tx, rx) = xch::bounded(1);
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let last_fix_ms = Arc::new(AtomicU64::new(0));
        let last_fix_clone = last_fix_ms.clone();
        let period = Duration::from_micros(crate::util::period_us(hz));
        let epoch = clock.now();
        let thread_clock = clock.clone();

        let join_handle = std::thread::spawn(move || {
            loop {
                if shutdown_clone.load(Ordering::Relaxed) {
                    tracing::debug!("gps sampler received shutdown signal");
                    break;
                }

                match gps.poll_fix() {
                    Ok(fix) => {
                        if fix.is_some() {
                            last_fix_clone.store(thread_clock.ms_since(epoch), Ordering::Relaxed);
                        }
                        // A slow consumer only costs this fix; the next poll is fresher
                        match tx.send_timeout(fix, period) {
                            Ok(()) | Err(xch::SendTimeoutError::Timeout(_)) => {}
                            Err(xch::SendTimeoutError::Disconnected(_)) => {
                                tracing::debug!("gps consumer disconnected, exiting thread");
                                break;
                            }
                        }
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "gps poll failed");
                    }
                }

                if shutdown_clone.load(Ordering::Relaxed) {
                    break;
                }
                thread_clock.sleep(period);
            }
            tracing::trace!("gps sampler thread exiting cleanly");
        });

        Self {
            rx,
            cached: None,
            last_fix_ms,
            stale_ms,
            clock: Box::new(clock),
            epoch,
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// Most recent fix, or `None` if the decoder has none or it went stale.
    pub fn latest(&mut self) -> Option<GpsFix> {
        if let Some(fix) = self.rx.try_iter().last() {
            self.cached = fix;
        }
        if self.cached.is_none() {
            return None;
        }
        let stale = self.stale_for();
        if stale > self.stale_ms {
            tracing::warn!(stale_ms = stale, "gps fix went stale");
            self.cached = None;
        }
        self.cached
    }

    /// Milliseconds since the thread last saw a valid fix.
    pub fn stale_for(&self) -> u64 {
        let now = self.clock.ms_since(self.epoch);
        now.saturating_sub(self.last_fix_ms.load(Ordering::Relaxed))
    }
}

impl Drop for GpsSampler {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);

        // The thread exits between polls, or after the current poll_fix()
        // and at most one send timeout.
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => tracing::trace!("gps sampler thread joined"),
                Err(e) => tracing::warn!(?e, "gps sampler thread panicked during shutdown"),
            }
        }
    }
}
