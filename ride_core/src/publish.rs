//! Non-blocking fan-out of estimates to transport tasks.
//!
//! Each subscriber gets its own bounded channel. `publish` never waits: a
//! full queue drops the estimate for that subscriber only, and a subscriber
//! whose receiver was dropped is pruned on the next publish.

use crossbeam_channel as xch;

use crate::types::Published;

#[derive(Debug, Default)]
pub struct EstimatePublisher {
    subs: Vec<xch::Sender<Published>>,
    published: u64,
    dropped: u64,
}

impl EstimatePublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber with a queue of `capacity` estimates (min 1).
    pub fn subscribe(&mut self, capacity: usize) -> xch::Receiver<Published> {
        let (tx, rx) = xch::bounded(capacity.max(1));
        self.subs.push(tx);
        tracing::debug!(subscribers = self.subs.len(), capacity, "subscriber added");
        rx
    }

    /// Hand one estimate to every live subscriber. Returns how many got it.
    pub fn publish(&mut self, item: Published) -> usize {
        self.published += 1;
        let mut delivered = 0;
        let mut dropped = 0;
        self.subs.retain(|tx| match tx.try_send(item) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(xch::TrySendError::Full(p)) => {
                dropped += 1;
                tracing::warn!(t_ms = p.estimate.timestamp_ms, "subscriber queue full, estimate dropped");
                true
            }
            Err(xch::TrySendError::Disconnected(_)) => {
                tracing::debug!("subscriber disconnected, pruning");
                false
            }
        });
        self.dropped += dropped;
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.subs.len()
    }

    /// Estimates handed to `publish` so far.
    pub fn published(&self) -> u64 {
        self.published
    }

    /// Per-subscriber deliveries lost to full queues.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
