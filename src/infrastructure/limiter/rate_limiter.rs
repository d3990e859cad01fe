use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Admission decision for a single request attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allowed,
    Denied,
}

impl Admission {
    pub fn is_denied(self) -> bool {
        matches!(self, Admission::Denied)
    }
}

/// Sliding-window request limiter keyed by client address.
///
/// Each address maps to the ordered instants of its admitted attempts inside
/// the trailing window, stored directly in the map. On every call the window
/// is pruned, then the count is checked against capacity; a denial leaves the
/// history untouched. Bursts are bounded by count-in-window, not by a refill
/// rate.
///
/// Constructed once per process and injected wherever admission is decided.
pub struct SlidingWindowLimiter {
    windows: DashMap<String, Vec<Instant>>,
    window: Duration,
    capacity: usize,
}

impl SlidingWindowLimiter {
    pub fn new(window: Duration, capacity: usize) -> Self {
        SlidingWindowLimiter {
            windows: DashMap::new(),
            window,
            capacity,
        }
    }

    /// Decides admission for `client_addr` at `now`. The prune-check-append
    /// sequence runs while the map entry is held, so two concurrent requests
    /// can never both take the last remaining slot, and a concurrent sweep
    /// can never detach a window mid-decision.
    pub fn admit(&self, client_addr: &str, now: Instant) -> Admission {
        let mut attempts = self.windows.entry(client_addr.to_string()).or_default();

        attempts.retain(|attempt| now.duration_since(*attempt) < self.window);

        if attempts.len() >= self.capacity {
            return Admission::Denied;
        }

        attempts.push(now);
        Admission::Allowed
    }

    /// Clears all tracked history. Test isolation only, not a request-path
    /// operation.
    pub fn reset(&self) {
        self.windows.clear();
    }

    /// Drops addresses whose recorded attempts have all left the window.
    /// Purely a memory bound; admission decisions are unchanged because
    /// `admit` prunes expired attempts anyway.
    pub fn sweep_expired(&self, now: Instant) {
        self.windows.retain(|_, attempts| {
            attempts.retain(|attempt| now.duration_since(*attempt) < self.window);
            !attempts.is_empty()
        });
    }

    /// Number of client addresses currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }
}
