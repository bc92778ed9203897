//! Fixed-window rate limiting for the contact endpoint.
use std::sync::Mutex;
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

struct WindowEntry {
    count: u32,
    reset_at: Instant,
}

/// Per-client fixed-window request counter.
///
/// The first request from a client opens a window; requests past the limit are
/// rejected until the window expires, at which point the next request opens a
/// fresh one. Expired entries are overwritten in place, there is no sweeper.
///
/// The map lives behind a [`Mutex`] so the limiter can be shared across the
/// server's worker threads.
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    entries: Mutex<FxHashMap<String, WindowEntry>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            entries: Mutex::new(FxHashMap::default()),
        }
    }

    /// Records a request for `key` and returns whether it is allowed.
    ///
    /// Rejected requests are not counted, so hammering the endpoint does not
    /// extend the window.
    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> bool {
        // A poisoned lock only means another thread panicked mid-update; the
        // map itself is still usable.
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        match entries.get_mut(key) {
            Some(entry) if now <= entry.reset_at => {
                if entry.count >= self.max_requests {
                    return false;
                }
                entry.count += 1;
                true
            }
            _ => {
                entries.insert(
                    key.to_string(),
                    WindowEntry {
                        count: 1,
                        reset_at: now + self.window,
                    },
                );
                true
            }
        }
    }
}
