use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::time::{ Duration, Instant };

/// Requests admitted per client within one window.
pub const RATE_LIMIT: u32 = 20;
/// Length of the fixed window.
pub const RATE_WINDOW: Duration = Duration::from_secs(60);
/// Bucket shared by every client that arrives without an address.
pub const ANONYMOUS_KEY: &str = "anonymous";
/// Once this many clients are tracked, expired records are dropped before the
/// next admission.
pub const SWEEP_THRESHOLD: usize = 10_000;

// Rate limit entry - tracks requests per client key
#[derive(Debug, Clone, Copy)]
pub struct RateRecord {
    pub count: u32,
    pub window_reset_at: Instant,
}

/// Fixed-window counter keyed by client address. Lives in process memory only,
/// so each instance of the service keeps its own view.
#[derive(Debug, Default)]
pub struct RateLimiter {
    records: DashMap<String, RateRecord>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn admit(&self, client_key: &str) -> bool {
        self.admit_at(client_key, Instant::now())
    }

    /// Decide for `client_key` as if the current time were `now`.
    /// The entry guard holds the shard lock for the whole read-modify-write.
    pub fn admit_at(&self, client_key: &str, now: Instant) -> bool {
        // must run before the entry guard is taken, retain locks every shard
        if self.records.len() >= SWEEP_THRESHOLD {
            self.sweep_expired(now);
        }

        let fresh = RateRecord {
            count: 1,
            window_reset_at: now + RATE_WINDOW,
        };

        let mut occupied = match self.records.entry(client_key.to_string()) {
            Entry::Occupied(occupied) => occupied,
            Entry::Vacant(vacant) => {
                vacant.insert(fresh);
                return true;
            }
        };
        let record = occupied.get_mut();

        // window expired? start a new one
        if now > record.window_reset_at {
            *record = fresh;
            return true;
        }

        if record.count < RATE_LIMIT {
            record.count += 1;
            return true;
        }

        false
    }

    /// Drop every record whose window has closed by `now`. Such a record would
    /// be replaced by a fresh one on its next admission anyway.
    pub fn sweep_expired(&self, now: Instant) -> usize {
        let before = self.records.len();
        self.records.retain(|_, record| now <= record.window_reset_at);
        before.saturating_sub(self.records.len())
    }

    pub fn record(&self, client_key: &str) -> Option<RateRecord> {
        self.records.get(client_key).map(|r| *r)
    }

    pub fn tracked_clients(&self) -> usize {
        self.records.len()
    }
}
