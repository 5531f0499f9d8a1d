use chrono::{DateTime, Duration, Utc};

/// A single cached value with the time it was fetched.
///
/// The owner decides freshness: callers pass the TTL and the current time
/// to [`CachedValue::fresh`], and call [`CachedValue::invalidate`] after
/// any write that makes the value stale.
#[derive(Debug, Clone)]
pub struct CachedValue<T> {
    entry: Option<CacheEntry<T>>,
}

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    fetched_at: DateTime<Utc>,
}

impl<T> Default for CachedValue<T> {
    fn default() -> Self {
        Self { entry: None }
    }
}

impl<T: Clone> CachedValue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value if it was fetched less than `ttl` before `now`
    pub fn fresh(&self, ttl: Duration, now: DateTime<Utc>) -> Option<T> {
        self.entry
            .as_ref()
            .filter(|entry| now - entry.fetched_at < ttl)
            .map(|entry| entry.value.clone())
    }

    pub fn store(&mut self, value: T, fetched_at: DateTime<Utc>) {
        self.entry = Some(CacheEntry { value, fetched_at });
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.entry.as_ref().map(|entry| entry.fetched_at)
    }
}
