//! Fetch-status cache
//!
//! Records, per resource, whether a request was already issued so that a
//! re-render or a repeated effect never fires a duplicate fetch.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    NotStarted,
    InFlight,
    Done,
    Failed,
}

/// Resources fetched by the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
    Profile,
    ReportHistory,
    Report(String),
}

#[derive(Debug, Clone)]
pub struct FetchCache<K> {
    entries: HashMap<K, FetchStatus>,
}

impl<K: Eq + Hash + Clone> FetchCache<K> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn status(&self, key: &K) -> FetchStatus {
        self.entries.get(key).copied().unwrap_or_default()
    }

    /// Marks `key` in flight and returns `true` only when it was never
    /// started. Fetches are retryless: a failed entry stays failed.
    pub fn try_begin(&mut self, key: K) -> bool {
        match self.status(&key) {
            FetchStatus::NotStarted => {
                self.entries.insert(key, FetchStatus::InFlight);
                true
            }
            _ => false,
        }
    }

    pub fn finish(&mut self, key: &K, ok: bool) {
        if let Some(status) = self.entries.get_mut(key) {
            *status = if ok {
                FetchStatus::Done
            } else {
                FetchStatus::Failed
            };
        }
    }

    pub fn forget(&mut self, key: &K) {
        self.entries.remove(key);
    }
}

impl<K: Eq + Hash + Clone> Default for FetchCache<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begins_only_once() {
        let mut cache = FetchCache::new();
        assert!(cache.try_begin(Resource::ReportHistory));
        assert!(!cache.try_begin(Resource::ReportHistory));
        assert_eq!(cache.status(&Resource::ReportHistory), FetchStatus::InFlight);

        cache.finish(&Resource::ReportHistory, true);
        assert_eq!(cache.status(&Resource::ReportHistory), FetchStatus::Done);
        assert!(!cache.try_begin(Resource::ReportHistory));
    }

    #[test]
    fn failures_are_not_retried() {
        let mut cache = FetchCache::new();
        assert!(cache.try_begin(Resource::Profile));
        cache.finish(&Resource::Profile, false);
        assert_eq!(cache.status(&Resource::Profile), FetchStatus::Failed);
        assert!(!cache.try_begin(Resource::Profile));
    }

    #[test]
    fn keys_are_independent() {
        let mut cache = FetchCache::new();
        assert!(cache.try_begin(Resource::Report("a".into())));
        assert!(cache.try_begin(Resource::Report("b".into())));
        cache.forget(&Resource::Report("a".into()));
        assert_eq!(
            cache.status(&Resource::Report("a".into())),
            FetchStatus::NotStarted
        );
    }

    #[test]
    fn finish_ignores_unknown_keys() {
        let mut cache: FetchCache<Resource> = FetchCache::new();
        cache.finish(&Resource::Profile, true);
        assert_eq!(cache.status(&Resource::Profile), FetchStatus::NotStarted);
    }
}
