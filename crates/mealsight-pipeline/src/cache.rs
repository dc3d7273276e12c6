//! TTL cache for photo analyses
//!
//! An explicit component with injected capacity and TTL, owned by the
//! pipeline; tests construct isolated instances.

use mealsight_domain::FoodAnalysis;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};
use tracing::debug;

struct CacheEntry {
    analysis: FoodAnalysis,
    inserted_at: Instant,
}

/// Bounded TTL cache keyed by image-content hash
pub struct AnalysisCache {
    capacity: usize,
    ttl: Duration,
    entries: HashMap<u64, CacheEntry>,
}

impl AnalysisCache {
    /// Create a cache with the given capacity and entry lifetime
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity,
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Content hash for an image buffer, usable as a cache key
    pub fn key_for(bytes: &[u8]) -> u64 {
        let mut hasher = DefaultHasher::new();
        bytes.hash(&mut hasher);
        hasher.finish()
    }

    /// Look up a cached analysis; expired entries are evicted on access
    pub fn get(&mut self, key: u64) -> Option<FoodAnalysis> {
        match self.entries.get(&key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                debug!("Cache hit for key {:#x}", key);
                Some(entry.analysis.clone())
            }
            Some(_) => {
                debug!("Cache entry for key {:#x} expired", key);
                self.entries.remove(&key);
                None
            }
            None => None,
        }
    }

    /// Insert an analysis, evicting the oldest entry when at capacity
    pub fn insert(&mut self, key: u64, analysis: FoodAnalysis) {
        if self.capacity == 0 {
            return;
        }

        self.entries
            .retain(|_, entry| entry.inserted_at.elapsed() < self.ttl);

        if self.entries.len() >= self.capacity && !self.entries.contains_key(&key) {
            if let Some((&oldest, _)) = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.inserted_at)
            {
                self.entries.remove(&oldest);
            }
        }

        self.entries.insert(
            key,
            CacheEntry {
                analysis,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(name: &str) -> FoodAnalysis {
        FoodAnalysis::from_components(name, Vec::new())
    }

    #[test]
    fn test_round_trip() {
        let mut cache = AnalysisCache::new(10, Duration::from_secs(60));
        let key = AnalysisCache::key_for(b"image bytes");
        cache.insert(key, analysis("Soup"));

        let hit = cache.get(key).unwrap();
        assert_eq!(hit.dish_name, "Soup");
    }

    #[test]
    fn test_miss_for_unknown_key() {
        let mut cache = AnalysisCache::new(10, Duration::from_secs(60));
        assert!(cache.get(42).is_none());
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let mut cache = AnalysisCache::new(10, Duration::from_secs(0));
        let key = AnalysisCache::key_for(b"image");
        cache.insert(key, analysis("Soup"));
        assert!(cache.get(key).is_none());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut cache = AnalysisCache::new(2, Duration::from_secs(60));
        cache.insert(1, analysis("First"));
        cache.insert(2, analysis("Second"));
        cache.insert(3, analysis("Third"));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(1).is_none());
        assert!(cache.get(3).is_some());
    }

    #[test]
    fn test_distinct_content_distinct_keys() {
        assert_ne!(
            AnalysisCache::key_for(b"photo a"),
            AnalysisCache::key_for(b"photo b")
        );
    }
}
