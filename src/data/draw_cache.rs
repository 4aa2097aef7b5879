use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::Session;
use crate::models::DrawHistory;

/// Cache key: dataset id plus the view parameters that shaped the rows.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct DrawCacheKey {
    pub dataset_id: String,
    pub window_days: Option<u32>,
    pub session: Option<Session>,
}

impl DrawCacheKey {
    pub fn full(dataset_id: &str) -> Self {
        DrawCacheKey {
            dataset_id: dataset_id.to_string(),
            window_days: None,
            session: None,
        }
    }

    pub fn view(dataset_id: &str, window_days: Option<u32>, session: Option<Session>) -> Self {
        DrawCacheKey {
            dataset_id: dataset_id.to_string(),
            window_days,
            session,
        }
    }
}

/// Process-wide cache of derived draw views.
///
/// Explicit get/store/invalidate rather than implicit memoization, so
/// callers (and tests) control exactly when a view is recomputed. The only
/// invalidation path is the explicit one; there is no background refresh.
pub struct DrawCache {
    cache: Arc<Mutex<HashMap<DrawCacheKey, Arc<DrawHistory>>>>,
}

impl Default for DrawCache {
    fn default() -> Self {
        Self {
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Clone for DrawCache {
    fn clone(&self) -> Self {
        Self {
            // Clone the Arc, not the HashMap - this shares the cache!
            cache: Arc::clone(&self.cache),
        }
    }
}

impl DrawCache {
    pub fn get(&self, key: &DrawCacheKey) -> Option<Arc<DrawHistory>> {
        self.cache
            .lock()
            .ok()
            .and_then(|cache| cache.get(key).map(Arc::clone))
    }

    pub fn store(&self, key: DrawCacheKey, history: DrawHistory) -> Arc<DrawHistory> {
        let entry = Arc::new(history);
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, Arc::clone(&entry));
        }
        entry
    }

    /// Cached view if present, else build, store and return it.
    /// The builder runs outside the lock.
    pub fn get_or_insert_with(
        &self,
        key: &DrawCacheKey,
        build: impl FnOnce() -> DrawHistory,
    ) -> Arc<DrawHistory> {
        if let Some(hit) = self.get(key) {
            log::debug!("Draw cache HIT for {:?}", key);
            return hit;
        }
        log::debug!("Draw cache MISS for {:?}", key);
        self.store(key.clone(), build())
    }

    /// Drop one cached view. Returns whether anything was evicted.
    pub fn invalidate(&self, key: &DrawCacheKey) -> bool {
        self.cache
            .lock()
            .ok()
            .map(|mut cache| cache.remove(key).is_some())
            .unwrap_or(false)
    }

    /// Drop everything, e.g. after a forced re-fetch.
    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(days: Option<u32>) -> DrawCacheKey {
        DrawCacheKey::view("test-id", days, None)
    }

    #[test]
    fn test_miss_then_hit() {
        let cache = DrawCache::default();
        assert!(cache.get(&key(Some(30))).is_none());

        cache.store(key(Some(30)), DrawHistory::new("view", 1.0, vec![]));
        let hit = cache.get(&key(Some(30))).unwrap();
        assert_eq!(hit.name, "view");
        // A different parameter set is a different entry
        assert!(cache.get(&key(Some(7))).is_none());
    }

    #[test]
    fn test_get_or_insert_builds_once() {
        let cache = DrawCache::default();
        let mut builds = 0;
        for _ in 0..3 {
            cache.get_or_insert_with(&key(None), || {
                builds += 1;
                DrawHistory::default()
            });
        }
        assert_eq!(builds, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate_forces_rebuild() {
        let cache = DrawCache::default();
        cache.store(key(None), DrawHistory::default());
        assert!(cache.invalidate(&key(None)));
        assert!(!cache.invalidate(&key(None)));
        assert!(cache.get(&key(None)).is_none());
    }

    #[test]
    fn test_clones_share_storage() {
        let cache = DrawCache::default();
        let shared = cache.clone();
        cache.store(key(None), DrawHistory::default());
        assert!(shared.get(&key(None)).is_some());
        shared.clear();
        assert!(cache.is_empty());
    }
}
