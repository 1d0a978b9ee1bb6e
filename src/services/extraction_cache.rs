use std::collections::HashMap;
use std::future::Future;

use serde::Serialize;

pub const DEFAULT_CACHE_CAPACITY: usize = 128;

/// What a deep scrape of one URL produced: the canonical section text and,
/// when the summary call succeeded, a short page summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeepScrapeRecord {
    pub formatted_text: String,
    pub summary: Option<String>,
}

/// Bounded memo of deep scrape results, keyed by the exact URL string.
///
/// Keys are compared verbatim: two spellings of the same page are two
/// entries. Entries never expire; the least recently used one is dropped
/// when the cache is full.
#[derive(Debug)]
pub struct ExtractionCache {
    entries: HashMap<String, DeepScrapeRecord>,
    // Least recently used first.
    recency: Vec<String>,
    capacity: usize,
}

impl Default for ExtractionCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl ExtractionCache {
    pub fn new(capacity: usize) -> Self {
        ExtractionCache {
            entries: HashMap::with_capacity(capacity),
            recency: Vec::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&mut self, url: &str) -> Option<DeepScrapeRecord> {
        match self.entries.get(url) {
            Some(record) => {
                let record = record.clone();
                self.touch(url);
                Some(record)
            }
            None => None,
        }
    }

    pub fn insert(&mut self, url: &str, record: DeepScrapeRecord) {
        let is_new_key = self.entries.insert(url.to_string(), record).is_none();

        if is_new_key && self.entries.len() > self.capacity {
            let evicted = self.recency.remove(0);
            self.entries.remove(&evicted);
            log::info!("Evicted cached extraction for {}", evicted);
        }

        self.touch(url);
    }

    /// Return the cached record for `url`, or run `compute` and cache its
    /// result. A hit never invokes `compute`; a failed computation is not
    /// cached, so the next caller retries it.
    pub async fn get_or_compute<F, Fut>(&mut self, url: &str, compute: F) -> Option<DeepScrapeRecord>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<DeepScrapeRecord>>,
    {
        if let Some(record) = self.get(url) {
            log::info!("Deep scrape cache hit for {}", url);
            return Some(record);
        }

        match compute().await {
            Some(record) => {
                self.insert(url, record.clone());
                Some(record)
            }
            None => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn touch(&mut self, url: &str) {
        if let Some(position) = self.recency.iter().position(|key| key == url) {
            self.recency.remove(position);
        }
        self.recency.push(url.to_string());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::{DeepScrapeRecord, ExtractionCache};

    fn record(text: &str) -> DeepScrapeRecord {
        DeepScrapeRecord {
            formatted_text: text.to_string(),
            summary: None,
        }
    }

    #[tokio::test]
    async fn cache_hit_skips_recompute() {
        let mut cache = ExtractionCache::default();
        let calls = AtomicUsize::new(0);
        let calls = &calls;

        let first = cache
            .get_or_compute("https://acme.example", || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Some(record("extracted"))
            })
            .await;
        let second = cache
            .get_or_compute("https://acme.example", || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Some(record("recomputed"))
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
        assert_eq!(first.unwrap().formatted_text, "extracted");
    }

    #[tokio::test]
    async fn failed_computations_are_not_cached() {
        let mut cache = ExtractionCache::default();

        let failed = cache
            .get_or_compute("https://acme.example", || async { None })
            .await;
        assert_eq!(failed, None);
        assert!(cache.is_empty());

        let retried = cache
            .get_or_compute("https://acme.example", || async { Some(record("extracted")) })
            .await;
        assert_eq!(retried.unwrap().formatted_text, "extracted");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn distinct_url_spellings_are_distinct_entries() {
        let mut cache = ExtractionCache::default();
        cache.insert("https://acme.example", record("no slash"));
        cache.insert("https://acme.example/", record("slash"));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("https://acme.example").unwrap().formatted_text, "no slash");
    }

    #[test]
    fn least_recently_used_entry_is_evicted() {
        let mut cache = ExtractionCache::new(2);
        cache.insert("a", record("a"));
        cache.insert("b", record("b"));

        // Reading "a" makes "b" the eviction candidate.
        assert!(cache.get("a").is_some());
        cache.insert("c", record("c"));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_none());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn overwriting_a_key_does_not_evict() {
        let mut cache = ExtractionCache::new(2);
        cache.insert("a", record("a"));
        cache.insert("b", record("b"));
        cache.insert("a", record("a2"));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a").unwrap().formatted_text, "a2");
        assert!(cache.get("b").is_some());
    }
}
