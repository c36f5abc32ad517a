/*!
 * Bounded LRU memoization for correction results.
 *
 * Keys combine the language route, the trimmed cue text, and a digest of the
 * context window, so the same sentence in different surroundings is a
 * different entry. Each language route has its own capacity.
 */

use std::collections::{HashMap, VecDeque};

use parking_lot::Mutex;
use sha2::{Digest, Sha256};

use crate::correction::language::Language;

/// Entries kept per Chinese route
pub const CHINESE_CACHE_CAPACITY: usize = 1024;

/// Entries kept per English route
pub const ENGLISH_CACHE_CAPACITY: usize = 512;

/// Cache key: language route, trimmed text, and context digest
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    language: Language,
    text: String,
    context_digest: [u8; 32],
}

impl CacheKey {
    pub fn new(language: Language, text: &str, context: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(context.as_bytes());
        CacheKey {
            language,
            text: text.trim().to_string(),
            context_digest: hasher.finalize().into(),
        }
    }
}

/// Hit and miss counters, snapshot for the run report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

struct LruShard {
    capacity: usize,
    entries: HashMap<CacheKey, String>,
    // Recency order, most recent at the back
    order: VecDeque<CacheKey>,
}

impl LruShard {
    fn new(capacity: usize) -> Self {
        LruShard {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    fn get(&mut self, key: &CacheKey) -> Option<String> {
        let value = self.entries.get(key).cloned()?;
        self.touch(key);
        Some(value)
    }

    fn insert(&mut self, key: CacheKey, value: String) {
        if self.entries.insert(key.clone(), value).is_some() {
            self.touch(&key);
            return;
        }
        self.order.push_back(key);
        while self.entries.len() > self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.entries.remove(&evicted);
            } else {
                break;
            }
        }
    }

    fn touch(&mut self, key: &CacheKey) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            if let Some(k) = self.order.remove(pos) {
                self.order.push_back(k);
            }
        }
    }
}

/// Thread-safe correction cache with one LRU shard per language route
pub struct CorrectionCache {
    chinese: Mutex<LruShard>,
    english: Mutex<LruShard>,
    stats: Mutex<CacheStats>,
}

impl CorrectionCache {
    pub fn new() -> Self {
        Self::with_capacities(CHINESE_CACHE_CAPACITY, ENGLISH_CACHE_CAPACITY)
    }

    pub fn with_capacities(chinese: usize, english: usize) -> Self {
        CorrectionCache {
            chinese: Mutex::new(LruShard::new(chinese.max(1))),
            english: Mutex::new(LruShard::new(english.max(1))),
            stats: Mutex::new(CacheStats::default()),
        }
    }

    /// Look up a corrected text, counting the hit or miss.
    ///
    /// Passthrough cues are never cached; lookups for them always miss
    /// without touching the counters.
    pub fn get(&self, key: &CacheKey) -> Option<String> {
        let shard = match key.language {
            Language::Chinese => &self.chinese,
            Language::English => &self.english,
            Language::Passthrough => return None,
        };
        let result = shard.lock().get(key);
        let mut stats = self.stats.lock();
        if result.is_some() {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        result
    }

    pub fn insert(&self, key: CacheKey, value: String) {
        let shard = match key.language {
            Language::Chinese => &self.chinese,
            Language::English => &self.english,
            Language::Passthrough => return,
        };
        shard.lock().insert(key, value);
    }

    pub fn stats(&self) -> CacheStats {
        *self.stats.lock()
    }
}

impl Default for CorrectionCache {
    fn default() -> Self {
        Self::new()
    }
}
