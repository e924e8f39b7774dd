//! In-process page cache for anonymous page renders.
//!
//! Entries expire after a fixed time-to-live measured with an injected
//! [`Clock`], so expiry can be driven deterministically in tests. Write
//! services clear the whole cache after each successful write; the
//! generation check and the insert share one lock, so a clear can never
//! interleave between them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::{CacheGeneration, PageCache, PageCacheError, PageCacheKey};

/// Default lifetime of a cached page.
pub const DEFAULT_PAGE_TTL: Duration = Duration::from_secs(20);

struct Entry {
    body: String,
    expires_at: DateTime<Utc>,
}

#[derive(Default)]
struct Pages {
    generation: CacheGeneration,
    entries: HashMap<PageCacheKey, Entry>,
}

/// Page cache held in process memory.
pub struct InMemoryPageCache {
    pages: Mutex<Pages>,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl InMemoryPageCache {
    /// Build a cache whose entries live for `ttl`.
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            pages: Mutex::new(Pages::default()),
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Pages>, PageCacheError> {
        self.pages
            .lock()
            .map_err(|_| PageCacheError::backend("page cache lock poisoned"))
    }
}

#[async_trait]
impl PageCache for InMemoryPageCache {
    async fn get(&self, key: &PageCacheKey) -> Result<Option<String>, PageCacheError> {
        let now = self.clock.utc();
        let mut pages = self.lock()?;
        match pages.entries.get(key) {
            Some(entry) if entry.expires_at > now => Ok(Some(entry.body.clone())),
            Some(_) => {
                pages.entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn generation(&self) -> Result<CacheGeneration, PageCacheError> {
        Ok(self.lock()?.generation)
    }

    async fn put(
        &self,
        key: &PageCacheKey,
        body: String,
        generation: CacheGeneration,
    ) -> Result<bool, PageCacheError> {
        let expires_at = self
            .clock
            .utc()
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let mut pages = self.lock()?;
        if pages.generation != generation {
            return Ok(false);
        }
        pages.entries.insert(key.clone(), Entry { body, expires_at });
        Ok(true)
    }

    async fn clear(&self) -> Result<(), PageCacheError> {
        let mut pages = self.lock()?;
        pages.entries.clear();
        pages.generation = pages.generation.next();
        Ok(())
    }
}
