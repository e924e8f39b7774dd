//! Port for caching rendered anonymous pages.
//!
//! Write services clear the whole cache after every successful write, so
//! adapters only need whole-cache invalidation. Each clear starts a new
//! [`CacheGeneration`]; a page rendered under an older generation is never
//! stored, so a render racing a write cannot repopulate the cache with the
//! pre-write page.
use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use super::define_port_error;

/// Cache key for a rendered page: the request path plus query string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageCacheKey(String);

impl PageCacheKey {
    /// Construct a key after checking it is a trimmed absolute path.
    ///
    /// # Examples
    /// ```
    /// use yatube::domain::ports::PageCacheKey;
    ///
    /// let key = PageCacheKey::new("/leo/?page=2").expect("valid key");
    /// assert_eq!(key.as_str(), "/leo/?page=2");
    /// assert!(PageCacheKey::new("leo").is_err());
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, PageCacheKeyValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(PageCacheKeyValidationError::Empty);
        }
        if raw.trim() != raw {
            return Err(PageCacheKeyValidationError::ContainsWhitespace);
        }
        if !raw.starts_with('/') {
            return Err(PageCacheKeyValidationError::NotAbsolute);
        }
        Ok(Self(raw))
    }

    /// Borrow the underlying key.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PageCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors returned when constructing [`PageCacheKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageCacheKeyValidationError {
    /// Key is empty after trimming whitespace.
    #[error("page cache key must not be empty")]
    Empty,
    /// Key contains leading or trailing whitespace.
    #[error("page cache key must not contain surrounding whitespace")]
    ContainsWhitespace,
    /// Key is not an absolute request path.
    #[error("page cache key must start with '/'")]
    NotAbsolute,
}

/// Invalidation epoch of a page cache, advanced by every clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CacheGeneration(u64);

impl CacheGeneration {
    /// Generation of a freshly built cache.
    pub const INITIAL: Self = Self(0);

    /// The generation following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for CacheGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

define_port_error! {
    /// Errors surfaced by page cache adapters.
    pub enum PageCacheError {
        /// Cache backend is unavailable.
        Backend { message: String } => "page cache backend failure: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageCache: Send + Sync {
    /// Read a cached page body.
    async fn get(&self, key: &PageCacheKey) -> Result<Option<String>, PageCacheError>;

    /// Current invalidation generation; read it before rendering a page.
    async fn generation(&self) -> Result<CacheGeneration, PageCacheError>;

    /// Store a page body rendered under `generation`.
    ///
    /// Returns `false` without storing when the cache has been cleared since
    /// `generation` was read.
    async fn put(
        &self,
        key: &PageCacheKey,
        body: String,
        generation: CacheGeneration,
    ) -> Result<bool, PageCacheError>;

    /// Drop every cached page and advance the generation.
    async fn clear(&self) -> Result<(), PageCacheError>;
}

/// Cache that never stores anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpPageCache;

#[async_trait]
impl PageCache for NoOpPageCache {
    async fn get(&self, _key: &PageCacheKey) -> Result<Option<String>, PageCacheError> {
        Ok(None)
    }

    async fn generation(&self) -> Result<CacheGeneration, PageCacheError> {
        Ok(CacheGeneration::INITIAL)
    }

    async fn put(
        &self,
        _key: &PageCacheKey,
        _body: String,
        _generation: CacheGeneration,
    ) -> Result<bool, PageCacheError> {
        Ok(false)
    }

    async fn clear(&self) -> Result<(), PageCacheError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Validates cache key parsing.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", PageCacheKeyValidationError::Empty)]
    #[case("   ", PageCacheKeyValidationError::Empty)]
    #[case(" /", PageCacheKeyValidationError::ContainsWhitespace)]
    #[case("index", PageCacheKeyValidationError::NotAbsolute)]
    fn invalid_keys_are_rejected(
        #[case] value: &str,
        #[case] expected: PageCacheKeyValidationError,
    ) {
        assert_eq!(PageCacheKey::new(value), Err(expected));
    }

    #[rstest]
    #[tokio::test]
    async fn no_op_cache_never_hits() {
        let cache = NoOpPageCache;
        let key = PageCacheKey::new("/").expect("key");
        let generation = cache.generation().await.expect("generation");
        let stored = cache
            .put(&key, "body".to_owned(), generation)
            .await
            .expect("put");
        assert!(!stored);
        assert_eq!(cache.get(&key).await.expect("get"), None);
    }

    #[rstest]
    fn generations_advance() {
        let next = CacheGeneration::INITIAL.next();
        assert_ne!(next, CacheGeneration::INITIAL);
        assert_eq!(next.to_string(), "1");
    }
}
