use moka::future::Cache;

pub const DEFAULT_CAPACITY: u64 = 10_000;

/// Domain → catch-all verdict, bounded, shared by clones.
#[derive(Clone)]
pub struct CatchAllCache {
    inner: Cache<String, bool>,
}

impl CatchAllCache {
    pub fn new(capacity: u64) -> Self {
        Self {
            inner: Cache::new(capacity.max(1)),
        }
    }

    pub async fn get(&self, domain: &str) -> Option<bool> {
        self.inner.get(&domain.to_ascii_lowercase()).await
    }

    pub(crate) fn entries(&self) -> &Cache<String, bool> {
        &self.inner
    }
}

impl Default for CatchAllCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl std::fmt::Debug for CatchAllCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatchAllCache")
            .field("entries", &self.inner.entry_count())
            .finish()
    }
}
