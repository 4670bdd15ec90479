use crate::error::ReflectError;
use crate::scanner::TypeScanner;
use crate::types::{AnnotationQuery, MarkerId, SupertypeQuery, TypeName, TypeSet};
use modwire_domain::config::DiscoveryConfig;
use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use private::Sealed;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy)]
struct CacheBounds {
    max_capacity: u64,
    time_to_live: Duration,
}

impl Default for CacheBounds {
    fn default() -> Self {
        let defaults = DiscoveryConfig::default();
        Self { max_capacity: defaults.cache_capacity, time_to_live: defaults.cache_ttl() }
    }
}

#[derive(Debug)]
pub(crate) struct TypeQueryCacheInner {
    scanner: Arc<dyn TypeScanner>,
    annotations: Cache<AnnotationQuery, Arc<TypeSet>>,
    supertypes: Cache<SupertypeQuery, Arc<TypeSet>>,
    bounds: CacheBounds,
}

/// Memoizing front for a [`TypeScanner`].
///
/// Each query kind has its own bounded cache (LRU eviction, expire after write).
/// Concurrent misses on one key run a single scan whose result every waiter shares;
/// misses on different keys proceed independently. Failed scans are not cached.
#[derive(Debug, Clone)]
pub struct TypeQueryCache {
    inner: Arc<TypeQueryCacheInner>,
}

impl TypeQueryCache {
    /// Creates a new [`TypeQueryCacheBuilder`].
    pub fn builder() -> TypeQueryCacheBuilder {
        TypeQueryCacheBuilder::default()
    }

    /// Types within `scope` carrying `marker`.
    ///
    /// Repeated calls with an equal key return the same [`Arc`] until the entry
    /// expires or is evicted.
    ///
    /// # Errors
    /// Returns [`ReflectError::Scan`] if the scanner fails for this key.
    pub fn lookup_by_annotation(
        &self,
        marker: impl Into<MarkerId>,
        scope: impl AsRef<str>,
    ) -> Result<Arc<TypeSet>, ReflectError> {
        let query = AnnotationQuery::new(marker, scope);
        let scanner = &self.inner.scanner;

        self.inner
            .annotations
            .try_get_with_by_ref(&query, || {
                debug!(%query, "Executing annotation query");
                scanner.types_annotated_with(&query.scope, &query.marker).map(Arc::new)
            })
            .map_err(|source| ReflectError::Scan {
                source,
                context: Some(format!("Looking up {query}").into()),
            })
    }

    /// Types within `scope` that are subtypes of `supertype`.
    ///
    /// # Errors
    /// Returns [`ReflectError::Scan`] if the scanner fails for this key.
    pub fn lookup_by_supertype(
        &self,
        scope: impl AsRef<str>,
        supertype: impl Into<TypeName>,
    ) -> Result<Arc<TypeSet>, ReflectError> {
        let query = SupertypeQuery::new(scope, supertype);
        let scanner = &self.inner.scanner;

        self.inner
            .supertypes
            .try_get_with_by_ref(&query, || {
                debug!(%query, "Executing sub type query");
                scanner.subtypes_of(&query.scope, &query.supertype).map(Arc::new)
            })
            .map_err(|source| ReflectError::Scan {
                source,
                context: Some(format!("Looking up {query}").into()),
            })
    }

    /// Approximate number of cached entries across both query kinds.
    ///
    /// Call [`TypeQueryCache::run_pending_tasks`] first for an exact figure.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.annotations.entry_count() + self.inner.supertypes.entry_count()
    }

    /// Applies pending evictions and expirations.
    pub fn run_pending_tasks(&self) {
        self.inner.annotations.run_pending_tasks();
        self.inner.supertypes.run_pending_tasks();
    }

    /// Drops every cached result; the next lookups rescan.
    pub fn invalidate_all(&self) {
        self.inner.annotations.invalidate_all();
        self.inner.supertypes.invalidate_all();
    }

    /// Configured maximum number of entries per query kind.
    #[must_use]
    pub fn max_capacity(&self) -> u64 {
        self.inner.bounds.max_capacity
    }

    /// Configured time-to-live of a cached result.
    #[must_use]
    pub fn time_to_live(&self) -> Duration {
        self.inner.bounds.time_to_live
    }
}

#[derive(Debug, Default)]
pub struct NoScanner;
pub struct WithScanner(Arc<dyn TypeScanner>);

impl std::fmt::Debug for WithScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("WithScanner").field(&self.0).finish()
    }
}

mod private {
    pub trait Sealed {}
}
impl Sealed for NoScanner {}
impl Sealed for WithScanner {}

/// Type-safe builder for [`TypeQueryCache`]; a scanner must be supplied before `build`.
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct TypeQueryCacheBuilder<S: Sealed = NoScanner> {
    state: S,
    bounds: CacheBounds,
}

impl<S: Sealed> TypeQueryCacheBuilder<S> {
    /// Maximum number of entries kept per query kind.
    pub const fn max_capacity(mut self, max_capacity: u64) -> Self {
        self.bounds.max_capacity = max_capacity;
        self
    }

    /// Time after insertion when a cached result expires.
    pub const fn time_to_live(mut self, ttl: Duration) -> Self {
        self.bounds.time_to_live = ttl;
        self
    }

    /// Takes capacity and TTL from discovery settings.
    pub fn settings(self, config: &DiscoveryConfig) -> Self {
        self.max_capacity(config.cache_capacity).time_to_live(config.cache_ttl())
    }
}

impl TypeQueryCacheBuilder<NoScanner> {
    /// Sets the scanner queried on cache misses.
    pub fn scanner(self, scanner: impl TypeScanner + 'static) -> TypeQueryCacheBuilder<WithScanner> {
        self.shared_scanner(Arc::new(scanner))
    }

    /// Sets a scanner that is also held elsewhere.
    pub fn shared_scanner(self, scanner: Arc<dyn TypeScanner>) -> TypeQueryCacheBuilder<WithScanner> {
        TypeQueryCacheBuilder { state: WithScanner(scanner), bounds: self.bounds }
    }
}

impl TypeQueryCacheBuilder<WithScanner> {
    /// Consumes the builder and creates the cache.
    ///
    /// # Errors
    /// Returns [`ReflectError::Validation`] if the capacity or the TTL is zero.
    pub fn build(self) -> Result<TypeQueryCache, ReflectError> {
        let bounds = self.bounds;
        if bounds.max_capacity == 0 {
            return Err(ReflectError::Validation {
                message: "max_capacity must be greater than zero".into(),
                context: None,
            });
        }
        if bounds.time_to_live.is_zero() {
            return Err(ReflectError::Validation {
                message: "time_to_live must be greater than zero".into(),
                context: None,
            });
        }

        info!(
            max_capacity = bounds.max_capacity,
            ttl_ms = u64::try_from(bounds.time_to_live.as_millis()).unwrap_or(u64::MAX),
            "Type query cache initialized"
        );

        Ok(TypeQueryCache {
            inner: Arc::new(TypeQueryCacheInner {
                scanner: self.state.0,
                annotations: new_cache("annotation-queries", bounds),
                supertypes: new_cache("supertype-queries", bounds),
                bounds,
            }),
        })
    }
}

fn new_cache<K>(name: &str, bounds: CacheBounds) -> Cache<K, Arc<TypeSet>>
where
    K: std::hash::Hash + Eq + Send + Sync + 'static,
{
    Cache::builder()
        .name(name)
        .max_capacity(bounds.max_capacity)
        .time_to_live(bounds.time_to_live)
        .eviction_policy(EvictionPolicy::lru())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{TypeCatalog, TypeInfo};

    fn catalog() -> TypeCatalog {
        TypeCatalog::new()
            .with(TypeInfo::new("app::A").marker("module").supertype("core::Module"))
            .with(TypeInfo::new("app::B").marker("module"))
    }

    #[test]
    fn test_builder_rejects_zero_bounds() {
        let err = TypeQueryCache::builder().scanner(catalog()).max_capacity(0).build().unwrap_err();
        assert!(matches!(err, ReflectError::Validation { .. }));

        let err =
            TypeQueryCache::builder().scanner(catalog()).time_to_live(Duration::ZERO).build().unwrap_err();
        assert!(matches!(err, ReflectError::Validation { .. }));
    }

    #[test]
    fn test_builder_defaults_follow_discovery_settings() {
        let cache = TypeQueryCache::builder().scanner(catalog()).build().unwrap();
        assert_eq!(cache.max_capacity(), 1000);
        assert_eq!(cache.time_to_live(), Duration::from_secs(100));
    }

    #[test]
    fn test_lookups_return_catalog_results() {
        let cache = TypeQueryCache::builder().scanner(catalog()).build().unwrap();

        let modules = cache.lookup_by_annotation("module", ".*").unwrap();
        assert_eq!(modules.len(), 2);

        let subtypes = cache.lookup_by_supertype(".*", "core::Module").unwrap();
        assert_eq!(subtypes.len(), 1);
        assert!(subtypes.contains("app::A"));
    }

    #[test]
    fn test_invalidate_all_forces_rescan() {
        let cache = TypeQueryCache::builder().scanner(catalog()).build().unwrap();
        let first = cache.lookup_by_annotation("module", ".*").unwrap();
        cache.invalidate_all();
        let second = cache.lookup_by_annotation("module", ".*").unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first, second);
    }
}
