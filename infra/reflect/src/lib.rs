//! Memoized type discovery.
//!
//! Discovering "all types carrying marker M within scope S" is expensive, so this crate puts a
//! bounded, time-expiring cache in front of a pluggable [`TypeScanner`].
//!
//! # Core Features
//!
//! - **Keyed Memoization**: Queries are keyed by value; equal keys share one cached [`TypeSet`].
//! - **Bounded & Expiring**: LRU eviction at a configurable size, expire-after-write TTL.
//! - **Load Coalescing**: Concurrent misses on the same key run a single scan.
//! - **No Negative Caching**: A failed scan is returned to every waiter and retried next time.
//!
//! # Examples
//!
//! ```rust
//! use modwire_reflect::{ReflectError, TypeCatalog, TypeInfo, TypeQueryCache};
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), ReflectError> {
//! let catalog = TypeCatalog::new()
//!     .with(TypeInfo::new("app::modules::Metrics").marker("modwire::module"))
//!     .with(TypeInfo::new("app::modules::Storage").marker("modwire::module"));
//!
//! let cache = TypeQueryCache::builder()
//!     .scanner(catalog)
//!     .max_capacity(100)
//!     .time_to_live(Duration::from_secs(60))
//!     .build()?;
//!
//! let first = cache.lookup_by_annotation("modwire::module", "app::modules")?;
//! let again = cache.lookup_by_annotation("modwire::module", "app::modules")?;
//! assert_eq!(first.len(), 2);
//! assert!(std::sync::Arc::ptr_eq(&first, &again));
//! # Ok(())
//! # }
//! ```

mod cache;
mod error;
mod scanner;
mod types;

pub use cache::{NoScanner, TypeQueryCache, TypeQueryCacheBuilder, WithScanner};
pub use error::{ReflectError, ReflectErrorExt};
pub use scanner::{ScanError, ScanErrorExt, TypeCatalog, TypeInfo, TypeScanner};
pub use types::{AnnotationQuery, MarkerId, SupertypeQuery, TypeName, TypeSet};
