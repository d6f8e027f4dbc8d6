//! evictkit: a bounded in-process key-value cache with pluggable eviction
//! policies.
//!
//! One engine, ten policies. Each [`CachePolicy`] selects a strategy row
//! (order layout, read effect, write effect, overflow rule) over the same
//! [`OrderedStore`](store::OrderedStore), so every policy shares one
//! contract: `get`, `put`, `remove`, `peek`/`pop` at either end of the
//! order, snapshots, equality and rendering.
//!
//! ```
//! use evictkit::prelude::*;
//!
//! let mut cache = CacheBuilder::new()
//!     .policy(CachePolicy::Priority)
//!     .capacity(2)
//!     .build::<&str, u32>()
//!     .unwrap();
//!
//! cache.put(CacheEntry::priority("index", 1, 10)).unwrap();
//! cache.put(CacheEntry::priority("thumb", 2, 1)).unwrap();
//!
//! // Full: a newcomer must outrank the lowest-ranked entry.
//! let outcome = cache.put(CacheEntry::priority("tmp", 3, 0)).unwrap();
//! assert!(!outcome.is_admitted());
//! assert_eq!(cache.keys(), vec!["index", "thumb"]);
//! ```

pub mod builder;
pub mod cache;
pub mod ds;
pub mod entry;
pub mod error;
pub mod metrics;
pub mod policy;
pub mod prelude;
pub mod store;
#[cfg(feature = "concurrency")]
pub mod sync;
pub mod traits;

pub use crate::builder::{CacheBuilder, CacheConfig};
pub use crate::cache::{Admission, Cache};
pub use crate::entry::{CacheEntry, EntryKind, EntryMeta, TimeUnit};
pub use crate::error::{CacheError, InvariantError};
pub use crate::metrics::{CacheMetricsSnapshot, MetricType};
pub use crate::policy::{CachePolicy, ExpireMode};
#[cfg(feature = "concurrency")]
pub use crate::sync::SyncCache;
