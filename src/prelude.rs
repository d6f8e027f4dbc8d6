pub use crate::builder::{CacheBuilder, CacheConfig};
pub use crate::cache::{Admission, Cache};
pub use crate::entry::{CacheEntry, EntryMeta, TimeUnit};
pub use crate::error::CacheError;
pub use crate::metrics::{CacheMetricsSnapshot, MetricType};
pub use crate::policy::time::{Clock, ManualClock, MonotonicClock};
pub use crate::policy::{CachePolicy, ExpireMode};
#[cfg(feature = "concurrency")]
pub use crate::sync::SyncCache;
pub use crate::traits::{CoreCache, OrderedCache, ReadOnlyCache};
