//! Fluent construction of [`Cache`] instances.
//!
//! Every cache goes through [`CacheBuilder`], which validates the
//! configuration once so the engine itself never has to.
//!
//! ## Example
//!
//! ```rust
//! use evictkit::builder::CacheBuilder;
//! use evictkit::entry::TimeUnit;
//! use evictkit::policy::{CachePolicy, ExpireMode};
//!
//! let mut cache = CacheBuilder::new()
//!     .policy(CachePolicy::Time)
//!     .capacity(100)
//!     .expire_after(30, TimeUnit::Seconds)
//!     .expire_mode(ExpireMode::AfterAccess)
//!     .metrics(true)
//!     .build::<u64, String>()
//!     .unwrap();
//!
//! cache.insert(1, "hello".to_string()).unwrap();
//! assert_eq!(cache.get(&1), Some(&"hello".to_string()));
//! assert_eq!(cache.metrics().unwrap().hits, 1);
//! ```
//!
//! ## Defaults
//!
//! | Option          | Default        |
//! |-----------------|----------------|
//! | policy          | LRU            |
//! | capacity        | 100            |
//! | fixed capacity  | `true`         |
//! | expire after    | 10 minutes     |
//! | expire mode     | `AfterWrite`   |
//! | metrics         | off            |
//! | seed            | OS entropy     |
//! | clock           | monotonic      |

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use tracing::debug;

use crate::cache::Cache;
use crate::entry::TimeUnit;
use crate::error::CacheError;
use crate::policy::time::{Clock, MonotonicClock};
use crate::policy::{CachePolicy, ExpireMode};

/// Plain-data cache configuration.
///
/// With the `serde` feature this can be read from a config file and handed
/// to [`CacheBuilder::from_config`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CacheConfig {
    pub policy: CachePolicy,
    pub capacity: usize,
    /// Growable caches are not supported; `false` fails the build.
    pub fixed_capacity: bool,
    pub expire_after_millis: i64,
    pub expire_mode: ExpireMode,
    pub metrics_enabled: bool,
    /// Seed for the Random policy's victim picker.
    pub seed: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            policy: CachePolicy::Lru,
            capacity: 100,
            fixed_capacity: true,
            expire_after_millis: TimeUnit::Minutes.to_millis(10),
            expire_mode: ExpireMode::AfterWrite,
            metrics_enabled: false,
            seed: None,
        }
    }
}

impl CacheConfig {
    /// Checks every option the engine relies on.
    ///
    /// # Errors
    ///
    /// [`CacheError::IllegalState`] naming the offending option.
    pub fn validate(&self) -> Result<(), CacheError> {
        if self.capacity < 1 {
            return Err(CacheError::illegal_state(format!(
                "capacity must be at least 1, got {}",
                self.capacity
            )));
        }
        if self.expire_after_millis < 0 {
            return Err(CacheError::illegal_state(format!(
                "expire time cannot be negative, got {}ms",
                self.expire_after_millis
            )));
        }
        if !self.fixed_capacity {
            return Err(CacheError::illegal_state(
                "growable capacity is not supported",
            ));
        }
        Ok(())
    }
}

/// Builder for [`Cache`].
#[derive(Clone)]
pub struct CacheBuilder {
    config: CacheConfig,
    clock: Option<Arc<dyn Clock>>,
}

impl CacheBuilder {
    pub fn new() -> Self {
        Self::from_config(CacheConfig::default())
    }

    /// Starts from an existing configuration.
    pub fn from_config(config: CacheConfig) -> Self {
        Self {
            config,
            clock: None,
        }
    }

    pub fn policy(mut self, policy: CachePolicy) -> Self {
        self.config.policy = policy;
        self
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    pub fn fixed_capacity(mut self, fixed: bool) -> Self {
        self.config.fixed_capacity = fixed;
        self
    }

    /// Cache-wide time-to-live for the Time policy, and the fallback for
    /// Expire entries.
    ///
    /// A negative amount fails the build, including sub-millisecond ones
    /// that truncate to zero.
    pub fn expire_after(mut self, time: i64, unit: TimeUnit) -> Self {
        let millis = unit.to_millis(time);
        self.config.expire_after_millis = if time < 0 { millis.min(-1) } else { millis };
        self
    }

    pub fn expire_mode(mut self, mode: ExpireMode) -> Self {
        self.config.expire_mode = mode;
        self
    }

    pub fn metrics(mut self, enabled: bool) -> Self {
        self.config.metrics_enabled = enabled;
        self
    }

    /// Makes Random eviction reproducible.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Replaces the monotonic clock, typically with a
    /// [`ManualClock`](crate::policy::time::ManualClock) in tests.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Validates the configuration and builds the cache.
    ///
    /// # Errors
    ///
    /// [`CacheError::IllegalState`] if the capacity is below one, the
    /// expire time is negative, or a growable capacity was requested.
    ///
    /// # Example
    ///
    /// ```rust
    /// use evictkit::builder::CacheBuilder;
    /// use evictkit::policy::CachePolicy;
    ///
    /// let cache = CacheBuilder::new()
    ///     .policy(CachePolicy::Random)
    ///     .capacity(8)
    ///     .seed(42)
    ///     .build::<u32, u32>()
    ///     .unwrap();
    /// assert_eq!(cache.capacity(), 8);
    ///
    /// assert!(CacheBuilder::new().fixed_capacity(false).build::<u32, u32>().is_err());
    /// ```
    pub fn build<K, V>(self) -> Result<Cache<K, V>, CacheError>
    where
        K: Eq + Hash + Clone,
    {
        self.config.validate()?;

        let clock = self.clock.unwrap_or_else(|| Arc::new(MonotonicClock));
        debug!(
            policy = %self.config.policy,
            capacity = self.config.capacity,
            expire_after_millis = self.config.expire_after_millis,
            expire_mode = ?self.config.expire_mode,
            metrics = self.config.metrics_enabled,
            "building cache"
        );
        Ok(Cache::from_config(&self.config, clock))
    }
}

impl Default for CacheBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CacheBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheBuilder")
            .field("config", &self.config)
            .field("custom_clock", &self.clock.is_some())
            .finish()
    }
}
