use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Point-in-time copy of a cache's counters and gauges.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheMetricsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub puts: u64,
    pub removes: u64,
    pub evictions: u64,
    pub clears: u64,

    // gauges captured at snapshot time
    pub size: u64,
    pub capacity: u64,
}

impl CacheMetricsSnapshot {
    pub fn get(&self, metric: MetricType) -> u64 {
        match metric {
            MetricType::Hits => self.hits,
            MetricType::Misses => self.misses,
            MetricType::Puts => self.puts,
            MetricType::Removes => self.removes,
            MetricType::Evictions => self.evictions,
            MetricType::Clears => self.clears,
            MetricType::Size => self.size,
            MetricType::Capacity => self.capacity,
        }
    }

    /// Metric name → value for every [`MetricType`].
    pub fn to_map(&self) -> BTreeMap<&'static str, u64> {
        MetricType::ALL
            .iter()
            .map(|metric| (metric.name(), self.get(*metric)))
            .collect()
    }

    /// `hits / (hits + misses)`, or `0.0` before any lookup.
    pub fn hit_ratio(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}

/// Identifier of a single metric in the query surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricType {
    Hits,
    Misses,
    Puts,
    Removes,
    Evictions,
    Clears,
    Size,
    Capacity,
}

impl MetricType {
    pub const ALL: [MetricType; 8] = [
        MetricType::Hits,
        MetricType::Misses,
        MetricType::Puts,
        MetricType::Removes,
        MetricType::Evictions,
        MetricType::Clears,
        MetricType::Size,
        MetricType::Capacity,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MetricType::Hits => "hits",
            MetricType::Misses => "misses",
            MetricType::Puts => "puts",
            MetricType::Removes => "removes",
            MetricType::Evictions => "evictions",
            MetricType::Clears => "clears",
            MetricType::Size => "size",
            MetricType::Capacity => "capacity",
        }
    }

    /// Gauges describe current state; everything else only grows.
    pub fn is_gauge(self) -> bool {
        matches!(self, MetricType::Size | MetricType::Capacity)
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMetric(pub String);

impl fmt::Display for UnknownMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown metric: {}", self.0)
    }
}

impl std::error::Error for UnknownMetric {}

impl FromStr for MetricType {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricType::ALL
            .into_iter()
            .find(|metric| metric.name() == s)
            .ok_or_else(|| UnknownMetric(s.to_string()))
    }
}
