use crate::metrics::snapshot::CacheMetricsSnapshot;
use crate::metrics::traits::{CoreMetricsRecorder, MetricsReset};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheMetrics {
    pub hits: u64,
    pub misses: u64,
    pub puts: u64,
    pub removes: u64,
    pub evictions: u64,
    pub clears: u64,
}

impl CacheMetrics {
    pub fn new() -> CacheMetrics {
        Self::default()
    }

    /// Captures the counters together with the cache's current gauges.
    pub fn snapshot(&self, len: usize, capacity: usize) -> CacheMetricsSnapshot {
        CacheMetricsSnapshot {
            hits: self.hits,
            misses: self.misses,
            puts: self.puts,
            removes: self.removes,
            evictions: self.evictions,
            clears: self.clears,
            size: len as u64,
            capacity: capacity as u64,
        }
    }
}

impl CoreMetricsRecorder for CacheMetrics {
    fn record_hit(&mut self) {
        self.hits += 1;
    }

    fn record_miss(&mut self) {
        self.misses += 1;
    }

    fn record_put(&mut self) {
        self.puts += 1;
    }

    fn record_remove(&mut self) {
        self.removes += 1;
    }

    fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    fn record_clear(&mut self) {
        self.clears += 1;
    }
}

impl MetricsReset for CacheMetrics {
    fn reset_metrics(&mut self) {
        *self = Self::default();
    }
}

/// Metrics sink chosen at construction. `Disabled` swallows every event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorder {
    Disabled,
    Enabled(CacheMetrics),
}

impl Recorder {
    pub fn new(enabled: bool) -> Self {
        if enabled {
            Recorder::Enabled(CacheMetrics::new())
        } else {
            Recorder::Disabled
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Recorder::Enabled(_))
    }

    pub fn counters(&self) -> Option<&CacheMetrics> {
        match self {
            Recorder::Enabled(metrics) => Some(metrics),
            Recorder::Disabled => None,
        }
    }

    #[inline]
    fn with(&mut self, f: impl FnOnce(&mut CacheMetrics)) {
        if let Recorder::Enabled(metrics) = self {
            f(metrics);
        }
    }
}

impl CoreMetricsRecorder for Recorder {
    fn record_hit(&mut self) {
        self.with(CacheMetrics::record_hit);
    }

    fn record_miss(&mut self) {
        self.with(CacheMetrics::record_miss);
    }

    fn record_put(&mut self) {
        self.with(CacheMetrics::record_put);
    }

    fn record_remove(&mut self) {
        self.with(CacheMetrics::record_remove);
    }

    fn record_eviction(&mut self) {
        self.with(CacheMetrics::record_eviction);
    }

    fn record_clear(&mut self) {
        self.with(CacheMetrics::record_clear);
    }
}

impl MetricsReset for Recorder {
    fn reset_metrics(&mut self) {
        self.with(MetricsReset::reset_metrics);
    }
}
