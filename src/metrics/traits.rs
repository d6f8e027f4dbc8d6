//! # Metrics Trait Hierarchy
//!
//! Recording, snapshotting and export are kept apart so the cache engine only
//! ever talks to a recorder, and monitoring code only ever sees snapshots.
//!
//! ```text
//!   ┌─────────────────────────────┐
//!   │     CoreMetricsRecorder     │   written by Cache on every public call
//!   │  hit/miss/put/remove/       │
//!   │  eviction/clear             │
//!   └──────────────┬──────────────┘
//!                  │
//!        ┌─────────┴─────────┐
//!        ▼                   ▼
//!   ┌──────────┐      ┌──────────────┐
//!   │ Recorder │      │ CacheMetrics │
//!   │ (on/off) │ ───► │  (counters)  │
//!   └──────────┘      └──────┬───────┘
//!                            │ snapshot(len, capacity)
//!                            ▼
//!                ┌──────────────────────────────┐
//!                │ MetricsExporter<S>           │
//!                │ (production monitoring)      │
//!                └──────────────────────────────┘
//! ```

/// Counters every policy reports.
pub trait CoreMetricsRecorder {
    fn record_hit(&mut self);
    fn record_miss(&mut self);
    fn record_put(&mut self);
    fn record_remove(&mut self);
    fn record_eviction(&mut self);
    fn record_clear(&mut self);
}

/// Reset counters between tests or benchmark iterations.
pub trait MetricsReset {
    fn reset_metrics(&mut self);
}

/// Export/publish metrics to production monitoring backends.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
