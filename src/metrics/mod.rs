pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

pub use exporter::PrometheusTextExporter;
pub use metrics_impl::{CacheMetrics, Recorder};
pub use snapshot::{CacheMetricsSnapshot, MetricType, UnknownMetric};
pub use traits::{CoreMetricsRecorder, MetricsExporter, MetricsReset};
