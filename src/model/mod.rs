// Re-export all model types from submodules.

pub use app::{AppView, InputMode};
pub use docker::{
    ContainerInfo, ContainerStats, ImageInfo, ListUIState, NetworkInfo, StoppedContainerInfo,
    VolumeContainer, VolumeInfo,
    PREDEFINED_NETWORKS, dedup_by_key, is_predefined_network,
};
pub use metrics::{AggregateMetrics, MetricsHistory, MetricsSample, DEFAULT_HISTORY_CAPACITY};

mod app;
mod docker;
mod metrics;
