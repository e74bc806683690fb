pub mod config;
pub mod daily;
pub mod error;
pub mod frame;
pub mod matcher;
pub mod metrics;
pub mod pipelines;
pub mod quality_filters;
pub mod stats;
pub mod timestamp;
pub mod types;

pub use config::EngineConfig;
pub use daily::{daily_averages, DailyAverages, DailySource};
pub use error::{EngineError, Result};
pub use matcher::{MatchPolicy, SeriesMatcher};
pub use metrics::{ErrorMetrics, RegressionSummary};
pub use pipelines::{CorrelationOutput, CorrelationRun, RunSummary, Timeframe};
pub use quality_filters::{PairFilter, SeriesFilter, StageReport};
pub use timestamp::{MinuteRounding, NormalizedSeries, SkippedRecord, TimestampNormalizer};
pub use types::{MatchSet, MatchedPair, Observation, ObservationSeries, ObservationSource};
