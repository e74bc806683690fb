use chrono::NaiveDateTime;
use serde::Serialize;
use surftemp_parser::{GroundRecord, SatelliteRecord};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::daily::{daily_averages, DailyAverages, DailySource};
use crate::error::Result;
use crate::matcher::{MatchPolicy, SeriesMatcher};
use crate::metrics::{ErrorMetrics, RegressionSummary};
use crate::quality_filters::{run_pair_filters, run_series_filters, StageReport};
use crate::timestamp::{SkippedRecord, TimestampNormalizer};
use crate::types::{MatchSet, Observation, ObservationSeries};

/// Earliest and latest instant of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Timeframe {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Timeframe {
    pub fn of(series: &[Observation]) -> Option<Self> {
        let start = series.iter().map(Observation::timestamp).min()?;
        let end = series.iter().map(Observation::timestamp).max()?;
        Some(Self { start, end })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub match_policy: MatchPolicy,
    pub satellite_records: usize,
    pub satellite_skipped: usize,
    pub ground_records: usize,
    pub ground_skipped: usize,
    pub ground_after_filters: usize,
    pub candidate_pairs: usize,
    pub final_pairs: usize,
    pub pre_match_stages: Vec<StageReport>,
    pub post_match_stages: Vec<StageReport>,
    pub daily_days: usize,
    pub ground_timeframe: Option<Timeframe>,
}

#[derive(Debug, Clone)]
pub struct CorrelationOutput {
    pub matches: MatchSet,
    pub daily_averages: DailyAverages,
    /// Ground series after the pre-match stages, as matched against.
    pub ground_series: ObservationSeries,
    pub skipped_satellite: Vec<SkippedRecord>,
    pub skipped_ground: Vec<SkippedRecord>,
    pub summary: RunSummary,
}

impl CorrelationOutput {
    pub fn error_metrics(&self) -> Result<ErrorMetrics> {
        ErrorMetrics::compute(&self.matches)
    }

    pub fn regression(&self) -> Option<RegressionSummary> {
        RegressionSummary::fit(&self.matches)
    }
}

/// A validated configuration ready to run over any number of input pairs.
#[derive(Debug, Clone)]
pub struct CorrelationRun {
    config: EngineConfig,
    normalizer: TimestampNormalizer,
    matcher: SeriesMatcher,
}

impl CorrelationRun {
    /// Rejects invalid configuration before any input is touched.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let matcher = config.matcher()?;
        let normalizer = config.normalizer();
        Ok(Self {
            config,
            normalizer,
            matcher,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn execute(&self, satellite: &[SatelliteRecord], ground: &[GroundRecord]) -> CorrelationOutput {
        let satellite_norm = self.normalizer.normalize_satellite(satellite);
        let ground_norm = self.normalizer.normalize_ground(ground);
        let ground_timeframe = Timeframe::of(&ground_norm.series);

        let raw_daily = match self.config.daily_source {
            DailySource::Raw => Some(daily_averages(&ground_norm.series)),
            DailySource::Filtered => None,
        };

        let (filtered_ground, pre_match_stages) =
            run_series_filters(&self.config.pre_match_filters, ground_norm.series);

        let daily = raw_daily.unwrap_or_else(|| daily_averages(&filtered_ground));

        let candidates = self.matcher.match_series(&satellite_norm.series, &filtered_ground);
        let candidate_pairs = candidates.len();
        debug!(policy = %self.matcher.policy(), candidate_pairs, "matching complete");

        let (matches, post_match_stages) =
            run_pair_filters(&self.config.post_match_filters, candidates);

        let summary = RunSummary {
            match_policy: self.matcher.policy(),
            satellite_records: satellite.len(),
            satellite_skipped: satellite_norm.skipped.len(),
            ground_records: ground.len(),
            ground_skipped: ground_norm.skipped.len(),
            ground_after_filters: filtered_ground.len(),
            candidate_pairs,
            final_pairs: matches.len(),
            pre_match_stages,
            post_match_stages,
            daily_days: daily.len(),
            ground_timeframe,
        };

        info!(
            policy = %summary.match_policy,
            satellite = summary.satellite_records,
            ground = summary.ground_records,
            candidate_pairs = summary.candidate_pairs,
            final_pairs = summary.final_pairs,
            "correlation run finished"
        );

        CorrelationOutput {
            matches,
            daily_averages: daily,
            ground_series: filtered_ground,
            skipped_satellite: satellite_norm.skipped,
            skipped_ground: ground_norm.skipped,
            summary,
        }
    }
}
