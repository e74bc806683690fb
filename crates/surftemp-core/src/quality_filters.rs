use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::stats::summarize;
use crate::types::{MatchSet, Observation};

pub const SIGMA_MULTIPLIER: f64 = 3.0;
pub const DEFAULT_MIN_VALID: f64 = 0.0;
pub const DEFAULT_MAX_VALID: f64 = 50.0;
pub const DEFAULT_JUMP_THRESHOLD: f64 = 10.0;

fn default_min_valid() -> f64 {
    DEFAULT_MIN_VALID
}

fn default_max_valid() -> f64 {
    DEFAULT_MAX_VALID
}

fn default_jump_threshold() -> f64 {
    DEFAULT_JUMP_THRESHOLD
}

/// Pre-match stage applied to the ground series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeriesFilter {
    PlausibilityRange {
        #[serde(default = "default_min_valid")]
        min_valid: f64,
        #[serde(default = "default_max_valid")]
        max_valid: f64,
    },
    SequentialJump {
        #[serde(default = "default_jump_threshold")]
        threshold: f64,
    },
    ThreeSigma,
}

impl SeriesFilter {
    pub fn plausibility_default() -> Self {
        SeriesFilter::PlausibilityRange {
            min_valid: DEFAULT_MIN_VALID,
            max_valid: DEFAULT_MAX_VALID,
        }
    }

    pub fn sequential_jump_default() -> Self {
        SeriesFilter::SequentialJump {
            threshold: DEFAULT_JUMP_THRESHOLD,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SeriesFilter::PlausibilityRange { .. } => "plausibility_range",
            SeriesFilter::SequentialJump { .. } => "sequential_jump",
            SeriesFilter::ThreeSigma => "three_sigma",
        }
    }

    /// Position in the fixed pre-match order.
    pub fn rank(&self) -> u8 {
        match self {
            SeriesFilter::PlausibilityRange { .. } => 0,
            SeriesFilter::SequentialJump { .. } => 1,
            SeriesFilter::ThreeSigma => 2,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            SeriesFilter::PlausibilityRange {
                min_valid,
                max_valid,
            } => {
                if !min_valid.is_finite() || !max_valid.is_finite() {
                    return Err(EngineError::InvalidConfiguration(format!(
                        "plausibility range bounds must be finite, got [{min_valid}, {max_valid}]"
                    )));
                }
                if min_valid > max_valid {
                    return Err(EngineError::InvalidConfiguration(format!(
                        "plausibility range min_valid {min_valid} exceeds max_valid {max_valid}"
                    )));
                }
                Ok(())
            }
            SeriesFilter::SequentialJump { threshold } => {
                if !threshold.is_finite() || threshold <= 0.0 {
                    return Err(EngineError::InvalidConfiguration(format!(
                        "sequential jump threshold must be positive, got {threshold}"
                    )));
                }
                Ok(())
            }
            SeriesFilter::ThreeSigma => Ok(()),
        }
    }

    /// Retention flag per input value, in input order.
    pub fn keep_mask(&self, values: &[f64]) -> Vec<bool> {
        match *self {
            SeriesFilter::PlausibilityRange {
                min_valid,
                max_valid,
            } => plausibility_mask(values, min_valid, max_valid),
            SeriesFilter::SequentialJump { threshold } => sequential_jump_mask(values, threshold),
            SeriesFilter::ThreeSigma => three_sigma_mask(values),
        }
    }

    pub fn apply_values(&self, values: &[f64]) -> Vec<f64> {
        let mask = self.keep_mask(values);
        values
            .iter()
            .zip(mask)
            .filter_map(|(value, keep)| keep.then_some(*value))
            .collect()
    }

    pub fn apply(&self, series: &[Observation]) -> Vec<Observation> {
        let values: Vec<f64> = series.iter().map(Observation::value).collect();
        let mask = self.keep_mask(&values);
        series
            .iter()
            .zip(mask)
            .filter_map(|(obs, keep)| keep.then(|| obs.clone()))
            .collect()
    }
}

/// Post-match stage applied to whole pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PairFilter {
    SatelliteThreeSigma,
    PairwiseDifference,
}

impl PairFilter {
    pub fn name(&self) -> &'static str {
        match self {
            PairFilter::SatelliteThreeSigma => "satellite_three_sigma",
            PairFilter::PairwiseDifference => "pairwise_difference",
        }
    }

    /// Position in the fixed post-match order.
    pub fn rank(&self) -> u8 {
        match self {
            PairFilter::SatelliteThreeSigma => 0,
            PairFilter::PairwiseDifference => 1,
        }
    }

    pub fn apply(&self, matches: &MatchSet) -> MatchSet {
        match self {
            PairFilter::SatelliteThreeSigma => satellite_three_sigma(matches),
            PairFilter::PairwiseDifference => pairwise_difference(matches),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub stage: &'static str,
    pub input: usize,
    pub kept: usize,
}

impl StageReport {
    pub fn removed(&self) -> usize {
        self.input - self.kept
    }
}

pub fn plausibility_mask(values: &[f64], min_valid: f64, max_valid: f64) -> Vec<bool> {
    values
        .iter()
        .map(|value| (min_valid..=max_valid).contains(value))
        .collect()
}

/// Positional scan: each value is compared with the last value that was kept,
/// not with its time neighbour. The first value is always kept.
pub fn sequential_jump_mask(values: &[f64], threshold: f64) -> Vec<bool> {
    let mut mask = Vec::with_capacity(values.len());
    let mut last_kept: Option<f64> = None;

    for &value in values {
        let keep = match last_kept {
            Some(previous) => (value - previous).abs() <= threshold,
            None => true,
        };
        if keep {
            last_kept = Some(value);
        }
        mask.push(keep);
    }

    mask
}

/// Keeps values within three population standard deviations of the mean.
/// A degenerate sample (fewer than two values, zero spread) passes through.
pub fn three_sigma_mask(values: &[f64]) -> Vec<bool> {
    let bounds = summarize(values).and_then(|summary| summary.sigma_bounds(SIGMA_MULTIPLIER));
    match bounds {
        Some((lower, upper)) => values
            .iter()
            .map(|value| (lower..=upper).contains(value))
            .collect(),
        None => vec![true; values.len()],
    }
}

pub fn satellite_three_sigma(matches: &MatchSet) -> MatchSet {
    let mask = three_sigma_mask(&matches.satellite_values());
    matches.select(&mask)
}

/// Keeps pairs with `|satellite - ground| <= 3 * sd(|satellite - ground|)`.
/// The threshold is not offset by the mean difference.
pub fn pairwise_difference(matches: &MatchSet) -> MatchSet {
    let differences: Vec<f64> = matches.iter().map(|pair| pair.abs_difference()).collect();
    let spread = summarize(&differences).filter(|summary| !summary.is_degenerate());

    match spread {
        Some(summary) => {
            let limit = SIGMA_MULTIPLIER * summary.std_dev;
            let mask: Vec<bool> = differences.iter().map(|d| *d <= limit).collect();
            matches.select(&mask)
        }
        None => matches.clone(),
    }
}

pub fn run_series_filters(
    filters: &[SeriesFilter],
    series: Vec<Observation>,
) -> (Vec<Observation>, Vec<StageReport>) {
    let mut current = series;
    let mut reports = Vec::with_capacity(filters.len());

    for filter in filters {
        let input = current.len();
        current = filter.apply(&current);
        debug!(stage = filter.name(), input, kept = current.len(), "ground filter stage");
        reports.push(StageReport {
            stage: filter.name(),
            input,
            kept: current.len(),
        });
    }

    (current, reports)
}

pub fn run_pair_filters(filters: &[PairFilter], matches: MatchSet) -> (MatchSet, Vec<StageReport>) {
    let mut current = matches;
    let mut reports = Vec::with_capacity(filters.len());

    for filter in filters {
        let input = current.len();
        current = filter.apply(&current);
        debug!(stage = filter.name(), input, kept = current.len(), "pair filter stage");
        reports.push(StageReport {
            stage: filter.name(),
            input,
            kept: current.len(),
        });
    }

    (current, reports)
}
