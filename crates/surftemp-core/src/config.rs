use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::daily::DailySource;
use crate::error::{EngineError, Result};
use crate::matcher::{MatchPolicy, SeriesMatcher};
use crate::quality_filters::{PairFilter, SeriesFilter};
use crate::timestamp::{MinuteRounding, TimestampNormalizer};

/// Everything a correlation run needs besides its input tables.
///
/// Filter lists are applied in the order given, which must follow the fixed
/// stage order; any stage may be left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub match_policy: MatchPolicy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_interval_minutes: Option<i64>,
    pub minute_rounding: MinuteRounding,
    pub daily_source: DailySource,
    pub pre_match_filters: Vec<SeriesFilter>,
    pub post_match_filters: Vec<PairFilter>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            match_policy: MatchPolicy::Window,
            time_interval_minutes: None,
            minute_rounding: MinuteRounding::Floor,
            daily_source: DailySource::Raw,
            pre_match_filters: vec![
                SeriesFilter::plausibility_default(),
                SeriesFilter::sequential_jump_default(),
                SeriesFilter::ThreeSigma,
            ],
            post_match_filters: vec![PairFilter::SatelliteThreeSigma, PairFilter::PairwiseDifference],
        }
    }
}

impl EngineConfig {
    /// No filter stages at all; matching runs on the raw normalised series.
    pub fn unfiltered() -> Self {
        Self {
            pre_match_filters: Vec::new(),
            post_match_filters: Vec::new(),
            ..Self::default()
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!(path = %path.display(), policy = %config.match_policy, "loaded engine configuration");
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(minutes) = self.time_interval_minutes {
            if minutes <= 0 {
                return Err(EngineError::InvalidConfiguration(format!(
                    "time_interval_minutes must be positive, got {minutes}"
                )));
            }
        }

        for filter in &self.pre_match_filters {
            filter.validate()?;
        }
        ensure_stage_order(
            "pre_match_filters",
            self.pre_match_filters.iter().map(|f| (f.rank(), f.name())),
        )?;
        ensure_stage_order(
            "post_match_filters",
            self.post_match_filters.iter().map(|f| (f.rank(), f.name())),
        )?;

        Ok(())
    }

    pub fn matcher(&self) -> Result<SeriesMatcher> {
        SeriesMatcher::new(self.match_policy, self.time_interval_minutes)
    }

    pub fn normalizer(&self) -> TimestampNormalizer {
        TimestampNormalizer::new(self.minute_rounding)
    }
}

/// Each stage at most once, in ascending rank.
fn ensure_stage_order<'a>(
    list: &str,
    stages: impl Iterator<Item = (u8, &'a str)>,
) -> Result<()> {
    let mut previous: Option<(u8, &str)> = None;
    for (rank, name) in stages {
        if let Some((previous_rank, previous_name)) = previous {
            if rank == previous_rank {
                return Err(EngineError::InvalidConfiguration(format!(
                    "{list}: stage '{name}' appears more than once"
                )));
            }
            if rank < previous_rank {
                return Err(EngineError::InvalidConfiguration(format!(
                    "{list}: stage '{name}' must come before '{previous_name}'"
                )));
            }
        }
        previous = Some((rank, name));
    }
    Ok(())
}
