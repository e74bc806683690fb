use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::types::{MatchSet, MatchedPair, Observation};

const MILLIS_PER_MINUTE: i64 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// Every same-day ground reading, optionally within a tolerance.
    #[default]
    Window,
    /// The single closest ground reading in time.
    Nearest,
}

impl MatchPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchPolicy::Window => "window",
            MatchPolicy::Nearest => "nearest",
        }
    }
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchPolicy {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "window" => Ok(MatchPolicy::Window),
            "nearest" => Ok(MatchPolicy::Nearest),
            other => Err(EngineError::InvalidConfiguration(format!(
                "unknown matching policy '{other}' (expected window or nearest)"
            ))),
        }
    }
}

/// Aligns satellite observations against ground observations.
///
/// Candidate search runs per satellite observation in parallel; the result is
/// reassembled in satellite order, then ground order, before anything downstream
/// computes statistics over it.
#[derive(Debug, Clone, Copy)]
pub struct SeriesMatcher {
    policy: MatchPolicy,
    tolerance_millis: Option<i64>,
}

impl SeriesMatcher {
    pub fn new(policy: MatchPolicy, time_interval_minutes: Option<i64>) -> Result<Self> {
        let tolerance_millis = match time_interval_minutes {
            Some(minutes) if minutes <= 0 => {
                return Err(EngineError::InvalidConfiguration(format!(
                    "time_interval_minutes must be positive, got {minutes}"
                )));
            }
            Some(minutes) => Some(minutes.checked_mul(MILLIS_PER_MINUTE).ok_or_else(|| {
                EngineError::InvalidConfiguration(format!(
                    "time_interval_minutes {minutes} is too large"
                ))
            })?),
            None => None,
        };

        if policy == MatchPolicy::Nearest && tolerance_millis.is_some() {
            debug!("time_interval_minutes is ignored by the nearest policy");
        }

        Ok(Self {
            policy,
            tolerance_millis,
        })
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Builds the raw match set. Neither input is modified; satellite observations
    /// without a candidate contribute nothing.
    pub fn match_series(&self, satellite: &[Observation], ground: &[Observation]) -> MatchSet {
        let per_satellite: Vec<Vec<MatchedPair>> = satellite
            .par_iter()
            .map(|sat| match self.policy {
                MatchPolicy::Window => self.window_candidates(sat, ground),
                MatchPolicy::Nearest => nearest_candidate(sat, ground).into_iter().collect(),
            })
            .collect();

        MatchSet::from_pairs(per_satellite.into_iter().flatten().collect())
    }

    fn window_candidates(&self, sat: &Observation, ground: &[Observation]) -> Vec<MatchedPair> {
        let day = sat.timestamp().date();
        ground
            .iter()
            .filter(|obs| obs.timestamp().date() == day)
            .filter(|obs| match self.tolerance_millis {
                Some(limit) => distance_millis(sat, obs) <= limit,
                None => true,
            })
            .map(|obs| MatchedPair::new(sat.clone(), obs.clone()))
            .collect()
    }
}

/// Closest ground reading; on equal distance the earlier one in iteration order wins.
fn nearest_candidate(sat: &Observation, ground: &[Observation]) -> Option<MatchedPair> {
    let mut best: Option<(&Observation, i64)> = None;

    for obs in ground {
        let distance = distance_millis(sat, obs);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((obs, distance)),
        }
    }

    best.map(|(obs, _)| MatchedPair::new(sat.clone(), obs.clone()))
}

fn distance_millis(a: &Observation, b: &Observation) -> i64 {
    (a.timestamp() - b.timestamp()).num_milliseconds().abs()
}
