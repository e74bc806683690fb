// crates/surftemp-core/src/types.rs

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;
use surftemp_parser::SatelliteSource;

use crate::error::{EngineError, Result};

/// Where an observation came from. Display formatting is left to reporting code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObservationSource {
    Satellite(SatelliteSource),
    Ground,
}

impl ObservationSource {
    pub fn is_satellite(&self) -> bool {
        matches!(self, ObservationSource::Satellite(_))
    }

    pub fn satellite(&self) -> Option<SatelliteSource> {
        match self {
            ObservationSource::Satellite(source) => Some(*source),
            ObservationSource::Ground => None,
        }
    }
}

impl fmt::Display for ObservationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObservationSource::Satellite(source) => write!(f, "Satellite - {source}"),
            ObservationSource::Ground => f.write_str("Ground"),
        }
    }
}

/// A single timestamped reading. The value is always finite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    timestamp: NaiveDateTime,
    value: f64,
    source: ObservationSource,
}

impl Observation {
    pub fn new(timestamp: NaiveDateTime, value: f64, source: ObservationSource) -> Result<Self> {
        if !value.is_finite() {
            let label = if source.is_satellite() {
                "satellite"
            } else {
                "ground"
            };
            return Err(EngineError::NonFiniteValue { label, value });
        }
        Ok(Self {
            timestamp,
            value,
            source,
        })
    }

    pub fn ground(timestamp: NaiveDateTime, value: f64) -> Result<Self> {
        Self::new(timestamp, value, ObservationSource::Ground)
    }

    pub fn satellite(timestamp: NaiveDateTime, value: f64, source: SatelliteSource) -> Result<Self> {
        Self::new(timestamp, value, ObservationSource::Satellite(source))
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn source(&self) -> ObservationSource {
        self.source
    }
}

/// Observations in arrival order from their origin table; not necessarily time-sorted.
pub type ObservationSeries = Vec<Observation>;

/// One satellite observation paired with one ground observation.
///
/// Both sides are built through [`Observation::new`], so both values are finite.
/// Filters keep or drop a pair as a whole.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedPair {
    satellite: Observation,
    ground: Observation,
}

impl MatchedPair {
    pub fn new(satellite: Observation, ground: Observation) -> Self {
        Self { satellite, ground }
    }

    pub fn satellite(&self) -> &Observation {
        &self.satellite
    }

    pub fn ground(&self) -> &Observation {
        &self.ground
    }

    /// Signed `satellite - ground`.
    pub fn difference(&self) -> f64 {
        self.satellite.value - self.ground.value
    }

    pub fn abs_difference(&self) -> f64 {
        self.difference().abs()
    }

    /// Absolute time offset between the two observations, in seconds.
    pub fn offset_seconds(&self) -> i64 {
        (self.satellite.timestamp - self.ground.timestamp)
            .num_seconds()
            .abs()
    }
}

/// Pairs in the order the matcher produced them. Filters only ever shrink it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MatchSet(Vec<MatchedPair>);

impl MatchSet {
    pub fn from_pairs(pairs: Vec<MatchedPair>) -> Self {
        Self(pairs)
    }

    pub fn pairs(&self) -> &[MatchedPair] {
        &self.0
    }

    pub fn into_pairs(self) -> Vec<MatchedPair> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatchedPair> {
        self.0.iter()
    }

    pub fn satellite_values(&self) -> Vec<f64> {
        self.0.iter().map(|pair| pair.satellite.value).collect()
    }

    pub fn ground_values(&self) -> Vec<f64> {
        self.0.iter().map(|pair| pair.ground.value).collect()
    }

    /// New set holding the pairs whose flag in `keep` is set.
    pub(crate) fn select(&self, keep: &[bool]) -> MatchSet {
        debug_assert_eq!(keep.len(), self.0.len());
        MatchSet(
            self.0
                .iter()
                .zip(keep)
                .filter(|(_, keep)| **keep)
                .map(|(pair, _)| pair.clone())
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a MatchSet {
    type Item = &'a MatchedPair;
    type IntoIter = std::slice::Iter<'a, MatchedPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
