use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use surftemp_parser::{GroundRecord, SatelliteRecord};
use tracing::warn;

use crate::error::{EngineError, Result};
use crate::types::{Observation, ObservationSeries};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

static INSTANT_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// How the fractional part of a view time becomes whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MinuteRounding {
    /// Truncate toward zero; 14.999 h is 14:59.
    #[default]
    Floor,
    /// Round half away from zero; 14.999 h is 15:00.
    Nearest,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedRecord {
    pub index: usize,
    pub raw: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct NormalizedSeries {
    pub series: ObservationSeries,
    pub skipped: Vec<SkippedRecord>,
}

/// Resolves satellite dates plus fractional-hour view times, and logger
/// instant strings, into `NaiveDateTime`s.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampNormalizer {
    rounding: MinuteRounding,
}

impl TimestampNormalizer {
    pub fn new(rounding: MinuteRounding) -> Self {
        Self { rounding }
    }

    pub fn rounding(&self) -> MinuteRounding {
        self.rounding
    }

    /// Canonical instant for a date plus optional view time (`14.5` is 14:30:00).
    ///
    /// Without a view time the date string may be a plain date (midnight) or a full instant.
    pub fn normalize(&self, date: &str, view_time_hours: Option<f64>) -> Result<NaiveDateTime> {
        match view_time_hours {
            Some(hours) => {
                let day = parse_date(date)?;
                self.at_fractional_hour(day, hours)
            }
            None => parse_instant(date).or_else(|_| {
                parse_date(date).and_then(|day| {
                    day.and_hms_opt(0, 0, 0)
                        .ok_or_else(|| EngineError::malformed(date, "midnight out of range"))
                })
            }),
        }
    }

    pub fn at_fractional_hour(&self, day: NaiveDate, hours: f64) -> Result<NaiveDateTime> {
        if !hours.is_finite() || !(0.0..24.0).contains(&hours) {
            return Err(EngineError::malformed(
                format!("{day} {hours}"),
                "view time must be a fractional hour in [0, 24)",
            ));
        }

        let whole_hours = hours.floor();
        let fractional_minutes = (hours - whole_hours) * 60.0;
        let minutes = match self.rounding {
            MinuteRounding::Floor => fractional_minutes.floor().min(59.0),
            MinuteRounding::Nearest => fractional_minutes.round(),
        } as i64;

        let start_of_hour = day
            .and_hms_opt(whole_hours as u32, 0, 0)
            .ok_or_else(|| EngineError::malformed(format!("{day} {hours}"), "hour out of range"))?;

        // 60 rounded minutes carry into the next hour (and past 23:59, the next day).
        Ok(start_of_hour + Duration::minutes(minutes))
    }

    pub fn normalize_satellite(&self, records: &[SatelliteRecord]) -> NormalizedSeries {
        let mut normalized = NormalizedSeries::default();

        for (index, record) in records.iter().enumerate() {
            let observation = self
                .normalize(&record.date, record.view_time_hours)
                .and_then(|ts| Observation::satellite(ts, record.value, record.source));

            match observation {
                Ok(observation) => normalized.series.push(observation),
                Err(err) => {
                    let raw = match record.view_time_hours {
                        Some(hours) => format!("{} @ {hours}h", record.date),
                        None => record.date.clone(),
                    };
                    warn!(index, raw = %raw, error = %err, "skipping satellite record");
                    normalized.skipped.push(SkippedRecord {
                        index,
                        raw,
                        reason: err.to_string(),
                    });
                }
            }
        }

        normalized
    }

    pub fn normalize_ground(&self, records: &[GroundRecord]) -> NormalizedSeries {
        let mut normalized = NormalizedSeries::default();

        for (index, record) in records.iter().enumerate() {
            let observation =
                parse_instant(&record.instant).and_then(|ts| Observation::ground(ts, record.value));

            match observation {
                Ok(observation) => normalized.series.push(observation),
                Err(err) => {
                    warn!(index, raw = %record.instant, error = %err, "skipping ground record");
                    normalized.skipped.push(SkippedRecord {
                        index,
                        raw: record.instant.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        normalized
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|err| EngineError::malformed(trimmed, format!("expected YYYY-MM-DD: {err}")))
}

/// Parses a full date-time instant. Plain dates are rejected.
pub fn parse_instant(value: &str) -> Result<NaiveDateTime> {
    let trimmed = value.trim();
    for fmt in INSTANT_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(dt);
        }
    }
    Err(EngineError::malformed(
        trimmed,
        "expected YYYY-MM-DD HH:MM[:SS[.fff]]",
    ))
}
