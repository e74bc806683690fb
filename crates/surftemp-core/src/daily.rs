use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::Observation;

/// Mean ground value per calendar date, sorted by date.
pub type DailyAverages = BTreeMap<NaiveDate, f64>;

/// Which ground series the daily means are computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DailySource {
    /// Every ground reading that normalised successfully.
    #[default]
    Raw,
    /// Ground readings left after the pre-match filters.
    Filtered,
}

/// One arithmetic mean per date present in `series`; absent dates stay absent.
pub fn daily_averages(series: &[Observation]) -> DailyAverages {
    let mut sums: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for obs in series {
        let entry = sums.entry(obs.timestamp().date()).or_insert((0.0, 0));
        entry.0 += obs.value();
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(date, (sum, count))| (date, sum / count as f64))
        .collect()
}
