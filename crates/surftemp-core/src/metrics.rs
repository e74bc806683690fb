use serde::Serialize;

use crate::error::{EngineError, Result};
use crate::stats::mean;
use crate::types::MatchSet;

/// Accuracy of satellite values against ground values over a final match set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ErrorMetrics {
    pub count: usize,
    /// Root-mean-square of `satellite - ground`.
    pub rmse: f64,
    /// Mean of `satellite - ground`.
    pub mbe: f64,
}

impl ErrorMetrics {
    /// Fails with [`EngineError::EmptyMatchSet`]; RMSE and MBE are undefined without pairs.
    pub fn compute(matches: &MatchSet) -> Result<Self> {
        let differences: Vec<f64> = matches.iter().map(|pair| pair.difference()).collect();
        let squared: Vec<f64> = differences.iter().map(|d| d * d).collect();

        match (mean(&differences), mean(&squared)) {
            (Some(mbe), Some(mean_squared)) => Ok(Self {
                count: differences.len(),
                rmse: mean_squared.sqrt(),
                mbe,
            }),
            _ => Err(EngineError::EmptyMatchSet),
        }
    }
}

/// Least-squares line `satellite = slope * ground + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegressionSummary {
    pub count: usize,
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl RegressionSummary {
    /// `None` with fewer than two pairs or when every ground value is the same.
    pub fn fit(matches: &MatchSet) -> Option<Self> {
        let x = matches.ground_values();
        let y = matches.satellite_values();
        if x.len() < 2 {
            return None;
        }

        let mean_x = mean(&x)?;
        let mean_y = mean(&y)?;

        let mut sxx = 0.0;
        let mut syy = 0.0;
        let mut sxy = 0.0;
        for (xi, yi) in x.iter().zip(&y) {
            let dx = xi - mean_x;
            let dy = yi - mean_y;
            sxx += dx * dx;
            syy += dy * dy;
            sxy += dx * dy;
        }

        if sxx <= 0.0 {
            return None;
        }

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;
        // Flat satellite values have no correlation to report.
        let r_squared = if syy > 0.0 {
            (sxy * sxy) / (sxx * syy)
        } else {
            0.0
        };

        Some(Self {
            count: x.len(),
            slope,
            intercept,
            r_squared,
        })
    }
}
