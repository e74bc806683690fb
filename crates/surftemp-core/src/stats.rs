use serde::Serialize;

/// Mean and population standard deviation of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// Fewer than two values or no spread: a sigma band would be meaningless.
    ///
    /// Spread is judged on the values themselves. Identical values that are not
    /// exactly representable still leave a tiny nonzero `std_dev` from rounding.
    pub fn is_degenerate(&self) -> bool {
        self.count < 2 || self.min == self.max || !self.std_dev.is_finite() || self.std_dev <= 0.0
    }

    /// `[mean - k*sd, mean + k*sd]`, or `None` for a degenerate sample.
    pub fn sigma_bounds(&self, k: f64) -> Option<(f64, f64)> {
        if self.is_degenerate() {
            return None;
        }
        let half_width = k * self.std_dev;
        Some((self.mean - half_width, self.mean + half_width))
    }
}

pub fn summarize(values: &[f64]) -> Option<Summary> {
    if values.is_empty() {
        return None;
    }
    let count = values.len();
    let n = count as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some(Summary {
        count,
        mean,
        std_dev: variance.sqrt(),
        min,
        max,
    })
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
