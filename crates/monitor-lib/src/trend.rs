//! Trend estimation
//!
//! Classifies the short-term direction of a series from the least-squares
//! slope over its most recent samples.

use crate::models::Trend;

/// Number of most recent samples considered
pub const TREND_WINDOW: usize = 10;

/// Slope magnitude below which a series is considered stable
pub const SLOPE_THRESHOLD: f64 = 0.01;

/// Classify the direction of `values` (oldest first)
pub fn calculate_trend(values: &[f64]) -> Trend {
    if values.len() < 2 {
        return Trend::Stable;
    }

    let recent = &values[values.len().saturating_sub(TREND_WINDOW)..];
    let slope = linear_regression_slope(recent);

    if slope > SLOPE_THRESHOLD {
        Trend::Improving
    } else if slope < -SLOPE_THRESHOLD {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

/// First-degree least-squares slope of `values` against x = 0..n-1
pub fn linear_regression_slope(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if n < 2.0 {
        return 0.0;
    }

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;

    for (i, y) in values.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator.abs() < f64::EPSILON {
        return 0.0;
    }

    (n * sum_xy - sum_x * sum_y) / denominator
}
