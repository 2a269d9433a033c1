//! Simple Moving Average.
//!
//! SMA(n)[i] = sum(V[i-n+1..=i]) / n
//! Warmup: first (n-1) points are invalid. A window containing a non-finite
//! value is also invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};

pub fn calculate_sma(values: &[f64], period: usize) -> IndicatorSeries {
    if period == 0 {
        return IndicatorSeries {
            indicator_type: IndicatorType::Sma(period),
            values: vec![IndicatorPoint::INVALID; values.len()],
        };
    }

    let points = (0..values.len())
        .map(|i| {
            if i + 1 < period {
                return IndicatorPoint::INVALID;
            }
            let window = &values[i + 1 - period..=i];
            if window.iter().any(|v| !v.is_finite()) {
                return IndicatorPoint::INVALID;
            }
            IndicatorPoint::new(window.iter().sum::<f64>() / period as f64)
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values: points,
    }
}

/// Mean of the finite values among the trailing `n`, `None` if there are none.
pub fn trailing_mean(values: &[f64], n: usize) -> Option<f64> {
    let start = values.len().saturating_sub(n);
    let (sum, count) = values[start..]
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}
