//! RSI (Relative Strength Index) with simple-moving-average smoothing.
//!
//! - change[i] = C[i] - C[i-1]
//! - gain = max(change, 0), loss = max(-change, 0)
//! - avg_gain / avg_loss: SMA(n) over the trailing n changes
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0 the point is invalid (no infinite RS).
//!
//! Warmup: the first n bars are invalid (n changes are needed for one average).

use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};

pub fn calculate_rsi(closes: &[f64], period: usize) -> IndicatorSeries {
    if period == 0 || closes.len() < 2 {
        return IndicatorSeries {
            indicator_type: IndicatorType::Rsi(period),
            values: vec![IndicatorPoint::INVALID; closes.len()],
        };
    }

    let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let gains: Vec<f64> = changes.iter().map(|&c| if c > 0.0 { c } else { 0.0 }).collect();
    let losses: Vec<f64> = changes.iter().map(|&c| if c < 0.0 { -c } else { 0.0 }).collect();

    let avg_gain = calculate_sma(&gains, period);
    let avg_loss = calculate_sma(&losses, period);

    let mut values = Vec::with_capacity(closes.len());
    values.push(IndicatorPoint::INVALID);

    for (gain, loss) in avg_gain.values.iter().zip(&avg_loss.values) {
        let point = match (gain.get(), loss.get()) {
            (Some(g), Some(l)) if l != 0.0 => IndicatorPoint::new(100.0 - 100.0 / (1.0 + g / l)),
            _ => IndicatorPoint::INVALID,
        };
        values.push(point);
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}
