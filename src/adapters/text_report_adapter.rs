//! Plain-text candidate report.
//!
//! ```text
//! AAPL
//!   - momentum: score=0.0049 (short_ma=12.20, long_ma=12.14, avg_volume=2000000.00, slope=0.01)
//! ```

use crate::domain::error::ScreenerError;
use crate::domain::screening::ScreeningCandidate;
use crate::domain::strategy::StrategyResult;
use crate::ports::report_port::ReportPort;
use std::io::Write;

#[derive(Debug, Default)]
pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

fn format_result(result: &StrategyResult) -> String {
    let mut line = format!("  - {}: score={:.4}", result.strategy, result.score);
    if !result.metadata.is_empty() {
        let fields: Vec<String> = result
            .metadata
            .iter()
            .map(|(k, v)| format!("{k}={v:.2}"))
            .collect();
        line.push_str(&format!(" ({})", fields.join(", ")));
    }
    line
}

impl ReportPort for TextReportAdapter {
    fn write(&self, candidates: &[ScreeningCandidate], out: &mut dyn Write) -> Result<(), ScreenerError> {
        for candidate in candidates {
            writeln!(out, "{}", candidate.symbol)?;
            for result in &candidate.results {
                writeln!(out, "{}", format_result(result))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::strategy::Metadata;

    fn render(candidates: &[ScreeningCandidate]) -> String {
        let mut buf = Vec::new();
        TextReportAdapter::new().write(candidates, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn result(symbol: &str, strategy: &str, score: f64, metadata: &[(&str, f64)]) -> StrategyResult {
        StrategyResult {
            symbol: symbol.into(),
            strategy: strategy.into(),
            score,
            metadata: metadata.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    #[test]
    fn formats_symbol_then_one_line_per_result() {
        let candidates = vec![ScreeningCandidate {
            symbol: "AAPL".into(),
            results: vec![
                result(
                    "AAPL",
                    "momentum",
                    0.004942339373970346,
                    &[("short_ma", 12.2), ("long_ma", 12.14), ("avg_volume", 2_000_000.0), ("slope", 0.008264)],
                ),
                result("AAPL", "reversal", 7.5, &[("rsi", 62.5), ("min_rsi", 0.0)]),
            ],
        }];

        assert_eq!(
            render(&candidates),
            "AAPL\n\
             \x20 - momentum: score=0.0049 (short_ma=12.20, long_ma=12.14, avg_volume=2000000.00, slope=0.01)\n\
             \x20 - reversal: score=7.5000 (rsi=62.50, min_rsi=0.00)\n"
        );
    }

    #[test]
    fn empty_metadata_has_no_parentheses() {
        let candidates = vec![ScreeningCandidate {
            symbol: "MSFT".into(),
            results: vec![StrategyResult {
                symbol: "MSFT".into(),
                strategy: "bare".into(),
                score: -0.5,
                metadata: Metadata::new(),
            }],
        }];
        assert_eq!(render(&candidates), "MSFT\n  - bare: score=-0.5000\n");
    }

    #[test]
    fn no_candidates_writes_nothing() {
        assert_eq!(render(&[]), "");
    }
}
