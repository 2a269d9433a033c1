//! Domain error types.

use crate::domain::universe::UniverseError;

/// Top-level error type for the screener.
#[derive(Debug, thiserror::Error)]
pub enum ScreenerError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("unknown strategy type: {0}")]
    UnknownStrategyType(String),

    #[error(transparent)]
    Universe(#[from] UniverseError),

    #[error("failed to fetch {symbol}: {reason}")]
    DataFetch { symbol: String, reason: String },

    #[error("stock pool {path}: {reason}")]
    Persistence { path: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ScreenerError {
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            ScreenerError::ConfigParse { .. }
                | ScreenerError::ConfigMissing { .. }
                | ScreenerError::ConfigInvalid { .. }
                | ScreenerError::UnknownStrategyType(_)
                | ScreenerError::Universe(_)
        )
    }
}

impl From<&ScreenerError> for std::process::ExitCode {
    fn from(err: &ScreenerError) -> Self {
        let code: u8 = match err {
            ScreenerError::Io(_) => 1,
            ScreenerError::ConfigParse { .. }
            | ScreenerError::ConfigMissing { .. }
            | ScreenerError::ConfigInvalid { .. }
            | ScreenerError::UnknownStrategyType(_)
            | ScreenerError::Universe(_) => 2,
            ScreenerError::Persistence { .. } => 3,
            ScreenerError::DataFetch { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unknown_strategy_type() {
        let err = ScreenerError::UnknownStrategyType("golden_cross".into());
        assert_eq!(err.to_string(), "unknown strategy type: golden_cross");
    }

    #[test]
    fn display_persistence_names_file() {
        let err = ScreenerError::Persistence {
            path: "/tmp/pool.json".into(),
            reason: "expected value at line 1 column 1".into(),
        };
        assert!(err.to_string().contains("/tmp/pool.json"));
    }

    #[test]
    fn config_classification() {
        assert!(ScreenerError::UnknownStrategyType("x".into()).is_config());
        assert!(
            ScreenerError::ConfigMissing {
                section: "stock_pool".into(),
                key: "path".into(),
            }
            .is_config()
        );
        assert!(
            !ScreenerError::DataFetch {
                symbol: "AAPL".into(),
                reason: "HTTP 404".into(),
            }
            .is_config()
        );
        assert!(
            !ScreenerError::Persistence {
                path: "p".into(),
                reason: "r".into(),
            }
            .is_config()
        );
    }
}
