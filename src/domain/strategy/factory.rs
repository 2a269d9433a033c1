//! Strategy registry: maps a configured type name to a constructor.

use crate::domain::config::StrategyConfig;
use crate::domain::error::ScreenerError;
use crate::domain::strategy::{MovingAverageCrossover, RsiRebound, Strategy, StrategyParams};

type Builder = fn(&str, &StrategyParams) -> Result<Strategy, ScreenerError>;

pub struct StrategyKind {
    pub type_name: &'static str,
    build: Builder,
}

/// Every strategy type the screener knows how to build.
pub static REGISTRY: &[StrategyKind] = &[
    StrategyKind {
        type_name: MovingAverageCrossover::TYPE_NAME,
        build: build_ma_crossover,
    },
    StrategyKind {
        type_name: RsiRebound::TYPE_NAME,
        build: build_rsi_rebound,
    },
];

fn build_ma_crossover(name: &str, params: &StrategyParams) -> Result<Strategy, ScreenerError> {
    MovingAverageCrossover::from_params(name, params).map(Strategy::MovingAverageCrossover)
}

fn build_rsi_rebound(name: &str, params: &StrategyParams) -> Result<Strategy, ScreenerError> {
    RsiRebound::from_params(name, params).map(Strategy::RsiRebound)
}

pub fn known_types() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|k| k.type_name)
}

/// Build a strategy of `type_name`, labelled `name`, with `params` overriding
/// its defaults.
pub fn create(name: &str, type_name: &str, params: &StrategyParams) -> Result<Strategy, ScreenerError> {
    let kind = REGISTRY
        .iter()
        .find(|k| k.type_name == type_name)
        .ok_or_else(|| ScreenerError::UnknownStrategyType(type_name.to_string()))?;
    (kind.build)(name, params)
}

/// Build every configured strategy in order, failing on the first bad one.
pub fn create_all(configs: &[StrategyConfig]) -> Result<Vec<Strategy>, ScreenerError> {
    configs
        .iter()
        .map(|c| create(&c.name, &c.strategy_type, &c.params))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_moving_average_crossover() {
        let params = StrategyParams::from([("short_window".to_string(), "3".to_string())]);
        let strategy = create("momentum", "moving_average_crossover", &params).unwrap();
        assert_eq!(strategy.name(), "momentum");
        assert_eq!(strategy.type_name(), "moving_average_crossover");
        match strategy {
            Strategy::MovingAverageCrossover(s) => {
                assert_eq!(s.short_window, 3);
                assert_eq!(s.long_window, 20);
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn creates_rsi_rebound() {
        let strategy = create("reversal", "rsi_rebound", &StrategyParams::new()).unwrap();
        assert_eq!(strategy.name(), "reversal");
        assert_eq!(strategy.min_bars(), 15);
    }

    #[test]
    fn unknown_type_fails() {
        let err = create("x", "bollinger_squeeze", &StrategyParams::new()).unwrap_err();
        assert!(matches!(err, ScreenerError::UnknownStrategyType(ref t) if t == "bollinger_squeeze"));
    }

    #[test]
    fn bad_parameter_fails_at_construction() {
        let params = StrategyParams::from([("period".to_string(), "abc".to_string())]);
        assert!(matches!(
            create("x", "rsi_rebound", &params),
            Err(ScreenerError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn registry_lists_known_types() {
        let types: Vec<_> = known_types().collect();
        assert_eq!(types, vec!["moving_average_crossover", "rsi_rebound"]);
    }

    #[test]
    fn create_all_preserves_order() {
        let configs = vec![
            StrategyConfig {
                name: "b".into(),
                strategy_type: "rsi_rebound".into(),
                params: StrategyParams::new(),
            },
            StrategyConfig {
                name: "a".into(),
                strategy_type: "moving_average_crossover".into(),
                params: StrategyParams::new(),
            },
        ];
        let strategies = create_all(&configs).unwrap();
        let names: Vec<_> = strategies.iter().map(Strategy::name).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
