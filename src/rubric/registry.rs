use super::{australia, generic, singapore, united_kingdom, Rubric};
use crate::error::ConfigError;
use crate::models::Market;
use std::collections::HashMap;
use tracing::debug;

/// Immutable set of validated rubrics, one per market
#[derive(Debug, Clone)]
pub struct RubricRegistry {
    rubrics: HashMap<Market, Rubric>,
}

impl RubricRegistry {
    /// Load the built-in rubrics, rejecting any that is malformed
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_rubrics(vec![
            generic::rubric(),
            australia::rubric(),
            united_kingdom::rubric(),
            singapore::rubric(),
        ])
    }

    pub fn from_rubrics(rubrics: Vec<Rubric>) -> Result<Self, ConfigError> {
        let mut map = HashMap::with_capacity(rubrics.len());
        for rubric in rubrics {
            rubric.validate()?;
            debug!(market = %rubric.market, version = rubric.version, "rubric loaded");
            map.insert(rubric.market, rubric);
        }
        Ok(Self { rubrics: map })
    }

    pub fn get(&self, market: Market) -> Result<&Rubric, ConfigError> {
        self.rubrics
            .get(&market)
            .ok_or_else(|| ConfigError::UnknownMarket(market.code().to_string()))
    }

    pub fn markets(&self) -> impl Iterator<Item = Market> + '_ {
        self.rubrics.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_covers_all_markets() {
        let registry = RubricRegistry::builtin().unwrap();
        for market in Market::ALL {
            assert_eq!(registry.get(market).unwrap().market, market);
        }
    }

    #[test]
    fn test_malformed_rubric_rejected() {
        let mut broken = generic::rubric();
        broken.dimensions.pop();
        assert!(matches!(
            RubricRegistry::from_rubrics(vec![broken]),
            Err(ConfigError::MalformedRubric { .. })
        ));
    }

    #[test]
    fn test_missing_rubric_is_config_error() {
        let registry = RubricRegistry::from_rubrics(vec![generic::rubric()]).unwrap();
        assert!(registry.get(Market::Singapore).is_err());
    }
}
