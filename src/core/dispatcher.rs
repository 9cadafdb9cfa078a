use crate::error::ConfigError;
use crate::models::{Market, University};
use crate::rubric::{Rubric, RubricRegistry};
use tracing::{debug, warn};

/// Select the rubric for the declared target market
///
/// A missing or unknown market is fatal; there is no default rubric.
pub fn dispatch<'r>(
    registry: &'r RubricRegistry,
    target_market: Option<&str>,
) -> Result<&'r Rubric, ConfigError> {
    let declared = target_market
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or(ConfigError::MissingMarket)?;

    let market =
        Market::parse(declared).ok_or_else(|| ConfigError::UnknownMarket(declared.to_string()))?;

    let rubric = registry.get(market)?;
    debug!(market = %market, version = rubric.version, "rubric dispatched");
    Ok(rubric)
}

/// In-market candidates of a pool
#[derive(Debug, Clone)]
pub struct Partition<'a> {
    pub in_market: Vec<&'a University>,
    /// In-market candidates carrying another market's field shape
    pub shape_mismatches: usize,
}

/// Keep the candidates of `market`, counting field-shape mismatches
///
/// Mismatched candidates are still kept; they score with neutral defaults.
pub fn partition(market: Market, candidates: &[University]) -> Partition<'_> {
    let in_market: Vec<&University> = candidates
        .iter()
        .filter(|candidate| candidate.in_market(market))
        .collect();

    let shape_mismatches = in_market
        .iter()
        .filter(|candidate| {
            candidate
                .fields
                .market()
                .is_some_and(|shape| shape != market)
        })
        .count();

    if shape_mismatches > 0 {
        warn!(
            market = %market,
            mismatches = shape_mismatches,
            "candidates carry another market's field shape"
        );
    }

    Partition {
        in_market,
        shape_mismatches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AustraliaFields, MarketFields};

    fn create_university(id: &str, country: &str, fields: MarketFields) -> University {
        University {
            id: id.to_string(),
            name: format!("University {}", id),
            country: country.to_string(),
            city: None,
            rank: None,
            tuition_usd: None,
            strengths: vec![],
            tags: vec![],
            intl_rate: None,
            scholarship_available: None,
            website: None,
            metadata: Default::default(),
            fields,
        }
    }

    #[test]
    fn test_dispatch_accepts_codes_and_names() {
        let registry = RubricRegistry::builtin().unwrap();
        assert_eq!(dispatch(&registry, Some("AU")).unwrap().market, Market::Australia);
        assert_eq!(
            dispatch(&registry, Some("United Kingdom")).unwrap().market,
            Market::UnitedKingdom
        );
        assert_eq!(dispatch(&registry, Some("sg")).unwrap().market, Market::Singapore);
        assert_eq!(dispatch(&registry, Some("us")).unwrap().market, Market::Generic);
    }

    #[test]
    fn test_dispatch_rejects_missing_and_unknown() {
        let registry = RubricRegistry::builtin().unwrap();
        assert_eq!(dispatch(&registry, None).unwrap_err(), ConfigError::MissingMarket);
        assert_eq!(dispatch(&registry, Some("  ")).unwrap_err(), ConfigError::MissingMarket);
        assert_eq!(
            dispatch(&registry, Some("canada")).unwrap_err(),
            ConfigError::UnknownMarket("canada".to_string())
        );
    }

    #[test]
    fn test_partition_counts_shape_mismatches() {
        let candidates = vec![
            create_university("1", "Australia", MarketFields::Australia(AustraliaFields::default())),
            create_university("2", "Australia", MarketFields::None),
            create_university("3", "Australia", MarketFields::Generic(Default::default())),
            create_university("4", "Singapore", MarketFields::None),
        ];

        let partition = partition(Market::Australia, &candidates);
        assert_eq!(partition.in_market.len(), 3);
        assert_eq!(partition.shape_mismatches, 1);
    }
}
