use crate::core::fallback::cmp_missing_last;
use crate::core::scoring::ScoredCandidate;
use std::cmp::Ordering;

/// Strict total order over scored candidates
///
/// Score descending, then tuition ascending, then rank ascending (missing
/// values last for both), then id ascending.
#[inline]
pub fn compare(a: &ScoredCandidate<'_>, b: &ScoredCandidate<'_>) -> Ordering {
    b.total
        .total_cmp(&a.total)
        .then_with(|| cmp_missing_last(a.candidate.tuition_usd, b.candidate.tuition_usd))
        .then_with(|| cmp_missing_last(a.candidate.rank, b.candidate.rank))
        .then_with(|| a.candidate.id.cmp(&b.candidate.id))
}

/// Sort by the total order and keep the top `limit`
pub fn rank_top(mut scored: Vec<ScoredCandidate<'_>>, limit: usize) -> Vec<ScoredCandidate<'_>> {
    scored.sort_by(compare);
    scored.truncate(limit);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MarketFields, University};

    fn create_university(id: &str, rank: Option<u32>, tuition: Option<u32>) -> University {
        University {
            id: id.to_string(),
            name: id.to_uppercase(),
            country: "Singapore".to_string(),
            city: None,
            rank,
            tuition_usd: tuition,
            strengths: vec![],
            tags: vec![],
            intl_rate: None,
            scholarship_available: None,
            website: None,
            metadata: Default::default(),
            fields: MarketFields::None,
        }
    }

    fn scored(candidate: &University, total: f64) -> ScoredCandidate<'_> {
        ScoredCandidate {
            candidate,
            total,
            breakdown: vec![],
            inputs: vec![],
        }
    }

    #[test]
    fn test_tie_break_order() {
        let cheap = create_university("cheap", Some(80), Some(20000));
        let pricey = create_university("pricey", Some(10), Some(30000));
        let unknown_fee = create_university("unknown", Some(5), None);
        let same_fee_better_rank = create_university("ranked", Some(40), Some(20000));
        let top = create_university("top", Some(200), Some(90000));

        let ranked = rank_top(
            vec![
                scored(&unknown_fee, 70.0),
                scored(&pricey, 70.0),
                scored(&cheap, 70.0),
                scored(&top, 85.5),
                scored(&same_fee_better_rank, 70.0),
            ],
            10,
        );
        let ids: Vec<&str> = ranked.iter().map(|s| s.candidate.id.as_str()).collect();
        assert_eq!(ids, vec!["top", "ranked", "cheap", "pricey", "unknown"]);
    }

    #[test]
    fn test_id_breaks_full_ties() {
        let b = create_university("b", None, None);
        let a = create_university("a", None, None);

        let first = rank_top(vec![scored(&b, 50.0), scored(&a, 50.0)], 10);
        let second = rank_top(vec![scored(&a, 50.0), scored(&b, 50.0)], 10);
        assert_eq!(first[0].candidate.id, "a");
        assert_eq!(second[0].candidate.id, "a");
    }

    #[test]
    fn test_limit_truncates() {
        let a = create_university("a", None, None);
        let ranked = rank_top(vec![scored(&a, 1.0), scored(&a, 2.0)], 1);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].total, 2.0);
    }
}
