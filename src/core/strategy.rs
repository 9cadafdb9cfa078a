use crate::core::scoring::ScoredCandidate;
use crate::models::{
    AcademicBand, ApplicationPlan, ApplicationRound, Approach, Market, PreferenceProfile,
    StudentType, University,
};

/// Early Action picks after the Early Decision slot
const EARLY_ACTION_SLOTS: usize = 2;

/// Split the ranked shortlist across application rounds
///
/// The best-ranked result that does not rule out Early Decision takes the
/// single ED slot; the next two that do not rule out Early Action go to EA;
/// everything else is Regular Decision. Unknown round support counts as
/// available, so markets without round data fall back to rank position.
/// A profile committed to the regular round gets no early picks.
pub fn plan(market: Market, profile: &PreferenceProfile, ranked: &[ScoredCandidate<'_>]) -> ApplicationPlan {
    let mut early_decision = None;
    let mut early_action = Vec::new();
    let mut regular_decision = Vec::new();
    let early = profile.generic.application_round != ApplicationRound::Regular;

    for scored in ranked {
        let candidate = scored.candidate;
        let id = candidate.id.clone();

        if early && early_decision.is_none() && allows(supports_early_decision(candidate)) {
            early_decision = Some(id);
        } else if early
            && early_action.len() < EARLY_ACTION_SLOTS
            && allows(supports_early_action(candidate))
        {
            early_action.push(id);
        } else {
            regular_decision.push(id);
        }
    }

    let (student_type, approach) = match profile.academic_band {
        AcademicBand::Top | AcademicBand::Strong => (StudentType::AcademicStandout, Approach::Ambitious),
        AcademicBand::Solid => (StudentType::WellRounded, Approach::Balanced),
        AcademicBand::Developing => (StudentType::Emerging, Approach::Steady),
    };

    ApplicationPlan {
        student_type,
        approach,
        early_decision,
        early_action,
        regular_decision,
        summary: summary(market, profile, ranked.len(), approach),
    }
}

#[inline]
fn allows(support: Option<bool>) -> bool {
    support != Some(false)
}

fn supports_early_decision(candidate: &University) -> Option<bool> {
    candidate.generic().and_then(|g| g.supports_early_decision)
}

fn supports_early_action(candidate: &University) -> Option<bool> {
    candidate.generic().and_then(|g| g.supports_early_action)
}

fn summary(market: Market, profile: &PreferenceProfile, count: usize, approach: Approach) -> String {
    let advice = match approach {
        Approach::Ambitious => "An ambitious list is realistic; concentrate on top-30 universities.",
        Approach::Balanced => "Balance reach, match and safety choices.",
        Approach::Steady => "Concentrate on match and safety choices.",
    };
    let mut text = format!(
        "{} {} recommended in {} for {}. {}",
        count,
        if count == 1 { "university" } else { "universities" },
        market,
        profile.academic_band.label(),
        advice
    );
    if !profile.interests.is_empty() {
        text.push_str(&format!(" Focus subjects: {}.", profile.interests.join(", ")));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scoring::score_candidate;
    use crate::models::{GenericFields, MarketFields};
    use crate::rubric::registry::RubricRegistry;

    fn create_university(id: &str, ed: Option<bool>, ea: Option<bool>) -> University {
        University {
            id: id.to_string(),
            name: format!("University {}", id),
            country: "United States".to_string(),
            city: None,
            rank: Some(50),
            tuition_usd: Some(40000),
            strengths: vec![],
            tags: vec![],
            intl_rate: None,
            scholarship_available: None,
            website: None,
            metadata: Default::default(),
            fields: MarketFields::Generic(GenericFields {
                supports_early_decision: ed,
                supports_early_action: ea,
                ..Default::default()
            }),
        }
    }

    fn plan_for(universities: &[University], profile: &PreferenceProfile) -> ApplicationPlan {
        let registry = RubricRegistry::builtin().unwrap();
        let rubric = registry.get(Market::Generic).unwrap();
        let ranked: Vec<_> = universities
            .iter()
            .map(|u| score_candidate(rubric, u, profile))
            .collect();
        plan(Market::Generic, profile, &ranked)
    }

    #[test]
    fn test_buckets_follow_round_support() {
        let universities = vec![
            create_university("a", Some(false), Some(true)),
            create_university("b", Some(true), Some(false)),
            create_university("c", Some(false), Some(false)),
            create_university("d", None, Some(true)),
            create_university("e", Some(true), Some(true)),
        ];
        let plan = plan_for(&universities, &PreferenceProfile::default());

        assert_eq!(plan.early_decision.as_deref(), Some("b"));
        assert_eq!(plan.early_action, vec!["a", "d"]);
        assert_eq!(plan.regular_decision, vec!["c", "e"]);
    }

    #[test]
    fn test_unknown_support_falls_back_to_position() {
        let universities: Vec<University> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|id| create_university(id, None, None))
            .collect();
        let plan = plan_for(&universities, &PreferenceProfile::default());

        assert_eq!(plan.early_decision.as_deref(), Some("a"));
        assert_eq!(plan.early_action, vec!["b", "c"]);
        assert_eq!(plan.regular_decision, vec!["d", "e"]);
    }

    #[test]
    fn test_regular_round_gets_no_early_picks() {
        let universities = vec![
            create_university("a", Some(true), Some(true)),
            create_university("b", Some(true), Some(true)),
        ];
        let mut profile = PreferenceProfile::default();
        profile.generic.application_round = ApplicationRound::Regular;
        let plan = plan_for(&universities, &profile);

        assert!(plan.early_decision.is_none());
        assert!(plan.early_action.is_empty());
        assert_eq!(plan.regular_decision, vec!["a", "b"]);
    }

    #[test]
    fn test_approach_follows_academic_band() {
        let mut profile = PreferenceProfile {
            academic_band: AcademicBand::Strong,
            interests: vec!["economics".to_string()],
            ..Default::default()
        };
        let plan = plan_for(&[create_university("a", None, None)], &profile);
        assert_eq!(plan.student_type, StudentType::AcademicStandout);
        assert_eq!(plan.approach, Approach::Ambitious);
        assert!(plan.summary.starts_with("1 university recommended in United States"));
        assert!(plan.summary.ends_with("Focus subjects: economics."));

        profile.academic_band = AcademicBand::Developing;
        let plan = plan_for(&[], &profile);
        assert_eq!(plan.approach, Approach::Steady);
        assert!(plan.early_decision.is_none());
    }
}
