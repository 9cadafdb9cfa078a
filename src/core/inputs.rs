use crate::core::synonyms::{matched_interests, selected_count};
use crate::models::{
    BondAcceptance, CareerFocus, EnglishReadiness, Level, Market, PreferenceProfile, SchoolType,
    SchoolTypePreference, UcasDeadline, University,
};
use crate::rubric::{
    australia, singapore, united_kingdom, DimensionKind, DimensionSpec, Flag, LocalityRule,
    Mapping, Rubric,
};

/// Field values one dimension reads, shared by scoring and explanation
#[derive(Debug, Clone, PartialEq)]
pub struct Inputs {
    /// Profile choice key driving a lookup
    pub choice: &'static str,
    pub secondary: &'static str,
    pub flag: Option<bool>,
    pub secondary_flag: Option<bool>,
    /// Candidate numeric value, `None` when missing
    pub value: Option<f64>,
    /// Profile limit for threshold mappings
    pub limit: Option<f64>,
    /// Multiplier applied to linear outcomes
    pub gain: f64,
    pub matched: Vec<String>,
    pub selected: usize,
    pub band: Option<(u32, u32)>,
    /// Display text for the candidate fact
    pub fact: Option<String>,
}

impl Default for Inputs {
    fn default() -> Self {
        Self {
            choice: "",
            secondary: "",
            flag: None,
            secondary_flag: None,
            value: None,
            limit: None,
            gain: 1.0,
            matched: Vec::new(),
            selected: 0,
            band: None,
            fact: None,
        }
    }
}

/// Bind profile and candidate fields for one dimension
pub fn resolve_inputs(
    rubric: &Rubric,
    spec: &DimensionSpec,
    candidate: &University,
    profile: &PreferenceProfile,
) -> Inputs {
    let mut inputs = Inputs::default();
    let gen = candidate.generic();
    let au = candidate.australia();
    let uk = candidate.united_kingdom();
    let sg = candidate.singapore();

    match spec.kind {
        DimensionKind::Academic => {
            if let Mapping::Band { tiers, .. } = &spec.mapping {
                inputs.band = Some(tiers.band(profile.academic_band));
            }
            inputs.value = candidate.rank.map(f64::from);
        }
        DimensionKind::Interests => {
            inputs.selected = selected_count(&profile.interests);
            inputs.matched =
                matched_interests(&profile.interests, &candidate.strengths, rubric.synonyms);
            inputs.value = Some(inputs.matched.len() as f64);
        }
        DimensionKind::Budget => {
            inputs.value = candidate.tuition_usd.map(f64::from);
            inputs.limit = profile.budget().map(f64::from);
        }
        DimensionKind::Internship => {
            inputs.choice = profile.generic.internship_importance.key();
            inputs.flag = gen.and_then(|g| g.has_internship_program);
        }
        DimensionKind::SchoolType => {
            let preference = profile.generic.school_type_preference;
            inputs.choice = preference.key();
            let actual = gen.and_then(|g| g.school_type);
            inputs.flag = actual.map(|t| school_type_matches(preference, t));
            inputs.fact = actual.map(|t| format!("{:?}", t).to_lowercase());
        }
        DimensionKind::Region => {
            let rule = match rubric.market {
                Market::UnitedKingdom => LocalityRule::UnitedKingdomRegion,
                _ => LocalityRule::GenericRegion,
            };
            inputs.choice = if profile.region().is_some() { "stated" } else { "any" };
            inputs.flag = locality_matches(rule, candidate, profile);
            inputs.fact = match rule {
                LocalityRule::GenericRegion => gen
                    .and_then(|g| g.state.clone())
                    .or_else(|| candidate.city.clone()),
                _ => candidate.city.clone(),
            };
        }
        DimensionKind::InternationalCommunity => {
            inputs.choice = profile.intl_community_importance.key();
            inputs.value = candidate.intl_rate;
        }
        DimensionKind::ApplicationRound => {
            inputs.choice = profile.generic.application_round.key();
            inputs.flag = gen.and_then(|g| g.supports_early_decision);
            inputs.secondary_flag = gen.and_then(|g| g.supports_early_action);
        }
        DimensionKind::WorkIntegratedLearning => {
            let answers = &profile.australia;
            inputs.choice = answers.wil_preference.key();
            inputs.flag = au.and_then(|a| a.work_integrated_learning);
            inputs.value = au.and_then(|a| a.placement_rate);
            let rate = inputs.value.unwrap_or(0.0);
            inputs.gain = match answers.career_focus {
                CareerFocus::EmploymentReputation if rate > 0.0 => 1.2,
                CareerFocus::InternshipLabel if inputs.flag == Some(true) => 1.3,
                _ => 1.0,
            };
        }
        DimensionKind::GroupOfEight => {
            inputs.choice = profile.australia.go8_preference.key();
            inputs.flag = au.and_then(|a| a.group_of_eight);
        }
        DimensionKind::City => {
            inputs.choice = if profile.australia.cities().is_empty() {
                "any"
            } else {
                "stated"
            };
            inputs.flag = locality_matches(LocalityRule::AustraliaCity, candidate, profile);
            inputs.fact = candidate.city.clone();
        }
        DimensionKind::PostStudyVisa => {
            inputs.choice = profile.australia.psw_importance.key();
            inputs.value = au.and_then(|a| a.post_study_visa_years);
        }
        DimensionKind::English => {
            let answers = &profile.australia;
            inputs.choice = match answers.english_readiness {
                EnglishReadiness::Ready => "ready",
                EnglishReadiness::WithinThreeMonths => "within_three_months",
                EnglishReadiness::NeedsLonger => "needs_longer",
            };
            inputs.secondary = if answers.accept_language_course {
                "accepts"
            } else {
                "declines"
            };
            inputs.flag = au.and_then(|a| a.requires_english_test);
            inputs.fact = au.and_then(|a| a.english_requirements.clone());
        }
        DimensionKind::Scholarship => {
            inputs.choice = profile.scholarship_importance.key();
            inputs.flag = candidate.scholarship_available;
        }
        DimensionKind::StudyLength => {
            inputs.choice = profile.australia.study_length_preference.key();
            inputs.value = au
                .and_then(|a| a.study_length_years)
                .or_else(|| uk.and_then(|u| u.study_length_years));
        }
        DimensionKind::Intakes => {
            inputs.choice = profile.intake_preference.key();
            let intakes = au.and_then(|a| a.intakes.as_deref());
            // value is the number of listed intakes
            inputs.value = intakes.map(|text| intake_months(text).len() as f64);
            inputs.flag = intakes.map(has_early_intake);
            inputs.fact = intakes.map(str::to_string);
        }
        DimensionKind::UcasRoute => {
            inputs.choice = profile.united_kingdom.ucas_route.key();
            inputs.secondary = profile.intake_preference.key();
            let deadline = uk.and_then(|u| u.ucas_deadline);
            inputs.flag = deadline.map(|d| d == UcasDeadline::OxbridgeMedicine);
            inputs.secondary_flag = deadline.map(|d| d == UcasDeadline::Main);
            inputs.value = deadline.map(|_| 1.0);
            inputs.fact = deadline.map(|d| deadline_label(d).to_string());
        }
        DimensionKind::PlacementYear => {
            inputs.choice = profile.united_kingdom.placement_year_pref.key();
            inputs.flag = uk.and_then(|u| u.placement_year_available);
        }
        DimensionKind::RussellGroup => {
            inputs.choice = profile.united_kingdom.russell_pref.key();
            inputs.flag = uk.and_then(|u| u.russell_group);
        }
        DimensionKind::PersonalStatement => {
            let prep = profile.united_kingdom.prep_level;
            inputs.choice = prep.key();
            inputs.value = uk
                .and_then(|u| u.personal_statement_weight)
                .map(|w| f64::from(w.clamp(1, 10)));
            inputs.gain = match prep {
                Level::High => 1.0,
                Level::Medium => 0.6,
                Level::Low => 0.3,
            };
        }
        DimensionKind::AdmissionsTests => {
            inputs.choice = profile.united_kingdom.prep_level.key();
            let tests = uk.and_then(|u| u.admissions_tests.as_deref());
            inputs.flag = uk.map(|_| tests.is_some_and(|t| !t.trim().is_empty()));
            inputs.fact = tests.map(str::to_string);
        }
        DimensionKind::Orientation => {
            inputs.choice = profile.singapore.orientation.key();
            inputs.value = sg
                .and_then(|s| s.industry_links_score)
                .map(|score| f64::from(score.clamp(1, 10)));
            inputs.flag = sg.and_then(|s| s.coop_or_internship_required);
        }
        DimensionKind::TuitionGrant => {
            let acceptance = profile.singapore.bond_acceptance;
            inputs.choice = acceptance.key();
            inputs.flag = sg.and_then(|s| s.tuition_grant_available);
            inputs.secondary_flag = sg.map(|s| bond_free(s.tuition_grant_bond_years));
            inputs.value = sg.and_then(|s| s.tuition_grant_bond_years);
        }
        DimensionKind::InterviewPortfolio => {
            inputs.choice = profile.singapore.interview_portfolio.key();
            inputs.flag = sg.and_then(|s| {
                match (s.interview_required, s.essay_or_portfolio_required) {
                    (None, None) => None,
                    (a, b) => Some(a.unwrap_or(false) || b.unwrap_or(false)),
                }
            });
        }
        DimensionKind::DoubleDegree => {
            inputs.choice = if profile.singapore.want_double_degree {
                "wanted"
            } else {
                "not_needed"
            };
            inputs.flag = Some(has_double_degree_tag(&candidate.tags));
        }
        DimensionKind::Exchange => {
            inputs.choice = if profile.singapore.want_exchange {
                "wanted"
            } else {
                "not_needed"
            };
            inputs.value = sg
                .and_then(|s| s.exchange_opportunities_score)
                .map(f64::from);
        }
        DimensionKind::Safety => {
            inputs.choice = profile.singapore.safety_importance.key();
            inputs.value = sg.and_then(|s| s.safety_score);
        }
    }

    inputs
}

/// Candidate boolean fact, `None` when the field is missing
pub fn candidate_flag(candidate: &University, flag: Flag) -> Option<bool> {
    let gen = candidate.generic();
    let au = candidate.australia();
    let uk = candidate.united_kingdom();
    let sg = candidate.singapore();

    match flag {
        Flag::Scholarship => candidate.scholarship_available,
        Flag::InternshipProgram => gen.and_then(|g| g.has_internship_program),
        Flag::EarlyDecision => gen.and_then(|g| g.supports_early_decision),
        Flag::EarlyAction => gen.and_then(|g| g.supports_early_action),
        Flag::GroupOfEight => au.and_then(|a| a.group_of_eight),
        Flag::WorkIntegratedLearning => au.and_then(|a| a.work_integrated_learning),
        Flag::RequiresEnglishTest => au.and_then(|a| a.requires_english_test),
        Flag::RussellGroup => uk.and_then(|u| u.russell_group),
        Flag::PlacementYear => uk.and_then(|u| u.placement_year_available),
        Flag::Foundation => uk.and_then(|u| u.foundation_available),
        Flag::OxbridgeMedicineDeadline => uk
            .and_then(|u| u.ucas_deadline)
            .map(|d| d == UcasDeadline::OxbridgeMedicine),
        Flag::TuitionGrant => sg.and_then(|s| s.tuition_grant_available),
        Flag::InterviewRequired => sg
            .and_then(|s| s.interview_required)
            .or_else(|| uk.and_then(|u| u.interview_required)),
        Flag::EssayOrPortfolioRequired => sg.and_then(|s| s.essay_or_portfolio_required),
        Flag::CoopRequired => sg.and_then(|s| s.coop_or_internship_required),
    }
}

/// Whether the candidate sits in the preferred locality
///
/// Returns `Some(true)` when no locality is stated and `None` when the
/// candidate has no location data to compare.
pub fn locality_matches(
    rule: LocalityRule,
    candidate: &University,
    profile: &PreferenceProfile,
) -> Option<bool> {
    let city = candidate.city.as_deref().map(|c| c.trim().to_lowercase());

    match rule {
        LocalityRule::AustraliaCity => {
            let wanted: Vec<String> = profile
                .australia
                .cities()
                .into_iter()
                .map(australia::canonical_city)
                .collect();
            if wanted.is_empty() {
                return Some(true);
            }
            let city = australia::canonical_city(candidate.city.as_deref()?);
            Some(wanted.contains(&city))
        }
        LocalityRule::UnitedKingdomRegion => {
            let Some(region) = profile.region() else {
                return Some(true);
            };
            let region = united_kingdom::canonical_region(region);
            let city = city?;
            if region == "london" {
                return Some(city == "london");
            }
            Some(overlaps(&region, &city))
        }
        LocalityRule::GenericRegion => {
            let Some(region) = profile.region() else {
                return Some(true);
            };
            let region = region.to_lowercase();
            let state = candidate
                .generic()
                .and_then(|g| g.state.as_deref())
                .map(|s| s.trim().to_lowercase());
            if state.is_none() && city.is_none() {
                return None;
            }
            Some(
                state.is_some_and(|s| overlaps(&region, &s))
                    || city.is_some_and(|c| overlaps(&region, &c)),
            )
        }
    }
}

#[inline]
fn overlaps(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

#[inline]
pub fn school_type_matches(preference: SchoolTypePreference, actual: SchoolType) -> bool {
    matches!(
        (preference, actual),
        (SchoolTypePreference::Any, _)
            | (SchoolTypePreference::Public, SchoolType::Public)
            | (SchoolTypePreference::Private, SchoolType::Private)
    )
}

/// No bond, or a zero-year bond
pub fn bond_free(bond_years: Option<f64>) -> bool {
    bond_years.map_or(true, |years| years <= 0.0)
}

/// Explicit refusal of any tuition grant bond; a softer "avoid" does not count
pub fn refuses_bond(profile: &PreferenceProfile) -> bool {
    profile.singapore.bond_acceptance == BondAcceptance::Refuse
}

fn has_double_degree_tag(tags: &[String]) -> bool {
    tags.iter().any(|tag| {
        let tag = tag.to_lowercase();
        singapore::DOUBLE_DEGREE_TAGS
            .iter()
            .any(|keyword| tag.contains(keyword))
    })
}

fn intake_months(text: &str) -> Vec<String> {
    text.split(|c: char| c == ',' || c == '/' || c == ';' || c == '、')
        .map(|m| m.trim().to_lowercase())
        .filter(|m| !m.is_empty())
        .collect()
}

/// February or July intake listed
fn has_early_intake(text: &str) -> bool {
    intake_months(text).iter().any(|m| {
        m.contains("feb") || m.contains("jul") || month_mark(m, "2月") || month_mark(m, "7月")
    })
}

/// `2月` without the `1` of `12月`
fn month_mark(token: &str, mark: &str) -> bool {
    token
        .match_indices(mark)
        .any(|(at, _)| !token[..at].ends_with('1'))
}

fn deadline_label(deadline: UcasDeadline) -> &'static str {
    match deadline {
        UcasDeadline::OxbridgeMedicine => "15 October (Oxbridge/medicine)",
        UcasDeadline::Main => "31 January (main)",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AustraliaFields, MarketFields, SingaporeFields};
    use crate::rubric::registry::RubricRegistry;

    fn australian(city: &str, fields: AustraliaFields) -> University {
        University {
            id: "au-1".to_string(),
            name: "Test University".to_string(),
            country: "Australia".to_string(),
            city: Some(city.to_string()),
            rank: Some(50),
            tuition_usd: Some(30000),
            strengths: vec!["Engineering".to_string()],
            tags: vec![],
            intl_rate: Some(0.3),
            scholarship_available: None,
            website: None,
            metadata: Default::default(),
            fields: MarketFields::Australia(fields),
        }
    }

    #[test]
    fn test_city_alias_match() {
        let mut profile = PreferenceProfile::default();
        profile.australia.city_preferences = vec!["悉尼".to_string()];

        let sydney = australian("Sydney", AustraliaFields::default());
        let perth = australian("Perth", AustraliaFields::default());

        assert_eq!(
            locality_matches(LocalityRule::AustraliaCity, &sydney, &profile),
            Some(true)
        );
        assert_eq!(
            locality_matches(LocalityRule::AustraliaCity, &perth, &profile),
            Some(false)
        );
    }

    #[test]
    fn test_wil_gain_follows_career_focus() {
        let registry = RubricRegistry::builtin().unwrap();
        let rubric = registry.get(Market::Australia).unwrap();
        let spec = rubric.dimension(DimensionKind::WorkIntegratedLearning).unwrap();

        let mut profile = PreferenceProfile::default();
        profile.australia.career_focus = CareerFocus::InternshipLabel;
        let candidate = australian(
            "Sydney",
            AustraliaFields {
                work_integrated_learning: Some(true),
                placement_rate: Some(0.5),
                ..Default::default()
            },
        );

        let inputs = resolve_inputs(rubric, spec, &candidate, &profile);
        assert_eq!(inputs.gain, 1.3);
        assert_eq!(inputs.flag, Some(true));
        assert_eq!(inputs.value, Some(0.5));
    }

    #[test]
    fn test_early_intake_detection() {
        assert!(has_early_intake("Feb, Jul"));
        assert!(has_early_intake("July"));
        assert!(!has_early_intake("Nov"));
        assert!(has_early_intake("2024 Feb"));
        assert!(has_early_intake("Semester 2 (July)"));
        assert!(has_early_intake("2025年2月"));
        assert!(!has_early_intake("12月, 11月"));
    }

    #[test]
    fn test_bond_free_defaults() {
        assert!(bond_free(None));
        assert!(bond_free(Some(0.0)));
        assert!(!bond_free(Some(3.0)));

        let candidate = University {
            fields: MarketFields::Singapore(SingaporeFields {
                interview_required: Some(true),
                ..Default::default()
            }),
            ..australian("Singapore", AustraliaFields::default())
        };
        assert_eq!(candidate_flag(&candidate, Flag::InterviewRequired), Some(true));
        assert_eq!(candidate_flag(&candidate, Flag::TuitionGrant), None);
    }
}
