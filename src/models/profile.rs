use serde::{Deserialize, Serialize};

/// Parent/student questionnaire answers
///
/// Shared answers sit at the top level; market-specific answers are grouped
/// per market and only read by that market's rubric. Intake has already
/// validated shapes, the engine never re-validates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceProfile {
    #[serde(default)]
    pub target_market: Option<String>,
    #[serde(default)]
    pub academic_band: AcademicBand,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub reputation_vs_value: ReputationPreference,
    #[serde(default)]
    pub budget_usd: Option<u32>,
    #[serde(default)]
    pub budget_tolerance: BudgetTolerance,
    #[serde(default)]
    pub main_concern: Option<MainConcern>,
    #[serde(default)]
    pub intake_preference: IntakePreference,
    #[serde(default = "Level::low")]
    pub scholarship_importance: Level,
    #[serde(default = "Level::medium")]
    pub intl_community_importance: Level,
    /// Region, state or city the family prefers; `None` or "any" means unrestricted
    #[serde(default)]
    pub region_preference: Option<String>,
    #[serde(default)]
    pub hard_budget_must_within: bool,
    #[serde(default)]
    pub hard_rank_within_band: bool,
    #[serde(default)]
    pub generic: GenericAnswers,
    #[serde(default)]
    pub australia: AustraliaAnswers,
    #[serde(default)]
    pub united_kingdom: UnitedKingdomAnswers,
    #[serde(default)]
    pub singapore: SingaporeAnswers,
}

impl Default for PreferenceProfile {
    fn default() -> Self {
        Self {
            target_market: None,
            academic_band: AcademicBand::default(),
            interests: Vec::new(),
            reputation_vs_value: ReputationPreference::default(),
            budget_usd: None,
            budget_tolerance: BudgetTolerance::default(),
            main_concern: None,
            intake_preference: IntakePreference::default(),
            scholarship_importance: Level::Low,
            intl_community_importance: Level::Medium,
            region_preference: None,
            hard_budget_must_within: false,
            hard_rank_within_band: false,
            generic: GenericAnswers::default(),
            australia: AustraliaAnswers::default(),
            united_kingdom: UnitedKingdomAnswers::default(),
            singapore: SingaporeAnswers::default(),
        }
    }
}

impl PreferenceProfile {
    /// Budget ceiling, `None` when no positive budget was stated
    pub fn budget(&self) -> Option<u32> {
        self.budget_usd.filter(|b| *b > 0)
    }

    /// Stated region, ignoring blanks and explicit "any"
    pub fn region(&self) -> Option<&str> {
        self.region_preference
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty() && !is_unrestricted(r))
    }

    /// Whether the user's main concern matches
    pub fn concerned_about(&self, concern: MainConcern) -> bool {
        self.main_concern == Some(concern)
    }
}

/// Tokens meaning "no locality restriction"
pub fn is_unrestricted(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "any" | "anywhere" | "unrestricted" | "no preference" | "不限"
    )
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenericAnswers {
    #[serde(default)]
    pub school_type_preference: SchoolTypePreference,
    #[serde(default = "Level::medium")]
    pub internship_importance: Level,
    #[serde(default)]
    pub application_round: ApplicationRound,
    #[serde(default)]
    pub hard_interest_match: bool,
    #[serde(default)]
    pub hard_school_type: bool,
    #[serde(default)]
    pub hard_region_must_match: bool,
}

impl Default for GenericAnswers {
    fn default() -> Self {
        Self {
            school_type_preference: SchoolTypePreference::default(),
            internship_importance: Level::Medium,
            application_round: ApplicationRound::default(),
            hard_interest_match: false,
            hard_school_type: false,
            hard_region_must_match: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AustraliaAnswers {
    #[serde(default)]
    pub wil_preference: Requirement,
    #[serde(default)]
    pub career_focus: CareerFocus,
    #[serde(default)]
    pub city_preferences: Vec<String>,
    #[serde(default = "Level::low")]
    pub go8_preference: Level,
    #[serde(default = "Level::medium")]
    pub psw_importance: Level,
    #[serde(default)]
    pub english_readiness: EnglishReadiness,
    #[serde(default = "default_true")]
    pub accept_language_course: bool,
    #[serde(default)]
    pub hard_english_required_exclude: bool,
    #[serde(default)]
    pub study_length_preference: StudyLengthPreference,
}

impl Default for AustraliaAnswers {
    fn default() -> Self {
        Self {
            wil_preference: Requirement::default(),
            career_focus: CareerFocus::default(),
            city_preferences: Vec::new(),
            go8_preference: Level::Low,
            psw_importance: Level::Medium,
            english_readiness: EnglishReadiness::default(),
            accept_language_course: true,
            hard_english_required_exclude: false,
            study_length_preference: StudyLengthPreference::default(),
        }
    }
}

impl AustraliaAnswers {
    /// Preferred cities, empty when unrestricted
    pub fn cities(&self) -> Vec<&str> {
        if self.city_preferences.iter().any(|c| is_unrestricted(c)) {
            return Vec::new();
        }
        self.city_preferences
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitedKingdomAnswers {
    #[serde(default)]
    pub ucas_route: UcasRoute,
    #[serde(default)]
    pub foundation_need: Requirement,
    #[serde(default)]
    pub placement_year_pref: Requirement,
    #[serde(default = "Level::medium")]
    pub russell_pref: Level,
    #[serde(default = "Level::medium")]
    pub prep_level: Level,
    #[serde(default)]
    pub oxbridge_must_cover: bool,
}

impl Default for UnitedKingdomAnswers {
    fn default() -> Self {
        Self {
            ucas_route: UcasRoute::default(),
            foundation_need: Requirement::default(),
            placement_year_pref: Requirement::default(),
            russell_pref: Level::Medium,
            prep_level: Level::Medium,
            oxbridge_must_cover: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingaporeAnswers {
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub bond_acceptance: BondAcceptance,
    #[serde(default = "Level::medium")]
    pub interview_portfolio: Level,
    #[serde(default)]
    pub want_double_degree: bool,
    #[serde(default)]
    pub want_exchange: bool,
    #[serde(default = "Level::medium")]
    pub safety_importance: Level,
    #[serde(default)]
    pub tg_must: bool,
    #[serde(default)]
    pub hard_refuse_bond: bool,
    #[serde(default)]
    pub hard_refuse_interview_or_portfolio: bool,
}

impl Default for SingaporeAnswers {
    fn default() -> Self {
        Self {
            orientation: Orientation::default(),
            bond_acceptance: BondAcceptance::default(),
            interview_portfolio: Level::Medium,
            want_double_degree: false,
            want_exchange: false,
            safety_importance: Level::Medium,
            tg_must: false,
            hard_refuse_bond: false,
            hard_refuse_interview_or_portfolio: false,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Self-reported academic tier (GPA band)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AcademicBand {
    #[serde(rename = "3.9+", alias = "top")]
    Top,
    #[serde(rename = "3.8+", alias = "strong")]
    Strong,
    #[serde(rename = "3.6+", alias = "solid")]
    Solid,
    #[default]
    #[serde(rename = "3.6-", alias = "developing")]
    Developing,
}

impl AcademicBand {
    pub fn label(&self) -> &'static str {
        match self {
            AcademicBand::Top => "GPA 3.9+",
            AcademicBand::Strong => "GPA 3.8+",
            AcademicBand::Solid => "GPA 3.6+",
            AcademicBand::Developing => "GPA below 3.6",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReputationPreference {
    Reputation,
    #[default]
    Balanced,
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BudgetTolerance {
    #[default]
    #[serde(rename = "0%", alias = "none")]
    Exact,
    #[serde(rename = "10%")]
    TenPercent,
    #[serde(rename = "20%")]
    TwentyPercent,
}

impl BudgetTolerance {
    pub fn fraction(&self) -> f64 {
        match self {
            BudgetTolerance::Exact => 0.0,
            BudgetTolerance::TenPercent => 0.1,
            BudgetTolerance::TwentyPercent => 0.2,
        }
    }
}

/// What the family worries about most; protects matching constraints from relaxation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MainConcern {
    Region,
    OverBudget,
    Interview,
    Bond,
    Employment,
    Visa,
    Unsure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakePreference {
    Asap,
    WithinTwoYears,
    #[default]
    Undecided,
}

impl IntakePreference {
    pub fn key(&self) -> &'static str {
        match self {
            IntakePreference::Asap => "asap",
            IntakePreference::WithinTwoYears => "within_two_years",
            IntakePreference::Undecided => "undecided",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IntakePreference::Asap => "as soon as possible (6-12 months)",
            IntakePreference::WithinTwoYears => "within 1-2 years",
            IntakePreference::Undecided => "undecided",
        }
    }
}

/// Three-step importance answer shared by many questions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    High,
    Medium,
    Low,
}

impl Level {
    pub fn low() -> Self {
        Level::Low
    }

    pub fn medium() -> Self {
        Level::Medium
    }

    pub fn key(&self) -> &'static str {
        match self {
            Level::High => "high",
            Level::Medium => "medium",
            Level::Low => "low",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Level::High => "very important",
            Level::Medium => "somewhat important",
            Level::Low => "not important",
        }
    }

    /// Reading of the answer as preparation
    pub fn readiness(&self) -> &'static str {
        match self {
            Level::High => "well prepared",
            Level::Medium => "partly prepared",
            Level::Low => "not yet prepared",
        }
    }

    /// Reading of the answer as willingness
    pub fn willingness(&self) -> &'static str {
        match self {
            Level::High => "happy to do them",
            Level::Medium => "open to them",
            Level::Low => "would rather avoid them",
        }
    }
}

/// Must-have / nice-to-have / don't-care answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    Required,
    Bonus,
    #[default]
    NotImportant,
}

impl Requirement {
    pub fn key(&self) -> &'static str {
        match self {
            Requirement::Required => "required",
            Requirement::Bonus => "bonus",
            Requirement::NotImportant => "not_important",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Requirement::Required => "required",
            Requirement::Bonus => "a plus",
            Requirement::NotImportant => "not important",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareerFocus {
    EmploymentReputation,
    InternshipLabel,
    #[default]
    Balanced,
}

impl CareerFocus {
    pub fn key(&self) -> &'static str {
        match self {
            CareerFocus::EmploymentReputation => "employment_reputation",
            CareerFocus::InternshipLabel => "internship_label",
            CareerFocus::Balanced => "balanced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnglishReadiness {
    Ready,
    #[default]
    WithinThreeMonths,
    NeedsLonger,
}

impl EnglishReadiness {
    pub fn label(&self) -> &'static str {
        match self {
            EnglishReadiness::Ready => "already meets the requirement",
            EnglishReadiness::WithinThreeMonths => "can meet it within 3 months",
            EnglishReadiness::NeedsLonger => "needs longer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyLengthPreference {
    Shorter,
    Standard,
    #[default]
    Indifferent,
}

impl StudyLengthPreference {
    pub fn key(&self) -> &'static str {
        match self {
            StudyLengthPreference::Shorter => "shorter",
            StudyLengthPreference::Standard => "standard",
            StudyLengthPreference::Indifferent => "indifferent",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StudyLengthPreference::Shorter => "the shorter the better",
            StudyLengthPreference::Standard => "standard length is fine",
            StudyLengthPreference::Indifferent => "no preference",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UcasRoute {
    OxbridgeMedicine,
    Regular,
    #[default]
    Unsure,
}

impl UcasRoute {
    pub fn key(&self) -> &'static str {
        match self {
            UcasRoute::OxbridgeMedicine => "oxbridge_medicine",
            UcasRoute::Regular => "regular",
            UcasRoute::Unsure => "unsure",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UcasRoute::OxbridgeMedicine => "Oxbridge/medicine (15 Oct deadline)",
            UcasRoute::Regular => "regular route (31 Jan deadline)",
            UcasRoute::Unsure => "not sure yet",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Industry,
    Research,
    #[default]
    Balanced,
}

impl Orientation {
    pub fn key(&self) -> &'static str {
        match self {
            Orientation::Industry => "industry",
            Orientation::Research => "research",
            Orientation::Balanced => "balanced",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Orientation::Industry => "industry-focused",
            Orientation::Research => "research-focused",
            Orientation::Balanced => "balanced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BondAcceptance {
    Willing,
    /// Would rather not take a bond
    Avoid,
    /// Will not take a tuition grant bond at all
    #[serde(alias = "unwilling")]
    Refuse,
    #[default]
    Indifferent,
}

impl BondAcceptance {
    pub fn key(&self) -> &'static str {
        match self {
            BondAcceptance::Willing => "willing",
            BondAcceptance::Avoid => "avoid",
            BondAcceptance::Refuse => "refuse",
            BondAcceptance::Indifferent => "indifferent",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BondAcceptance::Willing => "willing to take a tuition grant bond",
            BondAcceptance::Avoid => "prefers to avoid a bond",
            BondAcceptance::Refuse => "unwilling to take a bond",
            BondAcceptance::Indifferent => "depends on tuition",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchoolTypePreference {
    Public,
    Private,
    #[default]
    Any,
}

impl SchoolTypePreference {
    pub fn key(&self) -> &'static str {
        match self {
            SchoolTypePreference::Public => "public",
            SchoolTypePreference::Private => "private",
            SchoolTypePreference::Any => "any",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationRound {
    EarlyDecision,
    EarlyAction,
    Regular,
    #[default]
    Undecided,
}

impl ApplicationRound {
    pub fn key(&self) -> &'static str {
        match self {
            ApplicationRound::EarlyDecision => "early_decision",
            ApplicationRound::EarlyAction => "early_action",
            ApplicationRound::Regular => "regular",
            ApplicationRound::Undecided => "undecided",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ApplicationRound::EarlyDecision => "Early Decision",
            ApplicationRound::EarlyAction => "Early Action",
            ApplicationRound::Regular => "Regular Decision",
            ApplicationRound::Undecided => "undecided",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_defaults_from_empty_json() {
        let profile: PreferenceProfile = serde_json::from_str("{}").unwrap();

        assert!(profile.target_market.is_none());
        assert_eq!(profile.academic_band, AcademicBand::Developing);
        assert_eq!(profile.scholarship_importance, Level::Low);
        assert!(profile.australia.accept_language_course);
        assert_eq!(profile.united_kingdom.prep_level, Level::Medium);
    }

    #[test]
    fn test_band_and_tolerance_wire_names() {
        let profile: PreferenceProfile = serde_json::from_str(
            r#"{"academic_band": "3.9+", "budget_tolerance": "20%", "budget_usd": 40000}"#,
        )
        .unwrap();

        assert_eq!(profile.academic_band, AcademicBand::Top);
        assert_eq!(profile.budget_tolerance.fraction(), 0.2);
        assert_eq!(profile.budget(), Some(40000));
    }

    #[test]
    fn test_unrestricted_locality() {
        let mut profile = PreferenceProfile::default();
        profile.region_preference = Some("Any".to_string());
        assert!(profile.region().is_none());

        profile.australia.city_preferences = vec!["Sydney".to_string(), "any".to_string()];
        assert!(profile.australia.cities().is_empty());
    }

    #[test]
    fn test_zero_budget_means_no_budget() {
        let mut profile = PreferenceProfile::default();
        profile.budget_usd = Some(0);
        assert!(profile.budget().is_none());
    }
}
