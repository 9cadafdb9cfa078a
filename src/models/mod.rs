// Model exports
pub mod domain;
pub mod profile;
pub mod requests;
pub mod responses;
pub mod results;

pub use domain::{
    AustraliaFields, GenericFields, Market, MarketFields, SchoolType, SingaporeFields,
    UcasDeadline, UnitedKingdomFields, University, RANK_SENTINEL,
};
pub use profile::{
    AcademicBand, ApplicationRound, BondAcceptance, BudgetTolerance, CareerFocus,
    EnglishReadiness, IntakePreference, Level, MainConcern, Orientation, PreferenceProfile,
    ReputationPreference, Requirement, SchoolTypePreference, StudyLengthPreference, UcasRoute,
};
pub use requests::FindMatchesRequest;
pub use responses::{
    ErrorResponse, FindMatchesResponse, HealthResponse, MarketSummary, MarketsResponse,
};
pub use results::{
    ApplicationPlan, Approach, DimensionScore, Explanation, ExplanationStatus, FallbackReport,
    MatchOutcome, MatchResult, StudentType, Verdict,
};
