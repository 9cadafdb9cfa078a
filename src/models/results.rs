use crate::models::domain::University;
use crate::rubric::{DimensionKind, RelaxationKind};
use crate::models::domain::Market;
use serde::{Deserialize, Serialize};

/// One ranked candidate with its score breakdown and explanation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub id: String,
    pub name: String,
    pub country: String,
    pub city: Option<String>,
    pub rank: Option<u32>,
    pub tuition_usd: Option<u32>,
    pub website: Option<String>,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    /// 0-100, two decimals
    pub score: f64,
    pub breakdown: Vec<DimensionScore>,
    pub explanations: Vec<Explanation>,
    pub explanation_status: ExplanationStatus,
}

impl MatchResult {
    pub fn new(candidate: &University, score: f64, breakdown: Vec<DimensionScore>) -> Self {
        Self {
            id: candidate.id.clone(),
            name: candidate.name.clone(),
            country: candidate.country.clone(),
            city: candidate.city.clone(),
            rank: candidate.rank,
            tuition_usd: candidate.tuition_usd,
            website: candidate.website.clone(),
            metadata: candidate.metadata.clone(),
            score,
            breakdown,
            explanations: Vec::new(),
            explanation_status: ExplanationStatus::Complete,
        }
    }

    pub fn points(&self, kind: DimensionKind) -> Option<f64> {
        self.breakdown
            .iter()
            .find(|d| d.dimension == kind)
            .map(|d| d.points)
    }
}

/// Points earned on one dimension against its cap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub dimension: DimensionKind,
    pub points: f64,
    pub cap: f64,
}

/// Explanation entry; `dimension` is `None` for the fallback annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub dimension: Option<DimensionKind>,
    pub fact: String,
    pub preference: String,
    pub verdict: Verdict,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Meets,
    PartiallyMeets,
    DoesNotMeet,
    NotApplicable,
    Unknown,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Meets => "meets",
            Verdict::PartiallyMeets => "partially meets",
            Verdict::DoesNotMeet => "does not meet",
            Verdict::NotApplicable => "not applicable",
            Verdict::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplanationStatus {
    Complete,
    /// Explanation could not be rendered; the list is empty
    Degraded,
}

/// Which relaxations fired, in order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FallbackReport {
    pub applied: bool,
    pub steps: Vec<String>,
    pub kinds: Vec<RelaxationKind>,
}

impl FallbackReport {
    pub fn record(&mut self, label: String, kind: RelaxationKind) {
        self.applied = true;
        self.steps.push(label);
        self.kinds.push(kind);
    }
}

/// Everything one matching run produces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub market: Market,
    pub rubric_version: String,
    pub results: Vec<MatchResult>,
    pub fallback: FallbackReport,
    /// In-market candidates considered
    pub pool_size: usize,
    /// Candidates passing the strict hard filters
    pub strict_survivors: usize,
    pub plan: ApplicationPlan,
}

/// Returned results split across application rounds, with a short summary
///
/// Ids keep ranked order inside every bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationPlan {
    pub student_type: StudentType,
    pub approach: Approach,
    pub early_decision: Option<String>,
    pub early_action: Vec<String>,
    pub regular_decision: Vec<String>,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentType {
    AcademicStandout,
    WellRounded,
    Emerging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Approach {
    /// Reach-heavy list centred on top-30 schools
    Ambitious,
    /// Reach, match and safety schools
    Balanced,
    /// Match and safety schools
    Steady,
}
