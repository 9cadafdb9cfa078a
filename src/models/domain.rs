use serde::{Deserialize, Serialize};
use std::fmt;

/// Target market a rubric is written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Market {
    Generic,
    Australia,
    UnitedKingdom,
    Singapore,
}

impl Market {
    pub const ALL: [Market; 4] = [
        Market::Generic,
        Market::Australia,
        Market::UnitedKingdom,
        Market::Singapore,
    ];

    /// Parse a declared target market, accepting canonical names and short codes
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "generic" | "us" | "usa" | "united_states" => Some(Market::Generic),
            "australia" | "au" => Some(Market::Australia),
            "united_kingdom" | "uk" | "gb" => Some(Market::UnitedKingdom),
            "singapore" | "sg" => Some(Market::Singapore),
            _ => None,
        }
    }

    /// Country name candidates of this market carry
    pub fn country(&self) -> &'static str {
        match self {
            Market::Generic => "United States",
            Market::Australia => "Australia",
            Market::UnitedKingdom => "United Kingdom",
            Market::Singapore => "Singapore",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Market::Generic => "generic",
            Market::Australia => "au",
            Market::UnitedKingdom => "uk",
            Market::Singapore => "sg",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.country())
    }
}

/// University candidate with common and market-specific data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct University {
    pub id: String,
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default)]
    pub tuition_usd: Option<u32>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "intlRate", alias = "intl_rate", default)]
    pub intl_rate: Option<f64>,
    #[serde(default)]
    pub scholarship_available: Option<bool>,
    #[serde(default)]
    pub website: Option<String>,
    /// Display-only data, passed through untouched
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub fields: MarketFields,
}

impl University {
    /// Whether this candidate belongs to the given market
    pub fn in_market(&self, market: Market) -> bool {
        self.country.trim().eq_ignore_ascii_case(market.country())
    }

    /// Rank with unranked candidates placed behind every ranked one
    pub fn rank_or_sentinel(&self) -> u32 {
        self.rank.unwrap_or(RANK_SENTINEL)
    }

    pub fn generic(&self) -> Option<&GenericFields> {
        match &self.fields {
            MarketFields::Generic(f) => Some(f),
            _ => None,
        }
    }

    pub fn australia(&self) -> Option<&AustraliaFields> {
        match &self.fields {
            MarketFields::Australia(f) => Some(f),
            _ => None,
        }
    }

    pub fn united_kingdom(&self) -> Option<&UnitedKingdomFields> {
        match &self.fields {
            MarketFields::UnitedKingdom(f) => Some(f),
            _ => None,
        }
    }

    pub fn singapore(&self) -> Option<&SingaporeFields> {
        match &self.fields {
            MarketFields::Singapore(f) => Some(f),
            _ => None,
        }
    }
}

/// Rank used when a candidate has none; falls outside every band
pub const RANK_SENTINEL: u32 = 9999;

/// Scoring-field shape, one per market
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "market", rename_all = "snake_case")]
pub enum MarketFields {
    Generic(GenericFields),
    Australia(AustraliaFields),
    UnitedKingdom(UnitedKingdomFields),
    Singapore(SingaporeFields),
    /// No market data supplied
    None,
}

impl Default for MarketFields {
    fn default() -> Self {
        MarketFields::None
    }
}

impl MarketFields {
    pub fn market(&self) -> Option<Market> {
        match self {
            MarketFields::Generic(_) => Some(Market::Generic),
            MarketFields::Australia(_) => Some(Market::Australia),
            MarketFields::UnitedKingdom(_) => Some(Market::UnitedKingdom),
            MarketFields::Singapore(_) => Some(Market::Singapore),
            MarketFields::None => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchoolType {
    Public,
    Private,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenericFields {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub school_type: Option<SchoolType>,
    #[serde(default)]
    pub has_internship_program: Option<bool>,
    #[serde(default)]
    pub has_research_program: Option<bool>,
    #[serde(default)]
    pub supports_early_decision: Option<bool>,
    #[serde(default)]
    pub supports_early_action: Option<bool>,
    #[serde(default)]
    pub acceptance_rate: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AustraliaFields {
    #[serde(default)]
    pub group_of_eight: Option<bool>,
    #[serde(default)]
    pub work_integrated_learning: Option<bool>,
    #[serde(default)]
    pub placement_rate: Option<f64>,
    #[serde(default)]
    pub post_study_visa_years: Option<f64>,
    #[serde(default)]
    pub requires_english_test: Option<bool>,
    #[serde(default)]
    pub english_requirements: Option<String>,
    #[serde(default)]
    pub study_length_years: Option<f64>,
    /// Free-text intake months, e.g. "Feb, Jul"
    #[serde(default)]
    pub intakes: Option<String>,
}

/// UCAS application deadline class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UcasDeadline {
    /// 15 October
    OxbridgeMedicine,
    /// 31 January
    Main,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitedKingdomFields {
    #[serde(default)]
    pub russell_group: Option<bool>,
    #[serde(default)]
    pub placement_year_available: Option<bool>,
    #[serde(default)]
    pub foundation_available: Option<bool>,
    #[serde(default)]
    pub ucas_deadline: Option<UcasDeadline>,
    #[serde(default)]
    pub admissions_tests: Option<String>,
    #[serde(default)]
    pub personal_statement_weight: Option<u8>,
    #[serde(default)]
    pub interview_required: Option<bool>,
    #[serde(default)]
    pub study_length_years: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SingaporeFields {
    #[serde(default)]
    pub tuition_grant_available: Option<bool>,
    #[serde(default)]
    pub tuition_grant_bond_years: Option<f64>,
    #[serde(default)]
    pub interview_required: Option<bool>,
    #[serde(default)]
    pub essay_or_portfolio_required: Option<bool>,
    #[serde(default)]
    pub coop_or_internship_required: Option<bool>,
    #[serde(default)]
    pub industry_links_score: Option<u8>,
    #[serde(default)]
    pub exchange_opportunities_score: Option<u8>,
    #[serde(default)]
    pub safety_score: Option<f64>,
}
