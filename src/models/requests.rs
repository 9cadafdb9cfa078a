use crate::models::profile::PreferenceProfile;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Request to build a shortlist
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindMatchesRequest {
    #[validate(custom(function = "validate_profile"))]
    pub profile: PreferenceProfile,
    #[serde(default)]
    #[validate(range(min = 1, max = 200))]
    pub limit: Option<u16>,
}

fn validate_profile(profile: &PreferenceProfile) -> Result<(), ValidationError> {
    match profile.target_market.as_deref().map(str::trim) {
        Some(market) if !market.is_empty() => {}
        _ => return Err(ValidationError::new("target_market_required")),
    }
    if profile.interests.len() > 20 {
        return Err(ValidationError::new("too_many_interests"));
    }
    Ok(())
}
