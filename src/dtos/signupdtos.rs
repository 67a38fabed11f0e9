use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::signupmodel::{PricingTier, Signup};

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct CreateSignupDto {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(length(min = 7, max = 20, message = "Phone number must be between 7-20 characters"))]
    pub phone: Option<String>,

    #[validate(length(min = 1, message = "Facility name is required"))]
    pub facility_name: String,

    #[validate(length(min = 1, message = "Facility type is required"))]
    pub facility_type: String,

    #[validate(range(min = 1, message = "Resident count must be a positive number"))]
    pub resident_count: i32,

    pub pricing_tier: PricingTier,

    #[serde(default)]
    pub interested_features: Vec<String>,

    pub additional_needs: Option<String>,

    pub referral_code: Option<String>,

    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_term: Option<String>,
    pub utm_content: Option<String>,
}

#[derive(Serialize, Deserialize, Validate)]
pub struct RequestQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,
}

#[derive(Serialize, Deserialize)]
pub struct Response {
    pub status: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterSignupDto {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub facility_name: String,
    pub facility_type: String,
    pub resident_count: i32,
    pub pricing_tier: String,
    pub interested_features: Vec<String>,
    pub additional_needs: Option<String>,
    pub used_referral_code: Option<String>,
    pub own_referral_code: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl FilterSignupDto {
    pub fn filter_signup(signup: &Signup) -> Self {
        FilterSignupDto {
            id: signup.id,
            first_name: signup.first_name.to_owned(),
            last_name: signup.last_name.to_owned(),
            email: signup.email.to_owned(),
            phone: signup.phone.clone(),
            facility_name: signup.facility_name.to_owned(),
            facility_type: signup.facility_type.to_owned(),
            resident_count: signup.resident_count,
            pricing_tier: signup.pricing_tier.to_str().to_string(),
            interested_features: signup
                .interested_features
                .as_deref()
                .and_then(|raw| serde_json::from_str(raw).ok())
                .unwrap_or_default(),
            additional_needs: signup.additional_needs.clone(),
            used_referral_code: signup.used_referral_code.clone(),
            own_referral_code: signup.own_referral_code.clone(),
            created_at: signup.created_at,
        }
    }

    pub fn filter_signups(signups: &[Signup]) -> Vec<FilterSignupDto> {
        signups.iter().map(FilterSignupDto::filter_signup).collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignupListResponseDto {
    pub status: String,
    pub signups: Vec<FilterSignupDto>,
    pub results: i64,
}
