use chrono::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "pricing_tier", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PricingTier {
    Starter,
    Professional,
    Enterprise,
}

impl PricingTier {
    pub fn to_str(&self) -> &str {
        match self {
            PricingTier::Starter => "starter",
            PricingTier::Professional => "professional",
            PricingTier::Enterprise => "enterprise",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Signup {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub facility_name: String,
    pub facility_type: String,
    pub resident_count: i32,
    pub pricing_tier: PricingTier,
    // JSON-serialized list of feature names, written once at signup
    pub interested_features: Option<String>,
    pub additional_needs: Option<String>,

    // Referral fields
    pub used_referral_code: Option<String>,
    pub own_referral_code: Option<String>,

    // Marketing attribution, recorded verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_medium: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_campaign: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_term: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_content: Option<String>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Signup {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
