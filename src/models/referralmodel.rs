use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "reward_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RewardStatus {
    Pending,
    Applied,
    Claimed,
}

impl RewardStatus {
    pub fn to_str(&self) -> &str {
        match self {
            RewardStatus::Pending => "pending",
            RewardStatus::Applied => "applied",
            RewardStatus::Claimed => "claimed",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "reward_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RewardType {
    Discount,
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Referral {
    pub id: i64,
    pub referrer_signup_id: i64,
    pub referred_signup_id: i64,
    pub referral_code: String,
    pub reward_status: RewardStatus,
    pub reward_type: RewardType,
    pub reward_value: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ReferralStats {
    pub total_referrals: i64,
    pub referred_users: Vec<ReferredUser>,
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct ReferredUser {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub facility_name: String,
    pub joined_at: DateTime<Utc>,
}
