//! In-memory stand-in for `DBClient` used by service-level tests.

use std::borrow::Cow;
use std::error::Error;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::error::{BoxDynError, DatabaseError, ErrorKind};

use super::referraldb::ReferralExt;
use super::signupdb::{NewSignup, SignupExt};
use crate::models::referralmodel::{
    Referral, ReferralStats, ReferredUser, RewardStatus, RewardType,
};
use crate::models::signupmodel::{PricingTier, Signup};

/// Mimics Postgres raising `23505` on a unique constraint.
#[derive(Debug)]
struct FakeUniqueViolation {
    constraint: &'static str,
}

impl std::fmt::Display for FakeUniqueViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "duplicate key value violates unique constraint")
    }
}

impl Error for FakeUniqueViolation {}

impl DatabaseError for FakeUniqueViolation {
    fn message(&self) -> &str {
        "duplicate key value violates unique constraint"
    }

    fn code(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed("23505"))
    }

    fn constraint(&self) -> Option<&str> {
        Some(self.constraint)
    }

    fn as_error(&self) -> &(dyn Error + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn Error + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> BoxDynError {
        self
    }

    fn kind(&self) -> ErrorKind {
        ErrorKind::UniqueViolation
    }
}

fn unique_violation(constraint: &'static str) -> sqlx::Error {
    sqlx::Error::Database(Box::new(FakeUniqueViolation { constraint }))
}

#[derive(Default)]
pub struct MockDb {
    pub signups: Mutex<Vec<Signup>>,
    pub referrals: Mutex<Vec<Referral>>,
    next_signup_id: AtomicI64,
    next_referral_id: AtomicI64,
    /// Lookups performed through `get_signup_by_referral_code`.
    pub code_lookup_calls: AtomicUsize,
    /// Pretend every candidate code is already taken.
    pub all_codes_taken: AtomicBool,
    /// Fail the next N `save_signup` calls with a code unique violation.
    pub force_code_collisions: AtomicUsize,
    pub fail_create_referral: AtomicBool,
}

impl MockDb {
    pub fn new() -> Self {
        MockDb::default()
    }

    pub fn seed_signup(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        own_referral_code: Option<&str>,
    ) -> Signup {
        let signup = Signup {
            id: self.next_signup_id.fetch_add(1, Ordering::SeqCst) + 1,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            phone: None,
            facility_name: "Sunrise Care Home".to_string(),
            facility_type: "assisted_living".to_string(),
            resident_count: 30,
            pricing_tier: PricingTier::Starter,
            interested_features: None,
            additional_needs: None,
            used_referral_code: None,
            own_referral_code: own_referral_code.map(str::to_string),
            utm_source: None,
            utm_medium: None,
            utm_campaign: None,
            utm_term: None,
            utm_content: None,
            created_at: Utc::now(),
        };

        self.signups.lock().unwrap().push(signup.clone());
        signup
    }

    pub fn seed_referral(&self, referrer_signup_id: i64, referred_signup_id: i64, code: &str) -> Referral {
        let referral = Referral {
            id: self.next_referral_id.fetch_add(1, Ordering::SeqCst) + 1,
            referrer_signup_id,
            referred_signup_id,
            referral_code: code.to_string(),
            reward_status: RewardStatus::Pending,
            reward_type: RewardType::Discount,
            reward_value: "5%".to_string(),
            created_at: Utc::now(),
        };

        self.referrals.lock().unwrap().push(referral.clone());
        referral
    }
}

#[async_trait]
impl SignupExt for MockDb {
    async fn save_signup(&self, signup: &NewSignup<'_>) -> Result<Signup, sqlx::Error> {
        if self
            .force_code_collisions
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(unique_violation("signups_own_referral_code_key"));
        }

        let mut signups = self.signups.lock().unwrap();

        if signups.iter().any(|s| s.email == signup.email) {
            return Err(unique_violation("signups_email_key"));
        }
        if signups
            .iter()
            .any(|s| s.own_referral_code.as_deref() == Some(signup.own_referral_code))
        {
            return Err(unique_violation("signups_own_referral_code_key"));
        }

        let row = Signup {
            id: self.next_signup_id.fetch_add(1, Ordering::SeqCst) + 1,
            first_name: signup.first_name.to_string(),
            last_name: signup.last_name.to_string(),
            email: signup.email.to_string(),
            phone: signup.phone.map(str::to_string),
            facility_name: signup.facility_name.to_string(),
            facility_type: signup.facility_type.to_string(),
            resident_count: signup.resident_count,
            pricing_tier: signup.pricing_tier,
            interested_features: signup.interested_features.map(str::to_string),
            additional_needs: signup.additional_needs.map(str::to_string),
            used_referral_code: signup.used_referral_code.map(str::to_string),
            own_referral_code: Some(signup.own_referral_code.to_string()),
            utm_source: signup.utm_source.map(str::to_string),
            utm_medium: signup.utm_medium.map(str::to_string),
            utm_campaign: signup.utm_campaign.map(str::to_string),
            utm_term: signup.utm_term.map(str::to_string),
            utm_content: signup.utm_content.map(str::to_string),
            created_at: Utc::now(),
        };

        signups.push(row.clone());
        Ok(row)
    }

    async fn get_signup(
        &self,
        signup_id: Option<i64>,
        email: Option<&str>,
    ) -> Result<Option<Signup>, sqlx::Error> {
        let signups = self.signups.lock().unwrap();

        if let Some(signup_id) = signup_id {
            return Ok(signups.iter().find(|s| s.id == signup_id).cloned());
        }
        if let Some(email) = email {
            return Ok(signups.iter().find(|s| s.email == email).cloned());
        }

        Ok(None)
    }

    async fn get_signup_by_referral_code(
        &self,
        referral_code: &str,
    ) -> Result<Option<Signup>, sqlx::Error> {
        self.code_lookup_calls.fetch_add(1, Ordering::SeqCst);

        if self.all_codes_taken.load(Ordering::SeqCst) {
            return Ok(Some(Signup {
                id: 0,
                first_name: "Taken".to_string(),
                last_name: "Code".to_string(),
                email: "taken@harmonycare.io".to_string(),
                phone: None,
                facility_name: "Taken".to_string(),
                facility_type: "assisted_living".to_string(),
                resident_count: 1,
                pricing_tier: PricingTier::Starter,
                interested_features: None,
                additional_needs: None,
                used_referral_code: None,
                own_referral_code: Some(referral_code.to_string()),
                utm_source: None,
                utm_medium: None,
                utm_campaign: None,
                utm_term: None,
                utm_content: None,
                created_at: Utc::now(),
            }));
        }

        Ok(self
            .signups
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.own_referral_code.as_deref() == Some(referral_code))
            .cloned())
    }

    async fn update_signup_referral_code(
        &self,
        signup_id: i64,
        referral_code: String,
    ) -> Result<Signup, sqlx::Error> {
        let mut signups = self.signups.lock().unwrap();

        let signup = signups
            .iter_mut()
            .find(|s| s.id == signup_id)
            .ok_or(sqlx::Error::RowNotFound)?;

        signup.own_referral_code = Some(referral_code);
        Ok(signup.clone())
    }

    async fn get_signups(&self, page: u32, limit: usize) -> Result<Vec<Signup>, sqlx::Error> {
        let signups = self.signups.lock().unwrap();
        let offset = (page as usize - 1) * limit;

        Ok(signups.iter().skip(offset).take(limit).cloned().collect())
    }

    async fn get_all_signups(&self) -> Result<Vec<Signup>, sqlx::Error> {
        Ok(self.signups.lock().unwrap().clone())
    }

    async fn get_signup_count(&self) -> Result<i64, sqlx::Error> {
        Ok(self.signups.lock().unwrap().len() as i64)
    }
}

#[async_trait]
impl ReferralExt for MockDb {
    async fn create_referral(
        &self,
        referrer_signup_id: i64,
        referred_signup_id: i64,
        referral_code: &str,
        reward_value: &str,
    ) -> Result<Referral, sqlx::Error> {
        if self.fail_create_referral.load(Ordering::SeqCst) {
            return Err(sqlx::Error::RowNotFound);
        }

        let referral = Referral {
            id: self.next_referral_id.fetch_add(1, Ordering::SeqCst) + 1,
            referrer_signup_id,
            referred_signup_id,
            referral_code: referral_code.to_string(),
            reward_status: RewardStatus::Pending,
            reward_type: RewardType::Discount,
            reward_value: reward_value.to_string(),
            created_at: Utc::now(),
        };

        self.referrals.lock().unwrap().push(referral.clone());
        Ok(referral)
    }

    async fn count_referrals_by_referrer(&self, signup_id: i64) -> Result<i64, sqlx::Error> {
        Ok(self
            .referrals
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.referrer_signup_id == signup_id)
            .count() as i64)
    }

    async fn get_referral_by_referred(
        &self,
        referred_signup_id: i64,
    ) -> Result<Option<Referral>, sqlx::Error> {
        Ok(self
            .referrals
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.referred_signup_id == referred_signup_id)
            .cloned())
    }

    async fn get_referral_stats(&self, signup_id: i64) -> Result<ReferralStats, sqlx::Error> {
        let referrals = self.referrals.lock().unwrap();
        let signups = self.signups.lock().unwrap();

        let mine: Vec<&Referral> = referrals
            .iter()
            .filter(|r| r.referrer_signup_id == signup_id)
            .collect();

        let referred_users = mine
            .iter()
            .filter_map(|r| {
                signups
                    .iter()
                    .find(|s| s.id == r.referred_signup_id)
                    .map(|s| ReferredUser {
                        id: s.id,
                        first_name: s.first_name.clone(),
                        last_name: s.last_name.clone(),
                        email: s.email.clone(),
                        facility_name: s.facility_name.clone(),
                        joined_at: r.created_at,
                    })
            })
            .collect();

        Ok(ReferralStats {
            total_referrals: mine.len() as i64,
            referred_users,
        })
    }

    async fn get_all_referrals(&self) -> Result<Vec<Referral>, sqlx::Error> {
        Ok(self.referrals.lock().unwrap().clone())
    }
}
