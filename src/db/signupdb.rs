use async_trait::async_trait;

use super::db::DBClient;

use crate::models::signupmodel::{PricingTier, Signup};

/// Storage-side input for a new signup row. The own referral code is minted
/// by the caller; uniqueness is enforced by the `signups_own_referral_code_key`
/// constraint.
#[derive(Debug, Clone)]
pub struct NewSignup<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub facility_name: &'a str,
    pub facility_type: &'a str,
    pub resident_count: i32,
    pub pricing_tier: PricingTier,
    pub interested_features: Option<&'a str>,
    pub additional_needs: Option<&'a str>,
    pub used_referral_code: Option<&'a str>,
    pub own_referral_code: &'a str,
    pub utm_source: Option<&'a str>,
    pub utm_medium: Option<&'a str>,
    pub utm_campaign: Option<&'a str>,
    pub utm_term: Option<&'a str>,
    pub utm_content: Option<&'a str>,
}

#[async_trait]
pub trait SignupExt {
    async fn save_signup(&self, signup: &NewSignup<'_>) -> Result<Signup, sqlx::Error>;

    async fn get_signup(
        &self,
        signup_id: Option<i64>,
        email: Option<&str>,
    ) -> Result<Option<Signup>, sqlx::Error>;

    async fn get_signup_by_referral_code(
        &self,
        referral_code: &str,
    ) -> Result<Option<Signup>, sqlx::Error>;

    async fn update_signup_referral_code(
        &self,
        signup_id: i64,
        referral_code: String,
    ) -> Result<Signup, sqlx::Error>;

    async fn get_signups(&self, page: u32, limit: usize) -> Result<Vec<Signup>, sqlx::Error>;

    async fn get_all_signups(&self) -> Result<Vec<Signup>, sqlx::Error>;

    async fn get_signup_count(&self) -> Result<i64, sqlx::Error>;
}

#[async_trait]
impl SignupExt for DBClient {
    async fn save_signup(&self, signup: &NewSignup<'_>) -> Result<Signup, sqlx::Error> {
        sqlx::query_as::<_, Signup>(
            r#"
            INSERT INTO signups (
                first_name, last_name, email, phone,
                facility_name, facility_type, resident_count, pricing_tier,
                interested_features, additional_needs,
                used_referral_code, own_referral_code,
                utm_source, utm_medium, utm_campaign, utm_term, utm_content
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING
                id, first_name, last_name, email, phone,
                facility_name, facility_type, resident_count, pricing_tier,
                interested_features, additional_needs,
                used_referral_code, own_referral_code,
                utm_source, utm_medium, utm_campaign, utm_term, utm_content,
                created_at
            "#,
        )
        .bind(signup.first_name)
        .bind(signup.last_name)
        .bind(signup.email)
        .bind(signup.phone)
        .bind(signup.facility_name)
        .bind(signup.facility_type)
        .bind(signup.resident_count)
        .bind(signup.pricing_tier)
        .bind(signup.interested_features)
        .bind(signup.additional_needs)
        .bind(signup.used_referral_code)
        .bind(signup.own_referral_code)
        .bind(signup.utm_source)
        .bind(signup.utm_medium)
        .bind(signup.utm_campaign)
        .bind(signup.utm_term)
        .bind(signup.utm_content)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_signup(
        &self,
        signup_id: Option<i64>,
        email: Option<&str>,
    ) -> Result<Option<Signup>, sqlx::Error> {
        let mut signup: Option<Signup> = None;

        if let Some(signup_id) = signup_id {
            signup = sqlx::query_as::<_, Signup>(
                r#"
                SELECT
                    id, first_name, last_name, email, phone,
                    facility_name, facility_type, resident_count, pricing_tier,
                    interested_features, additional_needs,
                    used_referral_code, own_referral_code,
                    utm_source, utm_medium, utm_campaign, utm_term, utm_content,
                    created_at
                FROM signups
                WHERE id = $1
                "#,
            )
            .bind(signup_id)
            .fetch_optional(&self.pool)
            .await?;
        } else if let Some(email) = email {
            signup = sqlx::query_as::<_, Signup>(
                r#"
                SELECT
                    id, first_name, last_name, email, phone,
                    facility_name, facility_type, resident_count, pricing_tier,
                    interested_features, additional_needs,
                    used_referral_code, own_referral_code,
                    utm_source, utm_medium, utm_campaign, utm_term, utm_content,
                    created_at
                FROM signups
                WHERE email = $1
                "#,
            )
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        }

        Ok(signup)
    }

    async fn get_signup_by_referral_code(
        &self,
        referral_code: &str,
    ) -> Result<Option<Signup>, sqlx::Error> {
        sqlx::query_as::<_, Signup>(
            r#"
            SELECT
                id, first_name, last_name, email, phone,
                facility_name, facility_type, resident_count, pricing_tier,
                interested_features, additional_needs,
                used_referral_code, own_referral_code,
                utm_source, utm_medium, utm_campaign, utm_term, utm_content,
                created_at
            FROM signups
            WHERE own_referral_code = $1
            "#,
        )
        .bind(referral_code)
        .fetch_optional(&self.pool)
        .await
    }

    async fn update_signup_referral_code(
        &self,
        signup_id: i64,
        referral_code: String,
    ) -> Result<Signup, sqlx::Error> {
        sqlx::query_as::<_, Signup>(
            r#"
            UPDATE signups
            SET own_referral_code = $1
            WHERE id = $2
            RETURNING
                id, first_name, last_name, email, phone,
                facility_name, facility_type, resident_count, pricing_tier,
                interested_features, additional_needs,
                used_referral_code, own_referral_code,
                utm_source, utm_medium, utm_campaign, utm_term, utm_content,
                created_at
            "#,
        )
        .bind(referral_code)
        .bind(signup_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_signups(&self, page: u32, limit: usize) -> Result<Vec<Signup>, sqlx::Error> {
        let offset = (page - 1) * limit as u32;

        sqlx::query_as::<_, Signup>(
            r#"
            SELECT
                id, first_name, last_name, email, phone,
                facility_name, facility_type, resident_count, pricing_tier,
                interested_features, additional_needs,
                used_referral_code, own_referral_code,
                utm_source, utm_medium, utm_campaign, utm_term, utm_content,
                created_at
            FROM signups
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_all_signups(&self) -> Result<Vec<Signup>, sqlx::Error> {
        sqlx::query_as::<_, Signup>(
            r#"
            SELECT
                id, first_name, last_name, email, phone,
                facility_name, facility_type, resident_count, pricing_tier,
                interested_features, additional_needs,
                used_referral_code, own_referral_code,
                utm_source, utm_medium, utm_campaign, utm_term, utm_content,
                created_at
            FROM signups
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn get_signup_count(&self) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM signups")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
