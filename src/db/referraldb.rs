use async_trait::async_trait;
use sqlx::Row;

use super::db::DBClient;

use crate::models::referralmodel::{Referral, ReferralStats, ReferredUser};

#[async_trait]
pub trait ReferralExt {
    async fn create_referral(
        &self,
        referrer_signup_id: i64,
        referred_signup_id: i64,
        referral_code: &str,
        reward_value: &str,
    ) -> Result<Referral, sqlx::Error>;

    async fn count_referrals_by_referrer(&self, signup_id: i64) -> Result<i64, sqlx::Error>;

    async fn get_referral_by_referred(
        &self,
        referred_signup_id: i64,
    ) -> Result<Option<Referral>, sqlx::Error>;

    async fn get_referral_stats(&self, signup_id: i64) -> Result<ReferralStats, sqlx::Error>;

    async fn get_all_referrals(&self) -> Result<Vec<Referral>, sqlx::Error>;
}

#[async_trait]
impl ReferralExt for DBClient {
    async fn create_referral(
        &self,
        referrer_signup_id: i64,
        referred_signup_id: i64,
        referral_code: &str,
        reward_value: &str,
    ) -> Result<Referral, sqlx::Error> {
        sqlx::query_as::<_, Referral>(
            r#"
            INSERT INTO referrals (
                referrer_signup_id, referred_signup_id, referral_code,
                reward_status, reward_type, reward_value
            )
            VALUES ($1, $2, $3, 'pending', 'discount', $4)
            RETURNING
                id, referrer_signup_id, referred_signup_id, referral_code,
                reward_status, reward_type, reward_value, created_at
            "#,
        )
        .bind(referrer_signup_id)
        .bind(referred_signup_id)
        .bind(referral_code)
        .bind(reward_value)
        .fetch_one(&self.pool)
        .await
    }

    async fn count_referrals_by_referrer(&self, signup_id: i64) -> Result<i64, sqlx::Error> {
        let row = sqlx::query("SELECT COUNT(*) as total FROM referrals WHERE referrer_signup_id = $1")
            .bind(signup_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get::<i64, _>("total"))
    }

    async fn get_referral_by_referred(
        &self,
        referred_signup_id: i64,
    ) -> Result<Option<Referral>, sqlx::Error> {
        sqlx::query_as::<_, Referral>(
            r#"
            SELECT
                id, referrer_signup_id, referred_signup_id, referral_code,
                reward_status, reward_type, reward_value, created_at
            FROM referrals
            WHERE referred_signup_id = $1
            "#,
        )
        .bind(referred_signup_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_referral_stats(&self, signup_id: i64) -> Result<ReferralStats, sqlx::Error> {
        let stats = sqlx::query("SELECT COUNT(*) as total_referrals FROM referrals WHERE referrer_signup_id = $1")
            .bind(signup_id)
            .fetch_one(&self.pool)
            .await?;

        let referred_users = sqlx::query_as::<_, ReferredUser>(
            r#"
            SELECT
                s.id,
                s.first_name,
                s.last_name,
                s.email,
                s.facility_name,
                r.created_at as joined_at
            FROM referrals r
            JOIN signups s ON r.referred_signup_id = s.id
            WHERE r.referrer_signup_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(signup_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ReferralStats {
            total_referrals: stats.get::<i64, _>("total_referrals"),
            referred_users,
        })
    }

    async fn get_all_referrals(&self) -> Result<Vec<Referral>, sqlx::Error> {
        sqlx::query_as::<_, Referral>(
            r#"
            SELECT
                id, referrer_signup_id, referred_signup_id, referral_code,
                reward_status, reward_type, reward_value, created_at
            FROM referrals
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}
