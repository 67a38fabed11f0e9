use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::{
    db::{referraldb::ReferralExt, signupdb::SignupExt},
    models::{referralmodel::Referral, signupmodel::Signup},
    service::rewards::current_tier,
};

pub const TOP_REFERRERS_LIMIT: usize = 10;

pub const REFERRALS_BY_DAY_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Serialize)]
pub struct ReferrerStats {
    pub signup_id: i64,
    pub name: String,
    pub email: String,
    pub facility_name: String,
    pub referral_code: Option<String>,
    pub total_referrals: i64,
    pub successful_conversions: i64,
    pub conversion_rate: i64,
    pub current_tier: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct ReferralAnalytics {
    pub total_referrals: i64,
    pub total_referrers: i64,
    pub average_referrals_per_referrer: f64,
    pub conversion_rate: i64,
    pub top_referrers: Vec<ReferrerStats>,
    pub referrals_by_day: BTreeMap<String, i64>,
    pub referrals_by_tier: BTreeMap<String, i64>,
}

/// Loads both tables in full and computes the rollups. Fine at this
/// product's volumes; revisit before the tables grow past what a web request
/// can scan.
pub async fn referral_analytics(
    db: &(impl SignupExt + ReferralExt + Sync),
) -> Result<ReferralAnalytics, sqlx::Error> {
    let signups = db.get_all_signups().await?;
    let referrals = db.get_all_referrals().await?;

    Ok(compute_referral_analytics(&signups, &referrals, Utc::now()))
}

/// Pure rollup over a snapshot of both tables. `now` anchors the trailing
/// referrals-by-day window.
pub fn compute_referral_analytics(
    signups: &[Signup],
    referrals: &[Referral],
    now: DateTime<Utc>,
) -> ReferralAnalytics {
    let total_referrals = referrals.len() as i64;

    // Per-referrer counts, tracking each referrer's earliest conversion for
    // deterministic tie-breaking.
    let mut per_referrer: HashMap<i64, (i64, DateTime<Utc>)> = HashMap::new();
    for referral in referrals {
        per_referrer
            .entry(referral.referrer_signup_id)
            .and_modify(|(count, earliest)| {
                *count += 1;
                if referral.created_at < *earliest {
                    *earliest = referral.created_at;
                }
            })
            .or_insert((1, referral.created_at));
    }

    let total_referrers = per_referrer.len() as i64;

    let average_referrals_per_referrer = if total_referrers == 0 {
        0.0
    } else {
        round_to_1dp(total_referrals as f64 / total_referrers as f64)
    };

    let signups_with_own_code = signups
        .iter()
        .filter(|s| s.own_referral_code.is_some())
        .count() as i64;

    let conversion_rate = if signups_with_own_code == 0 {
        0
    } else {
        (total_referrals as f64 / signups_with_own_code as f64 * 100.0).round() as i64
    };

    let signups_by_id: HashMap<i64, &Signup> = signups.iter().map(|s| (s.id, s)).collect();

    let mut ranked: Vec<(DateTime<Utc>, ReferrerStats)> = per_referrer
        .iter()
        .filter_map(|(&signup_id, &(count, earliest))| {
            signups_by_id.get(&signup_id).map(|signup| {
                // Every recorded referral is a conversion.
                let successful_conversions = count;
                let referrer_conversion_rate = if count == 0 {
                    0
                } else {
                    (successful_conversions as f64 / count as f64 * 100.0).round() as i64
                };

                (
                    earliest,
                    ReferrerStats {
                        signup_id,
                        name: signup.full_name(),
                        email: signup.email.clone(),
                        facility_name: signup.facility_name.clone(),
                        referral_code: signup.own_referral_code.clone(),
                        total_referrals: count,
                        successful_conversions,
                        conversion_rate: referrer_conversion_rate,
                        current_tier: current_tier(count).map(|tier| tier.name),
                    },
                )
            })
        })
        .collect();

    // Descending by volume; ties go to the earliest first conversion, then
    // the lower signup id.
    ranked.sort_by(|(a_earliest, a), (b_earliest, b)| {
        b.total_referrals
            .cmp(&a.total_referrals)
            .then(a_earliest.cmp(b_earliest))
            .then(a.signup_id.cmp(&b.signup_id))
    });

    let top_referrers = ranked
        .into_iter()
        .take(TOP_REFERRERS_LIMIT)
        .map(|(_, stats)| stats)
        .collect();

    let window_start = now - Duration::days(REFERRALS_BY_DAY_WINDOW_DAYS);
    let mut referrals_by_day: BTreeMap<String, i64> = BTreeMap::new();
    for referral in referrals.iter().filter(|r| r.created_at >= window_start) {
        *referrals_by_day
            .entry(referral.created_at.format("%Y-%m-%d").to_string())
            .or_insert(0) += 1;
    }

    // Grouped by the *referred* signup's pricing tier.
    let mut referrals_by_tier: BTreeMap<String, i64> = BTreeMap::new();
    for referral in referrals {
        if let Some(referred) = signups_by_id.get(&referral.referred_signup_id) {
            *referrals_by_tier
                .entry(referred.pricing_tier.to_str().to_string())
                .or_insert(0) += 1;
        }
    }

    ReferralAnalytics {
        total_referrals,
        total_referrers,
        average_referrals_per_referrer,
        conversion_rate,
        top_referrers,
        referrals_by_day,
        referrals_by_tier,
    }
}

fn round_to_1dp(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
