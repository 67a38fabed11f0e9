use crate::{
    db::{
        referraldb::ReferralExt,
        signupdb::{NewSignup, SignupExt},
    },
    dtos::signupdtos::CreateSignupDto,
    mail::notifier::Notifier,
    models::signupmodel::Signup,
    service::{
        error::SignupError,
        referral::{
            generate_referral_code, normalize_referral_code, MAX_CODE_ATTEMPTS,
            REFERRAL_REWARD_VALUE,
        },
        rewards::current_tier,
    },
};

/// Drives one founding-member signup end to end: referral-code validation,
/// own-code allocation, persistence, referral recording and notification
/// emails.
///
/// Only the pre-persistence checks and the signup insert itself can fail the
/// operation. Everything after the insert is best-effort; a signup with a
/// missing referral row or missed email is an accepted outcome.
pub async fn process_signup(
    db: &(impl SignupExt + ReferralExt + Sync),
    mailer: &(impl Notifier + Sync),
    body: &CreateSignupDto,
) -> Result<Signup, SignupError> {
    // One signup per email.
    if db.get_signup(None, Some(&body.email)).await?.is_some() {
        return Err(SignupError::EmailExists);
    }

    // A supplied, non-blank referral code must resolve to a referrer before
    // anything is written.
    let normalized_code = body
        .referral_code
        .as_deref()
        .and_then(normalize_referral_code);

    let mut referrer: Option<Signup> = None;
    if let Some(code) = normalized_code.as_deref() {
        let found = db
            .get_signup_by_referral_code(code)
            .await?
            .ok_or(SignupError::InvalidReferralCode)?;

        if found.email.eq_ignore_ascii_case(&body.email) {
            return Err(SignupError::SelfReferral);
        }

        referrer = Some(found);
    }

    let interested_features = if body.interested_features.is_empty() {
        None
    } else {
        serde_json::to_string(&body.interested_features).ok()
    };

    // The unique constraint on signups.own_referral_code is the authoritative
    // collision guard: mint a code, attempt the insert, and retry with a
    // fresh code when the constraint fires.
    let mut created: Option<Signup> = None;
    for _ in 0..MAX_CODE_ATTEMPTS {
        let own_code = generate_referral_code();

        let new_signup = NewSignup {
            first_name: &body.first_name,
            last_name: &body.last_name,
            email: &body.email,
            phone: body.phone.as_deref(),
            facility_name: &body.facility_name,
            facility_type: &body.facility_type,
            resident_count: body.resident_count,
            pricing_tier: body.pricing_tier,
            interested_features: interested_features.as_deref(),
            additional_needs: body.additional_needs.as_deref(),
            used_referral_code: normalized_code.as_deref(),
            own_referral_code: &own_code,
            utm_source: body.utm_source.as_deref(),
            utm_medium: body.utm_medium.as_deref(),
            utm_campaign: body.utm_campaign.as_deref(),
            utm_term: body.utm_term.as_deref(),
            utm_content: body.utm_content.as_deref(),
        };

        match db.save_signup(&new_signup).await {
            Ok(signup) => {
                created = Some(signup);
                break;
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                // A concurrent signup can still win the email race between the
                // lookup above and this insert.
                if db_err.constraint() == Some("signups_email_key") {
                    return Err(SignupError::EmailExists);
                }

                tracing::debug!("Referral code collision on insert, minting a new code");
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    }

    let signup = created.ok_or(SignupError::CodeSpaceExhausted)?;

    // From here on the signup exists; record the referral and notify, but
    // never fail the operation.
    let mut referral_context: Option<(Signup, i64)> = None;
    if let (Some(referrer), Some(code)) = (referrer, normalized_code.as_deref()) {
        let prior_referrals = match db.count_referrals_by_referrer(referrer.id).await {
            Ok(count) => count,
            Err(e) => {
                tracing::error!(
                    "Failed to load referral count for signup {}: {}",
                    referrer.id,
                    e
                );
                0
            }
        };

        if let Err(e) = db
            .create_referral(referrer.id, signup.id, code, REFERRAL_REWARD_VALUE)
            .await
        {
            tracing::error!(
                "Failed to record referral {} -> {}: {}",
                referrer.id,
                signup.id,
                e
            );
        }

        referral_context = Some((referrer, prior_referrals));
    }

    if let Err(e) = mailer.send_welcome(&signup.email, &signup.first_name).await {
        tracing::warn!("Failed to send welcome email to {}: {}", signup.email, e);
    }

    if let Some(own_code) = signup.own_referral_code.as_deref() {
        if let Err(e) = mailer
            .send_referral_welcome(&signup.email, &signup.first_name, own_code)
            .await
        {
            tracing::warn!(
                "Failed to send referral welcome email to {}: {}",
                signup.email,
                e
            );
        }
    }

    if let Some((referrer, prior_referrals)) = referral_context {
        let total_referrals = prior_referrals + 1;

        if let Err(e) = mailer
            .send_referrer_success(
                &referrer.email,
                &referrer.first_name,
                &signup.full_name(),
                total_referrals,
            )
            .await
        {
            tracing::warn!(
                "Failed to send referral success email to {}: {}",
                referrer.email,
                e
            );
        }

        // Milestone fires only when this conversion crossed a tier threshold.
        let tier_before = current_tier(prior_referrals);
        let tier_after = current_tier(total_referrals);

        if let Some(tier) = tier_after {
            if tier_before.map(|t| t.id) != Some(tier.id) {
                if let Err(e) = mailer
                    .send_milestone(&referrer.email, &referrer.first_name, tier, total_referrals)
                    .await
                {
                    tracing::warn!(
                        "Failed to send milestone email to {}: {}",
                        referrer.email,
                        e
                    );
                }
            }
        }
    }

    Ok(signup)
}
