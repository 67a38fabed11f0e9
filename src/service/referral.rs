use rand::Rng;

use crate::{
    db::signupdb::SignupExt, models::signupmodel::Signup, service::error::SignupError,
};

pub const REFERRAL_CODE_PREFIX: &str = "HARMONY";

/// Excludes characters easily confused when handwritten or read aloud
/// (0/O, 1/I).
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

const CODE_SUFFIX_LEN: usize = 4;

pub const MAX_CODE_ATTEMPTS: u32 = 10;

/// Reward policy for a successful referral: a flat discount on the
/// referrer's founding-member pricing.
pub const REFERRAL_REWARD_VALUE: &str = "5%";

pub fn generate_referral_code() -> String {
    let mut rng = rand::rng();

    let suffix: String = (0..CODE_SUFFIX_LEN)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect();

    format!("{}-{}", REFERRAL_CODE_PREFIX, suffix)
}

/// Codes are stored uppercase; user input is matched case-insensitively.
/// Empty or whitespace-only input is not a code at all.
pub fn normalize_referral_code(code: &str) -> Option<String> {
    let trimmed = code.trim();

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

/// Resolves a user-supplied code to the signup that owns it. Absence is a
/// normal outcome, not an error. Blank input short-circuits without a
/// storage lookup.
pub async fn validate_referral_code(
    db: &(impl SignupExt + Sync),
    code: &str,
) -> Result<Option<Signup>, sqlx::Error> {
    let Some(normalized) = normalize_referral_code(code) else {
        return Ok(None);
    };

    db.get_signup_by_referral_code(&normalized).await
}

/// Mints a code not currently present in storage, used for the lazy backfill
/// of rows created before codes existed. The retry budget bounds the cost of
/// an improbable run of collisions; the signup-creation path relies on the
/// storage uniqueness constraint instead.
pub async fn generate_unique_referral_code(
    db: &(impl SignupExt + Sync),
) -> Result<String, SignupError> {
    for _ in 0..MAX_CODE_ATTEMPTS {
        let code = generate_referral_code();

        if db.get_signup_by_referral_code(&code).await?.is_none() {
            return Ok(code);
        }
    }

    Err(SignupError::CodeSpaceExhausted)
}

/// Returns the signup's code, minting and persisting one for rows created
/// before codes were assigned at signup time.
pub async fn ensure_own_referral_code(
    db: &(impl SignupExt + Sync),
    signup: &Signup,
) -> Result<String, SignupError> {
    if let Some(code) = signup.own_referral_code.as_deref() {
        return Ok(code.to_string());
    }

    let code = generate_unique_referral_code(db).await?;
    let updated = db.update_signup_referral_code(signup.id, code).await?;

    Ok(updated.own_referral_code.unwrap_or_default())
}

pub fn generate_referral_link(base_url: &str, code: &str) -> String {
    format!("{}/signup?ref={}", base_url, code)
}
