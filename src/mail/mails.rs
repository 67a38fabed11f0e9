use super::sendmail::{send_email, MailError};
use crate::service::rewards::RewardTier;

pub async fn send_welcome_email(to_email: &str, first_name: &str) -> Result<(), MailError> {
    let subject = "Welcome to HarmonyCare";
    let template_path = "src/mail/templates/Welcome-email.html";
    let placeholders = vec![("{{first_name}}".to_string(), first_name.to_string())];

    send_email(to_email, subject, template_path, &placeholders).await
}

/// Sent right after signup with the new member's own shareable code.
pub async fn send_referral_welcome_email(
    to_email: &str,
    first_name: &str,
    referral_code: &str,
) -> Result<(), MailError> {
    let subject = "Your HarmonyCare referral code";
    let template_path = "src/mail/templates/Referral-Welcome.html";
    let placeholders = vec![
        ("{{first_name}}".to_string(), first_name.to_string()),
        ("{{referral_code}}".to_string(), referral_code.to_string()),
    ];

    send_email(to_email, subject, template_path, &placeholders).await
}

pub async fn send_referrer_success_email(
    to_email: &str,
    first_name: &str,
    referred_name: &str,
    total_referrals: i64,
) -> Result<(), MailError> {
    let subject = "Your referral just joined HarmonyCare!";
    let template_path = "src/mail/templates/Referral-Success.html";
    let placeholders = vec![
        ("{{first_name}}".to_string(), first_name.to_string()),
        ("{{referred_name}}".to_string(), referred_name.to_string()),
        ("{{total_referrals}}".to_string(), total_referrals.to_string()),
    ];

    send_email(to_email, subject, template_path, &placeholders).await
}

pub async fn send_milestone_email(
    to_email: &str,
    first_name: &str,
    tier: &RewardTier,
    total_referrals: i64,
) -> Result<(), MailError> {
    let subject = format!("You reached {} {}", tier.name, tier.badge);
    let template_path = "src/mail/templates/Milestone-email.html";
    let placeholders = vec![
        ("{{first_name}}".to_string(), first_name.to_string()),
        ("{{tier_name}}".to_string(), tier.name.to_string()),
        ("{{tier_badge}}".to_string(), tier.badge.to_string()),
        ("{{total_referrals}}".to_string(), total_referrals.to_string()),
        ("{{benefits}}".to_string(), tier.benefits.join(", ")),
    ];

    send_email(to_email, &subject, template_path, &placeholders).await
}
