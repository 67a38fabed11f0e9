use async_trait::async_trait;

use super::mails;
use super::sendmail::MailError;
use crate::service::rewards::RewardTier;

/// Notification side effects of the signup workflow. All four sends are
/// fire-and-forget from the caller's point of view; the trait exists so the
/// orchestrator can be exercised with a recording mock.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_welcome(&self, to_email: &str, first_name: &str) -> Result<(), MailError>;

    async fn send_referral_welcome(
        &self,
        to_email: &str,
        first_name: &str,
        referral_code: &str,
    ) -> Result<(), MailError>;

    async fn send_referrer_success(
        &self,
        to_email: &str,
        first_name: &str,
        referred_name: &str,
        total_referrals: i64,
    ) -> Result<(), MailError>;

    async fn send_milestone(
        &self,
        to_email: &str,
        first_name: &str,
        tier: &RewardTier,
        total_referrals: i64,
    ) -> Result<(), MailError>;
}

/// Delivers through the Resend HTTP API.
#[derive(Debug, Default, Clone)]
pub struct ResendNotifier;

#[async_trait]
impl Notifier for ResendNotifier {
    async fn send_welcome(&self, to_email: &str, first_name: &str) -> Result<(), MailError> {
        mails::send_welcome_email(to_email, first_name).await
    }

    async fn send_referral_welcome(
        &self,
        to_email: &str,
        first_name: &str,
        referral_code: &str,
    ) -> Result<(), MailError> {
        mails::send_referral_welcome_email(to_email, first_name, referral_code).await
    }

    async fn send_referrer_success(
        &self,
        to_email: &str,
        first_name: &str,
        referred_name: &str,
        total_referrals: i64,
    ) -> Result<(), MailError> {
        mails::send_referrer_success_email(to_email, first_name, referred_name, total_referrals)
            .await
    }

    async fn send_milestone(
        &self,
        to_email: &str,
        first_name: &str,
        tier: &RewardTier,
        total_referrals: i64,
    ) -> Result<(), MailError> {
        mails::send_milestone_email(to_email, first_name, tier, total_referrals).await
    }
}

#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum SentMail {
    Welcome {
        to: String,
    },
    ReferralWelcome {
        to: String,
        referral_code: String,
    },
    ReferrerSuccess {
        to: String,
        total_referrals: i64,
    },
    Milestone {
        to: String,
        tier_id: &'static str,
        total_referrals: i64,
    },
}

/// Records every send instead of delivering anything.
#[cfg(test)]
#[derive(Default)]
pub struct MockNotifier {
    pub sent: std::sync::Mutex<Vec<SentMail>>,
    pub fail_all: std::sync::atomic::AtomicBool,
}

#[cfg(test)]
impl MockNotifier {
    pub fn new() -> Self {
        MockNotifier::default()
    }

    fn record(&self, mail: SentMail) -> Result<(), MailError> {
        if self.fail_all.load(std::sync::atomic::Ordering::SeqCst) {
            return Err("mail outage".into());
        }

        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

#[cfg(test)]
#[async_trait]
impl Notifier for MockNotifier {
    async fn send_welcome(&self, to_email: &str, _first_name: &str) -> Result<(), MailError> {
        self.record(SentMail::Welcome {
            to: to_email.to_string(),
        })
    }

    async fn send_referral_welcome(
        &self,
        to_email: &str,
        _first_name: &str,
        referral_code: &str,
    ) -> Result<(), MailError> {
        self.record(SentMail::ReferralWelcome {
            to: to_email.to_string(),
            referral_code: referral_code.to_string(),
        })
    }

    async fn send_referrer_success(
        &self,
        to_email: &str,
        _first_name: &str,
        _referred_name: &str,
        total_referrals: i64,
    ) -> Result<(), MailError> {
        self.record(SentMail::ReferrerSuccess {
            to: to_email.to_string(),
            total_referrals,
        })
    }

    async fn send_milestone(
        &self,
        to_email: &str,
        _first_name: &str,
        tier: &RewardTier,
        total_referrals: i64,
    ) -> Result<(), MailError> {
        self.record(SentMail::Milestone {
            to: to_email.to_string(),
            tier_id: tier.id,
            total_referrals,
        })
    }
}
