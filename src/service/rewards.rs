use serde::Serialize;

/// A referral milestone level. Distinct from the product pricing tier:
/// reward tiers are unlocked by cumulative successful referrals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RewardTier {
    pub id: &'static str,
    pub name: &'static str,
    pub badge: &'static str,
    pub color: &'static str,
    pub referrals_required: i64,
    pub benefits: &'static [&'static str],
}

/// Ordered by `referrals_required`, strictly increasing.
pub const REWARD_TIERS: [RewardTier; 5] = [
    RewardTier {
        id: "bronze",
        name: "Bronze Advocate",
        badge: "🥉",
        color: "#CD7F32",
        referrals_required: 1,
        benefits: &["1 extra month of founding-member pricing"],
    },
    RewardTier {
        id: "silver",
        name: "Silver Advocate",
        badge: "🥈",
        color: "#C0C0C0",
        referrals_required: 3,
        benefits: &[
            "3 extra months of founding-member pricing",
            "Priority onboarding for your facility",
        ],
    },
    RewardTier {
        id: "gold",
        name: "Gold Advocate",
        badge: "🥇",
        color: "#FFD700",
        referrals_required: 5,
        benefits: &[
            "6 extra months of founding-member pricing",
            "Priority onboarding for your facility",
            "Quarterly roadmap call with the product team",
        ],
    },
    RewardTier {
        id: "platinum",
        name: "Platinum Advocate",
        badge: "🏆",
        color: "#E5E4E2",
        referrals_required: 10,
        benefits: &[
            "12 extra months of founding-member pricing",
            "Dedicated customer success manager",
            "Quarterly roadmap call with the product team",
        ],
    },
    RewardTier {
        id: "diamond",
        name: "Diamond Advocate",
        badge: "💎",
        color: "#B9F2FF",
        referrals_required: 20,
        benefits: &[
            "Lifetime founding-member pricing",
            "Dedicated customer success manager",
            "Advisory board seat invitation",
        ],
    },
];

/// Highest tier whose threshold is <= `referral_count`, if any.
pub fn current_tier(referral_count: i64) -> Option<&'static RewardTier> {
    REWARD_TIERS
        .iter()
        .rev()
        .find(|tier| tier.referrals_required <= referral_count)
}

/// Lowest tier whose threshold is > `referral_count`, if any.
pub fn next_tier(referral_count: i64) -> Option<&'static RewardTier> {
    REWARD_TIERS
        .iter()
        .find(|tier| tier.referrals_required > referral_count)
}

/// Percentage progress from the current tier's threshold (or 0) toward the
/// next tier's threshold. 100 once the top tier is reached.
pub fn progress_to_next_tier(referral_count: i64) -> f64 {
    let previous = current_tier(referral_count)
        .map(|tier| tier.referrals_required)
        .unwrap_or(0);

    let Some(next) = next_tier(referral_count) else {
        return 100.0;
    };

    let progress =
        (referral_count - previous) as f64 / (next.referrals_required - previous) as f64 * 100.0;

    progress.clamp(0.0, 100.0)
}
