pub mod analytics;
pub mod error;
pub mod referral;
pub mod rewards;
pub mod signup_service;
