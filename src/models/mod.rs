pub mod referralmodel;
pub mod signupmodel;
