pub mod referraldtos;
pub mod signupdtos;
