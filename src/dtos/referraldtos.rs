use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Validate)]
pub struct ValidateCodeQueryDto {
    #[validate(length(max = 64, message = "Referral code is too long"))]
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateCodeResponseDto {
    pub valid: bool,
    pub message: String,
}
