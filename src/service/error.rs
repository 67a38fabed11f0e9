use axum::http::StatusCode;
use thiserror::Error;

use crate::error::HttpError;

#[derive(Error, Debug)]
pub enum SignupError {
    #[error("Invalid referral code")]
    InvalidReferralCode,

    #[error("You cannot use your own referral code")]
    SelfReferral,

    #[error("Email already registered")]
    EmailExists,

    #[error("Unable to allocate a unique referral code")]
    CodeSpaceExhausted,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl SignupError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SignupError::InvalidReferralCode
            | SignupError::SelfReferral
            | SignupError::EmailExists => StatusCode::BAD_REQUEST,

            SignupError::CodeSpaceExhausted | SignupError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<SignupError> for HttpError {
    fn from(error: SignupError) -> Self {
        match error {
            SignupError::InvalidReferralCode
            | SignupError::SelfReferral
            | SignupError::EmailExists => HttpError::bad_request(error.to_string()),

            SignupError::CodeSpaceExhausted => HttpError::server_error(error.to_string()),

            SignupError::Database(_) => HttpError::server_error(error.to_string()),
        }
    }
}
