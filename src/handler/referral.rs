use std::sync::Arc;

use axum::{
    extract::Query, middleware, response::IntoResponse, routing::get, Extension, Json, Router,
};
use validator::Validate;

use crate::{
    db::{referraldb::ReferralExt, signupdb::SignupExt},
    dtos::referraldtos::{ValidateCodeQueryDto, ValidateCodeResponseDto},
    error::{ErrorMessage, HttpError},
    middleware::{auth, AuthAccount},
    service::{
        referral::{ensure_own_referral_code, generate_referral_link, validate_referral_code},
        rewards::{current_tier, next_tier, progress_to_next_tier},
    },
    AppState,
};

pub fn referral_handler() -> Router {
    let public_routes = Router::new().route("/validate", get(validate_code));

    let protected_routes = Router::new()
        .route("/my-referrals", get(my_referrals))
        .route("/link", get(get_link))
        .route("/status", get(check_status))
        .layer(middleware::from_fn(auth));

    public_routes.merge(protected_routes)
}

pub async fn validate_code(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query_params): Query<ValidateCodeQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let referrer = validate_referral_code(app_state.db_client.as_ref(), &query_params.code)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if referrer.is_some() {
        Ok(Json(ValidateCodeResponseDto {
            valid: true,
            message: "Referral code is valid".to_string(),
        }))
    } else {
        Ok(Json(ValidateCodeResponseDto {
            valid: false,
            message: ErrorMessage::InvalidReferralCode.to_string(),
        }))
    }
}

pub async fn my_referrals(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(account): Extension<AuthAccount>,
) -> Result<impl IntoResponse, HttpError> {
    let signup = app_state
        .db_client
        .get_signup(None, Some(&account.email))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(ErrorMessage::SignupNotFound.to_string()))?;

    let referral_code = ensure_own_referral_code(app_state.db_client.as_ref(), &signup).await?;

    let stats = app_state
        .db_client
        .get_referral_stats(signup.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "referral_code": referral_code,
            "total_referrals": stats.total_referrals,
            "referred_users": stats.referred_users,
            "current_tier": current_tier(stats.total_referrals),
            "next_tier": next_tier(stats.total_referrals),
            "progress_to_next_tier": progress_to_next_tier(stats.total_referrals)
        }
    })))
}

pub async fn get_link(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(account): Extension<AuthAccount>,
) -> Result<impl IntoResponse, HttpError> {
    let signup = app_state
        .db_client
        .get_signup(None, Some(&account.email))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(ErrorMessage::SignupNotFound.to_string()))?;

    let referral_code = ensure_own_referral_code(app_state.db_client.as_ref(), &signup).await?;

    let referral_link = generate_referral_link(&app_state.env.app_url, &referral_code);

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "referral_code": referral_code,
            "referral_link": referral_link
        }
    })))
}

pub async fn check_status(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(account): Extension<AuthAccount>,
) -> Result<impl IntoResponse, HttpError> {
    let signup = app_state
        .db_client
        .get_signup(None, Some(&account.email))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(ErrorMessage::SignupNotFound.to_string()))?;

    let referral = app_state
        .db_client
        .get_referral_by_referred(signup.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let referrer_info = if let Some(ref referral) = referral {
        let referrer = app_state
            .db_client
            .get_signup(Some(referral.referrer_signup_id), None)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?
            .ok_or(HttpError::server_error("Referrer not found"))?;

        Some(serde_json::json!({
            "referrer_name": referrer.full_name(),
            "referrer_facility": referrer.facility_name,
            "reward_status": referral.reward_status.to_str(),
            "referred_at": referral.created_at
        }))
    } else {
        None
    };

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "was_referred": referral.is_some(),
            "referral_info": referrer_info
        }
    })))
}
