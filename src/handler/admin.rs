use std::sync::Arc;

use axum::{
    extract::Query, middleware, response::IntoResponse, routing::get, Extension, Json, Router,
};
use validator::Validate;

use crate::{
    db::signupdb::SignupExt,
    dtos::signupdtos::{FilterSignupDto, RequestQueryDto},
    error::HttpError,
    middleware::{role_check, AccountRole},
    service::analytics::referral_analytics,
    AppState,
};

pub fn admin_handler() -> Router {
    Router::new()
        .route(
            "/analytics",
            get(get_analytics).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![AccountRole::Admin])
            })),
        )
        .route(
            "/signups",
            get(get_signups_admin).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![AccountRole::Admin])
            })),
        )
}

pub async fn get_analytics(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let total_signups = app_state
        .db_client
        .get_signup_count()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let analytics = referral_analytics(app_state.db_client.as_ref())
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "total_signups": total_signups,
            "referral_analytics": analytics
        }
    })))
}

pub async fn get_signups_admin(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query_params): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query_params.page.unwrap_or(1);
    let limit = query_params.limit.unwrap_or(10);

    let signups = app_state
        .db_client
        .get_signups(page as u32, limit)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let signup_count = app_state
        .db_client
        .get_signup_count()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "signups": FilterSignupDto::filter_signups(&signups),
            "total_count": signup_count,
            "page": page,
            "limit": limit
        }
    })))
}
