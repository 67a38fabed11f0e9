use std::sync::Arc;

use axum::{response::IntoResponse, routing::post, Extension, Json, Router};
use validator::Validate;

use crate::{
    dtos::signupdtos::{CreateSignupDto, Response},
    error::HttpError,
    service::signup_service::process_signup,
    AppState,
};

pub fn signup_handler() -> Router {
    Router::new().route("/", post(create_signup))
}

pub async fn create_signup(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreateSignupDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let signup = process_signup(
        app_state.db_client.as_ref(),
        app_state.mailer.as_ref(),
        &body,
    )
    .await?;

    tracing::info!(
        "New founding member signup: {} ({})",
        signup.full_name(),
        signup.email
    );

    Ok(Json(Response {
        status: "success",
        message: "Thank you for joining HarmonyCare as a founding member!".to_string(),
    }))
}
