use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{admin::admin_handler, referral::referral_handler, signup::signup_handler},
    middleware::auth,
    AppState,
};

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_route = Router::new()
        .nest("/signups", signup_handler())
        .nest("/referral", referral_handler())
        .nest(
            "/admin",
            admin_handler().layer(middleware::from_fn(auth)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::db::DBClient;
    use crate::mail::notifier::ResendNotifier;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    fn test_config() -> Config {
        Config {
            database_url: String::new(),
            app_url: "http://localhost:5173".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_maxage: 60,
            port: 8000,
            from_email: "HarmonyCare <noreply@harmonycare.io>".to_string(),
        }
    }

    /// A pool that never connects; these tests only cover routes that fail
    /// before touching storage.
    fn test_app() -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/harmonycare_test")
            .unwrap();

        let app_state = Arc::new(AppState {
            env: test_config(),
            db_client: Arc::new(DBClient::new(pool)),
            mailer: Arc::new(ResendNotifier),
        });

        create_router(app_state)
    }

    #[tokio::test]
    async fn health_check_responds_ok() {
        let res = test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn blank_code_validation_needs_no_database() {
        let res = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/referral/validate?code=")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);

        let body = axum::body::to_bytes(res.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["valid"], false);
    }

    #[tokio::test]
    async fn my_referrals_requires_a_token() {
        let res = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/referral/my-referrals")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_analytics_requires_a_token() {
        let res = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/admin/analytics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_analytics_rejects_non_admin_tokens() {
        let config = test_config();
        let token = crate::utils::token::create_token(
            "member@harmonycare.io",
            "member",
            config.jwt_secret.as_bytes(),
            config.jwt_maxage,
        )
        .unwrap();

        let res = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/admin/analytics")
                    .header("Authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn malformed_signup_input_is_rejected_up_front() {
        let body = serde_json::json!({
            "first_name": "Amara",
            "last_name": "Diallo",
            "email": "not-an-email",
            "facility_name": "Maple Grove",
            "facility_type": "assisted_living",
            "resident_count": 48,
            "pricing_tier": "professional"
        });

        let res = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/signups")
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
