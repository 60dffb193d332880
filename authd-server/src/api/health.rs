use crate::openapi::HEALTH_TAG;
use crate::state::AppState;
use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

/// Basic health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct Health {
    status: &'static str,
}

/// Basic health check handler
#[utoipa::path(
    get,
    path = "/health",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Service is healthy", body = Health)
    )
)]
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(Health { status: "ok" }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use crate::test_utils::TestFixture;
    use serde_json::json;

    #[tokio::test]
    async fn health_endpoint_is_public() {
        let fixture = TestFixture::new();
        let response = fixture.get("/health", &[]).await;
        response.assert_ok();
        assert_eq!(response.json, json!({ "status": "ok" }));
    }
}
