use crate::error::StoreError;
use crate::transport::http::types::{ApiResponse, AppState};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

pub const UNAVAILABLE: &str = "Service unavailable";

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy (store reachable)", body = ApiResponse),
        (status = 503, description = "Service is unhealthy (store unreachable)", body = ApiResponse)
    )
)]
pub async fn healthcheck_handler(State(state): State<AppState>) -> impl IntoResponse {
    let probe = match state.jewelry_types.ping().await {
        Ok(()) => state.contacts.ping().await,
        Err(e) => Err(e),
    };

    match probe {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::ok(serde_json::json!({ "status": "ok" }))),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, Json(unhealthy(&e)))
        }
    }
}

fn unhealthy(err: &StoreError) -> ApiResponse {
    ApiResponse {
        data: Some(serde_json::json!({ "status": "unhealthy" })),
        error: Some(format!("Store ping failed: {}", err)),
        ..ApiResponse::failure(UNAVAILABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unhealthy_body_carries_message_and_cause() {
        let err = StoreError::Database(sqlx::Error::PoolTimedOut);
        let body = serde_json::to_value(unhealthy(&err)).unwrap();
        assert_eq!(
            body,
            json!({
                "success": false,
                "message": "Service unavailable",
                "data": { "status": "unhealthy" },
                "error": format!("Store ping failed: {}", err)
            })
        );
    }
}
