use crate::app::{ContactService, JewelryTypeService};
use crate::domain::Pagination;
use crate::error::ServiceError;
use crate::infra::config::{Config, StoreBackend};
use crate::storage::{ContactStore, JewelryTypeStore, MemoryStore, PgStore};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

pub const SERVER_ERROR: &str = "Server Error";
pub const VALIDATION_ERROR: &str = "Validation Error";

#[derive(Clone)]
pub struct AppState {
    pub jewelry_types: JewelryTypeService,
    pub contacts: ContactService,
}

impl AppState {
    /// Wires both services to one backend holding both collections.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: JewelryTypeStore + ContactStore + 'static,
    {
        Self {
            jewelry_types: JewelryTypeService::new(store.clone()),
            contacts: ContactService::new(store),
        }
    }

    /// Opens the configured backend, creating the Postgres schema if needed.
    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        match &config.store {
            StoreBackend::Postgres {
                database_url,
                max_connections,
            } => {
                let store = PgStore::connect(database_url, *max_connections).await?;
                store.ensure_schema().await?;
                tracing::info!(max_connections, "connected to postgres");
                Ok(Self::from_store(Arc::new(store)))
            }
            StoreBackend::Memory => {
                tracing::warn!("using in-memory store; data is lost on restart");
                Ok(Self::from_store(Arc::new(MemoryStore::new())))
            }
        }
    }
}

/// Envelope shared by every endpoint.
#[derive(Serialize, Debug, Default, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    /// Per-field validation messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    /// Raw failure text of an unexpected error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: JsonValue) -> Self {
        Self {
            success: true,
            data: Some(data),
            ..Default::default()
        }
    }

    pub fn ok_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

pub type ApiResult = Result<(StatusCode, Json<ApiResponse>), ServiceError>;

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ServiceError::NotFound(message) => {
                (StatusCode::NOT_FOUND, ApiResponse::failure(message))
            }
            ServiceError::Duplicate(message) => {
                (StatusCode::BAD_REQUEST, ApiResponse::failure(message))
            }
            ServiceError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ApiResponse {
                    errors: Some(errors),
                    ..ApiResponse::failure(VALIDATION_ERROR)
                },
            ),
            ServiceError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, ApiResponse::failure(message))
            }
            ServiceError::Unexpected(err) => {
                tracing::error!(error = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse {
                        error: Some(err.to_string()),
                        ..ApiResponse::failure(SERVER_ERROR)
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Maps a body that failed to parse onto the 400 envelope.
pub fn invalid_json(err: JsonRejection) -> ServiceError {
    ServiceError::BadRequest(format!("Invalid JSON body: {}", err.body_text()))
}

/// Maps a query string that failed to deserialize onto the 400 envelope.
pub fn invalid_query(err: QueryRejection) -> ServiceError {
    ServiceError::BadRequest(format!("Invalid query string: {}", err.body_text()))
}

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Words to look for in `type` and `description`.
    pub q: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use serde_json::json;

    async fn render(err: ServiceError) -> (StatusCode, JsonValue) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_errors_list_each_field() {
        let (status, body) = render(ServiceError::Validation(vec![
            "Description is required".to_string(),
        ]))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({
                "success": false,
                "message": "Validation Error",
                "errors": ["Description is required"]
            })
        );
    }

    #[tokio::test]
    async fn unexpected_errors_surface_raw_text() {
        let (status, body) = render(StoreError::InvalidId("abc".to_string()).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Server Error");
        assert_eq!(body["error"], "Cast to id failed for value \"abc\"");
        assert!(body.get("errors").is_none());
    }

    #[tokio::test]
    async fn not_found_has_only_message() {
        let (status, body) = render(ServiceError::NotFound("Jewelry type not found")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({ "success": false, "message": "Jewelry type not found" })
        );
    }
}
