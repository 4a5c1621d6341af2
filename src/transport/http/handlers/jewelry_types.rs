use crate::domain::query::RawJewelryTypeQuery;
use crate::domain::{JewelryType, JewelryTypeInput, JewelryTypeQuery};
use crate::error::ServiceError;
use crate::transport::http::types::{
    invalid_json, invalid_query, ApiResponse, ApiResult, AppState, SearchQuery,
};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/jewelry-types",
    params(
        ("page" = Option<String>, Query, description = "Page number, default 1"),
        ("limit" = Option<String>, Query, description = "Page size, default 10"),
        ("isActive" = Option<String>, Query, description = "\"true\" or \"false\""),
        ("type" = Option<String>, Query, description = "Case-insensitive substring of type"),
        ("sortBy" = Option<String>, Query, description = "field:direction, e.g. createdAt:desc")
    ),
    responses(
        (status = 200, description = "One page of jewelry types", body = ApiResponse),
        (status = 400, description = "Invalid sort field", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn list_jewelry_types_handler(
    State(state): State<AppState>,
    request: Result<Query<RawJewelryTypeQuery>, QueryRejection>,
) -> ApiResult {
    let Query(raw) = request.map_err(invalid_query)?;
    let query = JewelryTypeQuery::try_from(raw).map_err(ServiceError::BadRequest)?;
    let page = state.jewelry_types.list(&query).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(json!(page.items)).with_pagination(page.pagination)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/jewelry-types/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matches, best first", body = ApiResponse),
        (status = 400, description = "Missing query", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn search_jewelry_types_handler(
    State(state): State<AppState>,
    request: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult {
    let Query(search) = request.map_err(invalid_query)?;
    let hits = state.jewelry_types.search(search.q.as_deref()).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(json!(hits)))))
}

#[utoipa::path(
    get,
    path = "/api/jewelry-types/{id}",
    params(("id" = String, Path, description = "Jewelry type id")),
    responses(
        (status = 200, description = "Jewelry type", body = ApiResponse),
        (status = 404, description = "Not found", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn get_jewelry_type_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult {
    let record = state.jewelry_types.get(&id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(json!(record)))))
}

#[utoipa::path(
    post,
    path = "/api/jewelry-types",
    request_body = JewelryTypeInput,
    responses(
        (status = 201, description = "Created", body = ApiResponse),
        (status = 400, description = "Duplicate type, validation error or invalid JSON", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn create_jewelry_type_handler(
    State(state): State<AppState>,
    request: Result<Json<JewelryTypeInput>, JsonRejection>,
) -> ApiResult {
    let Json(input) = request.map_err(invalid_json)?;
    let record: JewelryType = state.jewelry_types.create(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(json!(record)).with_message("Jewelry type created successfully")),
    ))
}

#[utoipa::path(
    put,
    path = "/api/jewelry-types/{id}",
    params(("id" = String, Path, description = "Jewelry type id")),
    request_body = JewelryTypeInput,
    responses(
        (status = 200, description = "Updated", body = ApiResponse),
        (status = 400, description = "Duplicate type, validation error or invalid JSON", body = ApiResponse),
        (status = 404, description = "Not found", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn update_jewelry_type_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Result<Json<JewelryTypeInput>, JsonRejection>,
) -> ApiResult {
    let Json(input) = request.map_err(invalid_json)?;
    let record = state.jewelry_types.update(&id, input).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(json!(record)).with_message("Jewelry type updated successfully")),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/jewelry-types/{id}",
    params(("id" = String, Path, description = "Jewelry type id")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse),
        (status = 404, description = "Not found", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn delete_jewelry_type_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult {
    state.jewelry_types.delete(&id).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok_message("Jewelry type deleted successfully")),
    ))
}

#[utoipa::path(
    patch,
    path = "/api/jewelry-types/{id}/toggle",
    params(("id" = String, Path, description = "Jewelry type id")),
    responses(
        (status = 200, description = "isActive flipped", body = ApiResponse),
        (status = 404, description = "Not found", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn toggle_jewelry_type_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult {
    let record = state.jewelry_types.toggle_status(&id).await?;
    let verb = if record.is_active { "activated" } else { "deactivated" };
    Ok((
        StatusCode::OK,
        Json(
            ApiResponse::ok(json!(record))
                .with_message(format!("Jewelry type {} successfully", verb)),
        ),
    ))
}
