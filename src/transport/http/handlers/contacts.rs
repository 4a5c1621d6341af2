//! Contact endpoints. Everything except submission is an admin route and is currently
//! served without authentication.

use crate::domain::query::RawContactQuery;
use crate::domain::{ContactInput, ContactQuery, ContactStatusInput};
use crate::error::ServiceError;
use crate::transport::http::types::{invalid_json, invalid_query, ApiResponse, ApiResult, AppState};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

#[utoipa::path(
    post,
    path = "/api/contacts",
    request_body = ContactInput,
    responses(
        (status = 201, description = "Submitted", body = ApiResponse),
        (status = 400, description = "Validation error or invalid JSON", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn submit_contact_handler(
    State(state): State<AppState>,
    request: Result<Json<ContactInput>, JsonRejection>,
) -> ApiResult {
    let Json(input) = request.map_err(invalid_json)?;
    let contact = state.contacts.submit(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(json!(contact)).with_message("Contact submitted successfully")),
    ))
}

#[utoipa::path(
    get,
    path = "/api/contacts",
    params(
        ("page" = Option<String>, Query, description = "Page number, default 1"),
        ("limit" = Option<String>, Query, description = "Page size, default 10"),
        ("status" = Option<String>, Query, description = "new, read or replied")
    ),
    responses(
        (status = 200, description = "One page of contacts, newest first", body = ApiResponse),
        (status = 400, description = "Unknown status", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn list_contacts_handler(
    State(state): State<AppState>,
    request: Result<Query<RawContactQuery>, QueryRejection>,
) -> ApiResult {
    let Query(raw) = request.map_err(invalid_query)?;
    let query = ContactQuery::try_from(raw).map_err(ServiceError::BadRequest)?;
    let page = state.contacts.list(&query).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(json!(page.items)).with_pagination(page.pagination)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/contacts/{id}",
    params(("id" = String, Path, description = "Contact id")),
    responses(
        (status = 200, description = "Contact", body = ApiResponse),
        (status = 404, description = "Not found", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn get_contact_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult {
    let contact = state.contacts.get(&id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(json!(contact)))))
}

#[utoipa::path(
    put,
    path = "/api/contacts/{id}",
    params(("id" = String, Path, description = "Contact id")),
    request_body = ContactStatusInput,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse),
        (status = 400, description = "Missing or unknown status", body = ApiResponse),
        (status = 404, description = "Not found", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn update_contact_status_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Result<Json<ContactStatusInput>, JsonRejection>,
) -> ApiResult {
    let Json(input) = request.map_err(invalid_json)?;
    let contact = state.contacts.update_status(&id, input).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(json!(contact)).with_message("Contact status updated successfully")),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/contacts/{id}",
    params(("id" = String, Path, description = "Contact id")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse),
        (status = 404, description = "Not found", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn delete_contact_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult {
    state.contacts.delete(&id).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok_message("Contact deleted successfully")),
    ))
}
