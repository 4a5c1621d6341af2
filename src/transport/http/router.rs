use crate::domain::{
    Contact, ContactInput, ContactStatus, ContactStatusInput, JewelryType, JewelryTypeInput,
    Pagination,
};
use crate::transport::http::handlers::{contacts, health, jewelry_types};
use crate::transport::http::types::ApiResponse;
use axum::routing::{get, patch};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        jewelry_types::list_jewelry_types_handler,
        jewelry_types::search_jewelry_types_handler,
        jewelry_types::get_jewelry_type_handler,
        jewelry_types::create_jewelry_type_handler,
        jewelry_types::update_jewelry_type_handler,
        jewelry_types::delete_jewelry_type_handler,
        jewelry_types::toggle_jewelry_type_handler,
        contacts::submit_contact_handler,
        contacts::list_contacts_handler,
        contacts::get_contact_handler,
        contacts::update_contact_status_handler,
        contacts::delete_contact_handler
    ),
    components(schemas(
        ApiResponse,
        Pagination,
        JewelryType,
        JewelryTypeInput,
        Contact,
        ContactInput,
        ContactStatus,
        ContactStatusInput
    ))
)]
#[allow(dead_code)]
pub struct ApiDoc;

/// All routes are public. The contact admin routes (everything but submission) carry no
/// authentication yet.
pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route(
            "/api/jewelry-types",
            get(jewelry_types::list_jewelry_types_handler)
                .post(jewelry_types::create_jewelry_type_handler),
        )
        .route(
            "/api/jewelry-types/search",
            get(jewelry_types::search_jewelry_types_handler),
        )
        .route(
            "/api/jewelry-types/:id",
            get(jewelry_types::get_jewelry_type_handler)
                .put(jewelry_types::update_jewelry_type_handler)
                .delete(jewelry_types::delete_jewelry_type_handler),
        )
        .route(
            "/api/jewelry-types/:id/toggle",
            patch(jewelry_types::toggle_jewelry_type_handler),
        )
        .route(
            "/api/contacts",
            get(contacts::list_contacts_handler).post(contacts::submit_contact_handler),
        )
        .route(
            "/api/contacts/:id",
            get(contacts::get_contact_handler)
                .put(contacts::update_contact_status_handler)
                .delete(contacts::delete_contact_handler),
        )
        .with_state(app_state)
}
