pub mod router;
pub mod types;
pub mod handlers {
    pub mod contacts;
    pub mod health;
    pub mod jewelry_types;
}

pub use router::{create_router, ApiDoc};
pub use types::{ApiResponse, AppState};
