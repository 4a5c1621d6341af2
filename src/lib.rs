pub mod app;
pub mod domain;
pub mod error;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::{ContactService, JewelryTypeService};
pub use error::{ServiceError, StoreError};
pub use infra::config::Config;
pub use storage::{MemoryStore, PgStore};
pub use transport::http::AppState;
