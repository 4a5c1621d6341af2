//! Store interfaces for the two collections and their backends.
//!
//! Services only see the traits; a backend is chosen once at startup and injected as
//! `Arc<dyn ...>`, which lets tests run against [`MemoryStore`].

use crate::domain::{
    Contact, ContactFilter, ContactStatus, JewelryType, JewelryTypeChanges, JewelryTypeFilter,
    NewContact, NewJewelryType, PageRequest, SortSpec,
};
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Record ids are UUIDs; anything else is rejected the same way by every backend.
pub(crate) fn parse_id(id: &str) -> StoreResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))
}

/// Query interface over the `jewelry_types` collection.
///
/// Identifiers are passed as received; a backend rejects malformed ones with
/// `StoreError::InvalidId`.
#[async_trait]
pub trait JewelryTypeStore: Send + Sync {
    /// Returns one page of matching records in `sort` order.
    async fn find(
        &self,
        filter: &JewelryTypeFilter,
        sort: SortSpec,
        page: PageRequest,
    ) -> StoreResult<Vec<JewelryType>>;

    async fn count(&self, filter: &JewelryTypeFilter) -> StoreResult<u64>;

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<JewelryType>>;

    /// Finds a record whose `type` equals `kind` ignoring case, optionally skipping one id.
    async fn find_by_type_ignore_case(
        &self,
        kind: &str,
        exclude_id: Option<&str>,
    ) -> StoreResult<Option<JewelryType>>;

    async fn insert(&self, draft: NewJewelryType, now: DateTime<Utc>) -> StoreResult<JewelryType>;

    /// Applies `changes` and stamps `updated_at`. `None` if the id doesn't resolve.
    async fn update(
        &self,
        id: &str,
        changes: &JewelryTypeChanges,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<Option<JewelryType>>;

    async fn set_active(
        &self,
        id: &str,
        is_active: bool,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<Option<JewelryType>>;

    /// Hard delete. Returns the removed record.
    async fn delete(&self, id: &str) -> StoreResult<Option<JewelryType>>;

    /// Word search over `type` and `description`, best match first.
    async fn text_search(&self, query: &str) -> StoreResult<Vec<JewelryType>>;

    async fn ping(&self) -> StoreResult<()>;
}

/// Query interface over the `contacts` collection.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Returns one page of matching contacts, newest first.
    async fn find(&self, filter: &ContactFilter, page: PageRequest) -> StoreResult<Vec<Contact>>;

    async fn count(&self, filter: &ContactFilter) -> StoreResult<u64>;

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Contact>>;

    async fn insert(&self, draft: NewContact, now: DateTime<Utc>) -> StoreResult<Contact>;

    async fn set_status(
        &self,
        id: &str,
        status: ContactStatus,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<Option<Contact>>;

    async fn delete(&self, id: &str) -> StoreResult<Option<Contact>>;

    async fn ping(&self) -> StoreResult<()>;
}
