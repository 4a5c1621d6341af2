//! Jewelry type operations: list, fetch, create, update, delete, toggle and search.
//!
//! The duplicate check and the following write are two separate store calls. Two concurrent
//! requests whose `type` differs only in case can therefore both pass the check.

use crate::domain::jewelry_type::{validate_changes, validate_new};
use crate::domain::{JewelryType, JewelryTypeInput, JewelryTypeQuery, Page};
use crate::error::{ServiceError, ServiceResult, StoreResult};
use crate::storage::JewelryTypeStore;
use chrono::Utc;
use std::sync::Arc;

pub const NOT_FOUND: &str = "Jewelry type not found";
pub const ALREADY_EXISTS: &str = "Jewelry type already exists";
pub const QUERY_REQUIRED: &str = "Search query is required";

#[derive(Clone)]
pub struct JewelryTypeService {
    store: Arc<dyn JewelryTypeStore>,
}

impl JewelryTypeService {
    pub fn new(store: Arc<dyn JewelryTypeStore>) -> Self {
        Self { store }
    }

    pub async fn ping(&self) -> StoreResult<()> {
        self.store.ping().await
    }

    pub async fn list(&self, query: &JewelryTypeQuery) -> ServiceResult<Page<JewelryType>> {
        tracing::debug!(?query, "listing jewelry types");
        let items = self
            .store
            .find(&query.filter, query.sort, query.page)
            .await?;
        let total = self.store.count(&query.filter).await?;
        Ok(Page {
            items,
            pagination: query.page.pagination(total),
        })
    }

    pub async fn get(&self, id: &str) -> ServiceResult<JewelryType> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(NOT_FOUND))
    }

    pub async fn create(&self, input: JewelryTypeInput) -> ServiceResult<JewelryType> {
        let input = input.trimmed();

        if let Some(kind) = input.kind.as_deref().filter(|k| !k.is_empty()) {
            if self.store.find_by_type_ignore_case(kind, None).await?.is_some() {
                return Err(ServiceError::Duplicate(ALREADY_EXISTS));
            }
        }

        let draft = validate_new(&input).map_err(ServiceError::Validation)?;
        let record = self.store.insert(draft, Utc::now()).await?;
        tracing::info!(id = %record.id, kind = %record.kind, "jewelry type created");
        Ok(record)
    }

    /// Partial update of `type`, `description` and `image`; absent fields stay unchanged.
    pub async fn update(&self, id: &str, input: JewelryTypeInput) -> ServiceResult<JewelryType> {
        let input = input.trimmed();

        if let Some(kind) = input.kind.as_deref().filter(|k| !k.is_empty()) {
            if self
                .store
                .find_by_type_ignore_case(kind, Some(id))
                .await?
                .is_some()
            {
                return Err(ServiceError::Duplicate(ALREADY_EXISTS));
            }
        }

        let changes = validate_changes(&input).map_err(ServiceError::Validation)?;
        let record = self
            .store
            .update(id, &changes, Utc::now())
            .await?
            .ok_or(ServiceError::NotFound(NOT_FOUND))?;
        tracing::info!(id = %record.id, "jewelry type updated");
        Ok(record)
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        let removed = self
            .store
            .delete(id)
            .await?
            .ok_or(ServiceError::NotFound(NOT_FOUND))?;
        tracing::info!(id = %removed.id, kind = %removed.kind, "jewelry type deleted");
        Ok(())
    }

    /// Flips `isActive` and refreshes `updatedAt`.
    pub async fn toggle_status(&self, id: &str) -> ServiceResult<JewelryType> {
        let current = self.get(id).await?;
        let record = self
            .store
            .set_active(id, !current.is_active, Utc::now())
            .await?
            .ok_or(ServiceError::NotFound(NOT_FOUND))?;
        tracing::info!(id = %record.id, is_active = record.is_active, "jewelry type toggled");
        Ok(record)
    }

    /// Word search over `type` and `description`, best match first. No pagination.
    pub async fn search(&self, q: Option<&str>) -> ServiceResult<Vec<JewelryType>> {
        let q = match q {
            Some(q) if !q.is_empty() => q,
            _ => return Err(ServiceError::BadRequest(QUERY_REQUIRED.to_string())),
        };
        tracing::debug!(q, "searching jewelry types");
        Ok(self.store.text_search(q).await?)
    }
}
