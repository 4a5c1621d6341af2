//! Contact form submissions and their admin-side handling.

use crate::domain::contact::{validate_new, validate_status};
use crate::domain::{Contact, ContactInput, ContactQuery, ContactStatusInput, Page};
use crate::error::{ServiceError, ServiceResult, StoreResult};
use crate::storage::ContactStore;
use chrono::Utc;
use std::sync::Arc;

pub const NOT_FOUND: &str = "Contact not found";

#[derive(Clone)]
pub struct ContactService {
    store: Arc<dyn ContactStore>,
}

impl ContactService {
    pub fn new(store: Arc<dyn ContactStore>) -> Self {
        Self { store }
    }

    pub async fn ping(&self) -> StoreResult<()> {
        self.store.ping().await
    }

    pub async fn submit(&self, input: ContactInput) -> ServiceResult<Contact> {
        let draft = validate_new(&input).map_err(ServiceError::Validation)?;
        let contact = self.store.insert(draft, Utc::now()).await?;
        tracing::info!(id = %contact.id, "contact submitted");
        Ok(contact)
    }

    /// Newest first.
    pub async fn list(&self, query: &ContactQuery) -> ServiceResult<Page<Contact>> {
        tracing::debug!(?query, "listing contacts");
        let items = self.store.find(&query.filter, query.page).await?;
        let total = self.store.count(&query.filter).await?;
        Ok(Page {
            items,
            pagination: query.page.pagination(total),
        })
    }

    pub async fn get(&self, id: &str) -> ServiceResult<Contact> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(NOT_FOUND))
    }

    pub async fn update_status(
        &self,
        id: &str,
        input: ContactStatusInput,
    ) -> ServiceResult<Contact> {
        let status = validate_status(&input).map_err(ServiceError::Validation)?;
        let contact = self
            .store
            .set_status(id, status, Utc::now())
            .await?
            .ok_or(ServiceError::NotFound(NOT_FOUND))?;
        tracing::info!(id = %contact.id, status = %contact.status, "contact status updated");
        Ok(contact)
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        let removed = self
            .store
            .delete(id)
            .await?
            .ok_or(ServiceError::NotFound(NOT_FOUND))?;
        tracing::info!(id = %removed.id, "contact deleted");
        Ok(())
    }
}
