//! In-process store backend.
//!
//! Mirrors the Postgres backend's observable behaviour (id parsing, case-sensitive unique
//! `type`, ordering, word search) closely enough to stand in for it in tests and local runs.

use crate::domain::{
    Contact, ContactFilter, ContactStatus, JewelryType, JewelryTypeChanges, JewelryTypeFilter,
    NewContact, NewJewelryType, PageRequest, SortDirection, SortField, SortSpec,
};
use crate::error::{StoreError, StoreResult};
use crate::storage::{parse_id, ContactStore, JewelryTypeStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashSet;
use tokio::sync::RwLock;
use uuid::Uuid;

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "in", "is", "it", "of", "on",
    "or", "that", "the", "to", "with",
];

#[derive(Default)]
pub struct MemoryStore {
    jewelry_types: RwLock<Vec<JewelryType>>,
    contacts: RwLock<Vec<Contact>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_filter(record: &JewelryType, filter: &JewelryTypeFilter) -> bool {
    if let Some(active) = filter.is_active {
        if record.is_active != active {
            return false;
        }
    }
    if let Some(needle) = &filter.type_contains {
        if !record.kind.to_lowercase().contains(&needle.to_lowercase()) {
            return false;
        }
    }
    true
}

fn compare(a: &JewelryType, b: &JewelryType, sort: SortSpec) -> Ordering {
    let primary = match sort.field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Type => a.kind.cmp(&b.kind),
        SortField::Description => a.description.cmp(&b.description),
        SortField::Image => a.image.cmp(&b.image),
        SortField::IsActive => a.is_active.cmp(&b.is_active),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    };
    let primary = match sort.direction {
        SortDirection::Asc => primary,
        SortDirection::Desc => primary.reverse(),
    };
    primary
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

fn window<T>(items: Vec<T>, page: PageRequest) -> Vec<T> {
    let skip = usize::try_from(page.skip()).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);
    items.into_iter().skip(skip).take(limit).collect()
}

/// Lowercased words with a light plural stem, stop words removed.
fn terms(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| stem(&w.to_lowercase()))
        .filter(|w| !STOP_WORDS.contains(&w.as_str()))
        .collect()
}

fn stem(word: &str) -> String {
    if word.len() > 4 && word.ends_with("ies") {
        format!("{}y", &word[..word.len() - 3])
    } else if word.len() > 3 && word.ends_with('s') && !word.ends_with("ss") {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}

fn score(record: &JewelryType, wanted: &HashSet<String>) -> usize {
    terms(&record.kind)
        .into_iter()
        .chain(terms(&record.description))
        .filter(|t| wanted.contains(t))
        .count()
}

fn ensure_unique_type(
    records: &[JewelryType],
    kind: &str,
    except: Option<Uuid>,
) -> StoreResult<()> {
    let clash = records
        .iter()
        .any(|r| r.kind == kind && Some(r.id) != except);
    if clash {
        return Err(StoreError::UniqueViolation {
            field: "type",
            value: kind.to_string(),
        });
    }
    Ok(())
}

#[async_trait]
impl JewelryTypeStore for MemoryStore {
    async fn find(
        &self,
        filter: &JewelryTypeFilter,
        sort: SortSpec,
        page: PageRequest,
    ) -> StoreResult<Vec<JewelryType>> {
        let records = self.jewelry_types.read().await;
        let mut matched: Vec<JewelryType> = records
            .iter()
            .filter(|r| matches_filter(r, filter))
            .cloned()
            .collect();
        matched.sort_by(|a, b| compare(a, b, sort));
        Ok(window(matched, page))
    }

    async fn count(&self, filter: &JewelryTypeFilter) -> StoreResult<u64> {
        let records = self.jewelry_types.read().await;
        Ok(records.iter().filter(|r| matches_filter(r, filter)).count() as u64)
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<JewelryType>> {
        let id = parse_id(id)?;
        let records = self.jewelry_types.read().await;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_type_ignore_case(
        &self,
        kind: &str,
        exclude_id: Option<&str>,
    ) -> StoreResult<Option<JewelryType>> {
        let exclude = exclude_id.map(parse_id).transpose()?;
        let wanted = kind.to_lowercase();
        let records = self.jewelry_types.read().await;
        Ok(records
            .iter()
            .find(|r| r.kind.to_lowercase() == wanted && Some(r.id) != exclude)
            .cloned())
    }

    async fn insert(&self, draft: NewJewelryType, now: DateTime<Utc>) -> StoreResult<JewelryType> {
        let mut records = self.jewelry_types.write().await;
        ensure_unique_type(&records, &draft.kind, None)?;
        let record = JewelryType {
            id: Uuid::new_v4(),
            kind: draft.kind,
            description: draft.description,
            image: draft.image,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: &str,
        changes: &JewelryTypeChanges,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<Option<JewelryType>> {
        let id = parse_id(id)?;
        let mut records = self.jewelry_types.write().await;
        if let Some(kind) = &changes.kind {
            if records.iter().any(|r| r.id == id) {
                ensure_unique_type(&records, kind, Some(id))?;
            }
        }
        Ok(records.iter_mut().find(|r| r.id == id).map(|record| {
            changes.apply(record);
            record.updated_at = updated_at;
            record.clone()
        }))
    }

    async fn set_active(
        &self,
        id: &str,
        is_active: bool,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<Option<JewelryType>> {
        let id = parse_id(id)?;
        let mut records = self.jewelry_types.write().await;
        Ok(records.iter_mut().find(|r| r.id == id).map(|record| {
            record.is_active = is_active;
            record.updated_at = updated_at;
            record.clone()
        }))
    }

    async fn delete(&self, id: &str) -> StoreResult<Option<JewelryType>> {
        let id = parse_id(id)?;
        let mut records = self.jewelry_types.write().await;
        Ok(records
            .iter()
            .position(|r| r.id == id)
            .map(|idx| records.remove(idx)))
    }

    async fn text_search(&self, query: &str) -> StoreResult<Vec<JewelryType>> {
        let wanted: HashSet<String> = terms(query).into_iter().collect();
        if wanted.is_empty() {
            return Ok(Vec::new());
        }
        let records = self.jewelry_types.read().await;
        let mut scored: Vec<(usize, JewelryType)> = records
            .iter()
            .map(|r| (score(r, &wanted), r))
            .filter(|(s, _)| *s > 0)
            .map(|(s, r)| (s, r.clone()))
            .collect();
        scored.sort_by(|(sa, a), (sb, b)| sb.cmp(sa).then_with(|| a.kind.cmp(&b.kind)));
        Ok(scored.into_iter().map(|(_, r)| r).collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    async fn find(&self, filter: &ContactFilter, page: PageRequest) -> StoreResult<Vec<Contact>> {
        let contacts = self.contacts.read().await;
        let mut matched: Vec<Contact> = contacts
            .iter()
            .filter(|c| filter.status.map_or(true, |s| c.status == s))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(window(matched, page))
    }

    async fn count(&self, filter: &ContactFilter) -> StoreResult<u64> {
        let contacts = self.contacts.read().await;
        Ok(contacts
            .iter()
            .filter(|c| filter.status.map_or(true, |s| c.status == s))
            .count() as u64)
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Contact>> {
        let id = parse_id(id)?;
        let contacts = self.contacts.read().await;
        Ok(contacts.iter().find(|c| c.id == id).cloned())
    }

    async fn insert(&self, draft: NewContact, now: DateTime<Utc>) -> StoreResult<Contact> {
        let contact = Contact {
            id: Uuid::new_v4(),
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            subject: draft.subject,
            message: draft.message,
            status: ContactStatus::New,
            created_at: now,
            updated_at: now,
        };
        self.contacts.write().await.push(contact.clone());
        Ok(contact)
    }

    async fn set_status(
        &self,
        id: &str,
        status: ContactStatus,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<Option<Contact>> {
        let id = parse_id(id)?;
        let mut contacts = self.contacts.write().await;
        Ok(contacts.iter_mut().find(|c| c.id == id).map(|contact| {
            contact.status = status;
            contact.updated_at = updated_at;
            contact.clone()
        }))
    }

    async fn delete(&self, id: &str) -> StoreResult<Option<Contact>> {
        let id = parse_id(id)?;
        let mut contacts = self.contacts.write().await;
        Ok(contacts
            .iter()
            .position(|c| c.id == id)
            .map(|idx| contacts.remove(idx)))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
