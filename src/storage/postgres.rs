//! Postgres store backend.

use crate::domain::{
    Contact, ContactFilter, ContactStatus, JewelryType, JewelryTypeChanges, JewelryTypeFilter,
    NewContact, NewJewelryType, PageRequest, SortDirection, SortSpec,
};
use crate::error::{StoreError, StoreResult};
use crate::storage::{parse_id, ContactStore, JewelryTypeStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const JEWELRY_COLUMNS: &str = "id, type, description, image, is_active, created_at, updated_at";
const CONTACT_COLUMNS: &str =
    "id, name, email, phone, subject, message, status, created_at, updated_at";

/// Document the text index and the search query agree on.
const SEARCH_DOCUMENT: &str = "to_tsvector('english', type || ' ' || description)";

/// Postgres error code for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS jewelry_types (
        id UUID PRIMARY KEY,
        type TEXT NOT NULL UNIQUE,
        description TEXT NOT NULL,
        image TEXT NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS jewelry_types_search_idx
        ON jewelry_types USING GIN (to_tsvector('english', type || ' ' || description))",
    "CREATE INDEX IF NOT EXISTS jewelry_types_is_active_idx ON jewelry_types (is_active)",
    "CREATE INDEX IF NOT EXISTS jewelry_types_type_lower_idx ON jewelry_types (lower(type))",
    "CREATE TABLE IF NOT EXISTS contacts (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        phone TEXT,
        subject TEXT,
        message TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'new' CHECK (status IN ('new', 'read', 'replied')),
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS contacts_status_idx ON contacts (status)",
    "CREATE INDEX IF NOT EXISTS contacts_created_at_idx ON contacts (created_at DESC)",
];

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates both tables and their indexes if missing.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn to_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn push_jewelry_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &JewelryTypeFilter) {
    qb.push(" WHERE TRUE");
    if let Some(active) = filter.is_active {
        qb.push(" AND is_active = ").push_bind(active);
    }
    if let Some(needle) = &filter.type_contains {
        qb.push(" AND type ILIKE ")
            .push_bind(format!("%{}%", escape_like(needle)));
    }
}

fn order_by(sort: SortSpec) -> String {
    let collate = if sort.field.is_text() { " COLLATE \"C\"" } else { "" };
    let direction = match sort.direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    };
    format!(
        " ORDER BY {}{} {}, created_at ASC, id ASC",
        sort.field.column(),
        collate,
        direction
    )
}

fn map_type_conflict(err: sqlx::Error, kind: &str) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return StoreError::UniqueViolation {
                field: "type",
                value: kind.to_string(),
            };
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl JewelryTypeStore for PgStore {
    async fn find(
        &self,
        filter: &JewelryTypeFilter,
        sort: SortSpec,
        page: PageRequest,
    ) -> StoreResult<Vec<JewelryType>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM jewelry_types",
            JEWELRY_COLUMNS
        ));
        push_jewelry_filter(&mut qb, filter);
        qb.push(order_by(sort));
        qb.push(" LIMIT ").push_bind(to_i64(page.limit));
        qb.push(" OFFSET ").push_bind(to_i64(page.skip()));

        let rows = qb
            .build_query_as::<JewelryType>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn count(&self, filter: &JewelryTypeFilter) -> StoreResult<u64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM jewelry_types");
        push_jewelry_filter(&mut qb, filter);
        let total: i64 = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(total.max(0) as u64)
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<JewelryType>> {
        let id = parse_id(id)?;
        let sql = format!("SELECT {} FROM jewelry_types WHERE id = $1", JEWELRY_COLUMNS);
        let row = sqlx::query_as::<_, JewelryType>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_type_ignore_case(
        &self,
        kind: &str,
        exclude_id: Option<&str>,
    ) -> StoreResult<Option<JewelryType>> {
        let exclude: Option<Uuid> = exclude_id.map(parse_id).transpose()?;
        let sql = format!(
            "SELECT {} FROM jewelry_types
             WHERE lower(type) = lower($1) AND ($2::uuid IS NULL OR id <> $2)
             LIMIT 1",
            JEWELRY_COLUMNS
        );
        let row = sqlx::query_as::<_, JewelryType>(&sql)
            .bind(kind)
            .bind(exclude)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, draft: NewJewelryType, now: DateTime<Utc>) -> StoreResult<JewelryType> {
        let sql = format!(
            "INSERT INTO jewelry_types (id, type, description, image, is_active, created_at, updated_at)
             VALUES ($1, $2, $3, $4, TRUE, $5, $5)
             RETURNING {}",
            JEWELRY_COLUMNS
        );
        sqlx::query_as::<_, JewelryType>(&sql)
            .bind(Uuid::new_v4())
            .bind(&draft.kind)
            .bind(&draft.description)
            .bind(&draft.image)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_type_conflict(e, &draft.kind))
    }

    async fn update(
        &self,
        id: &str,
        changes: &JewelryTypeChanges,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<Option<JewelryType>> {
        let id = parse_id(id)?;
        let sql = format!(
            "UPDATE jewelry_types
             SET type = COALESCE($2, type),
                 description = COALESCE($3, description),
                 image = COALESCE($4, image),
                 updated_at = $5
             WHERE id = $1
             RETURNING {}",
            JEWELRY_COLUMNS
        );
        sqlx::query_as::<_, JewelryType>(&sql)
            .bind(id)
            .bind(changes.kind.as_deref())
            .bind(changes.description.as_deref())
            .bind(changes.image.as_deref())
            .bind(updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_type_conflict(e, changes.kind.as_deref().unwrap_or_default()))
    }

    async fn set_active(
        &self,
        id: &str,
        is_active: bool,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<Option<JewelryType>> {
        let id = parse_id(id)?;
        let sql = format!(
            "UPDATE jewelry_types SET is_active = $2, updated_at = $3 WHERE id = $1 RETURNING {}",
            JEWELRY_COLUMNS
        );
        let row = sqlx::query_as::<_, JewelryType>(&sql)
            .bind(id)
            .bind(is_active)
            .bind(updated_at)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, id: &str) -> StoreResult<Option<JewelryType>> {
        let id = parse_id(id)?;
        let sql = format!(
            "DELETE FROM jewelry_types WHERE id = $1 RETURNING {}",
            JEWELRY_COLUMNS
        );
        let row = sqlx::query_as::<_, JewelryType>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn text_search(&self, query: &str) -> StoreResult<Vec<JewelryType>> {
        // plainto_tsquery ANDs the words; rewrite to OR so any term matches.
        let sql = format!(
            "WITH q AS (
                 SELECT replace(plainto_tsquery('english', $1)::text, ' & ', ' | ')::tsquery AS query
             )
             SELECT {cols}
             FROM (
                 SELECT j.*, ts_rank({doc}, q.query) AS score
                 FROM jewelry_types j, q
                 WHERE {doc} @@ q.query
             ) ranked
             ORDER BY score DESC, type COLLATE \"C\" ASC",
            cols = JEWELRY_COLUMNS,
            doc = SEARCH_DOCUMENT
        );
        let rows = sqlx::query_as::<_, JewelryType>(&sql)
            .bind(query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl ContactStore for PgStore {
    async fn find(&self, filter: &ContactFilter, page: PageRequest) -> StoreResult<Vec<Contact>> {
        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM contacts", CONTACT_COLUMNS));
        if let Some(status) = filter.status {
            qb.push(" WHERE status = ").push_bind(status.as_str());
        }
        qb.push(" ORDER BY created_at DESC, id ASC");
        qb.push(" LIMIT ").push_bind(to_i64(page.limit));
        qb.push(" OFFSET ").push_bind(to_i64(page.skip()));

        let rows = qb.build_query_as::<Contact>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn count(&self, filter: &ContactFilter) -> StoreResult<u64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM contacts");
        if let Some(status) = filter.status {
            qb.push(" WHERE status = ").push_bind(status.as_str());
        }
        let total: i64 = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(total.max(0) as u64)
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Contact>> {
        let id = parse_id(id)?;
        let sql = format!("SELECT {} FROM contacts WHERE id = $1", CONTACT_COLUMNS);
        let row = sqlx::query_as::<_, Contact>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, draft: NewContact, now: DateTime<Utc>) -> StoreResult<Contact> {
        let sql = format!(
            "INSERT INTO contacts (id, name, email, phone, subject, message, status, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
             RETURNING {}",
            CONTACT_COLUMNS
        );
        let row = sqlx::query_as::<_, Contact>(&sql)
            .bind(Uuid::new_v4())
            .bind(&draft.name)
            .bind(&draft.email)
            .bind(&draft.phone)
            .bind(&draft.subject)
            .bind(&draft.message)
            .bind(ContactStatus::New.as_str())
            .bind(now)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn set_status(
        &self,
        id: &str,
        status: ContactStatus,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<Option<Contact>> {
        let id = parse_id(id)?;
        let sql = format!(
            "UPDATE contacts SET status = $2, updated_at = $3 WHERE id = $1 RETURNING {}",
            CONTACT_COLUMNS
        );
        let row = sqlx::query_as::<_, Contact>(&sql)
            .bind(id)
            .bind(status.as_str())
            .bind(updated_at)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, id: &str) -> StoreResult<Option<Contact>> {
        let id = parse_id(id)?;
        let sql = format!("DELETE FROM contacts WHERE id = $1 RETURNING {}", CONTACT_COLUMNS);
        let row = sqlx::query_as::<_, Contact>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SortField;

    #[test]
    fn like_patterns_are_literal() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("ring"), "ring");
    }

    #[test]
    fn text_sorts_use_byte_order() {
        let sql = order_by(SortSpec::default());
        assert_eq!(sql, " ORDER BY type COLLATE \"C\" ASC, created_at ASC, id ASC");

        let sql = order_by(SortSpec {
            field: SortField::UpdatedAt,
            direction: SortDirection::Desc,
        });
        assert_eq!(sql, " ORDER BY updated_at DESC, created_at ASC, id ASC");
    }
}
