//! Store behaviour against a live Postgres.
//!
//! Needs `DATABASE_URL` (a `.env` file works). Without it the test returns early.
//! The tables are truncated first, so point it at a scratch database.

use chrono::Utc;
use jewelry_catalog_api::domain::query::RawJewelryTypeQuery;
use jewelry_catalog_api::domain::{
    ContactFilter, ContactInput, ContactQuery, ContactStatus, ContactStatusInput, JewelryType,
    JewelryTypeInput, JewelryTypeQuery, NewJewelryType, PageRequest,
};
use jewelry_catalog_api::storage::JewelryTypeStore;
use jewelry_catalog_api::{
    ContactService, JewelryTypeService, PgStore, ServiceError, StoreError,
};
use std::env;
use std::sync::Arc;
use std::time::Duration;

fn input(kind: &str, description: &str) -> JewelryTypeInput {
    JewelryTypeInput {
        kind: Some(kind.to_string()),
        description: Some(description.to_string()),
        image: Some(format!("https://img.example/{}.png", kind.to_lowercase())),
    }
}

fn kinds(records: &[JewelryType]) -> Vec<&str> {
    records.iter().map(|r| r.kind.as_str()).collect()
}

fn query(pairs: &[(&str, &str)]) -> JewelryTypeQuery {
    let get = |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    };
    JewelryTypeQuery::try_from(RawJewelryTypeQuery {
        page: get("page"),
        limit: get("limit"),
        is_active: get("isActive"),
        kind: get("type"),
        sort_by: get("sortBy"),
    })
    .unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_postgres_store() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let Ok(database_url) = env::var("DATABASE_URL") else {
        println!("DATABASE_URL not set, skipping postgres store test");
        return Ok(());
    };

    let store = Arc::new(PgStore::connect(&database_url, 2).await?);
    store.ensure_schema().await?;
    sqlx::query("TRUNCATE jewelry_types, contacts")
        .execute(store.pool())
        .await?;

    let types = JewelryTypeService::new(store.clone());
    let contacts = ContactService::new(store.clone());

    // --- create + case-insensitive duplicate ---
    let ring = types.create(input("Ring", "Plain band")).await?;
    assert!(ring.is_active);
    assert_eq!(ring.created_at, ring.updated_at);
    assert!(matches!(
        types.create(input("ring", "again")).await,
        Err(ServiceError::Duplicate(_))
    ));

    // The table constraint itself is case-sensitive.
    let clash = store
        .insert(
            NewJewelryType {
                kind: "Ring".to_string(),
                description: "direct".to_string(),
                image: "https://img.example/x.png".to_string(),
            },
            Utc::now(),
        )
        .await;
    assert!(matches!(clash, Err(StoreError::UniqueViolation { .. })));

    // --- paging in byte order of type ---
    for kind in ["Earring", "Anklet", "Brooch", "Chain"] {
        types.create(input(kind, "something")).await?;
    }
    let page = types.list(&query(&[("page", "2"), ("limit", "2")])).await?;
    assert_eq!(kinds(&page.items), vec!["Chain", "Earring"]);
    assert_eq!(page.pagination.total, 5);
    assert_eq!(page.pagination.pages, 3);

    let page = types.list(&query(&[("sortBy", "type:desc"), ("limit", "2")])).await?;
    assert_eq!(kinds(&page.items), vec!["Ring", "Earring"]);

    // --- LIKE metacharacters match literally ---
    types.create(input("100%_Silver", "Sterling pieces")).await?;
    let page = types.list(&query(&[("type", "%_")])).await?;
    assert_eq!(kinds(&page.items), vec!["100%_Silver"]);
    let page = types.list(&query(&[("type", "RING")])).await?;
    assert_eq!(kinds(&page.items), vec!["Earring", "Ring"]);

    // --- update: own type allowed, absent fields untouched, collisions rejected ---
    let id = ring.id.to_string();
    tokio::time::sleep(Duration::from_millis(5)).await;
    let renamed = types.update(&id, input("RING", "Plain band")).await?;
    assert_eq!(renamed.kind, "RING");
    assert!(renamed.updated_at > ring.updated_at);

    let described = types
        .update(
            &id,
            JewelryTypeInput {
                description: Some("Worn on fingers".to_string()),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(described.description, "Worn on fingers");
    assert_eq!(described.image, ring.image);
    assert_eq!(described.kind, "RING");

    assert!(matches!(
        types.update(&id, input("chain", "Links")).await,
        Err(ServiceError::Duplicate(_))
    ));

    // --- toggle ---
    let off = types.toggle_status(&id).await?;
    assert!(!off.is_active);
    let page = types.list(&query(&[("isActive", "false")])).await?;
    assert_eq!(kinds(&page.items), vec!["RING"]);
    let on = types.toggle_status(&id).await?;
    assert!(on.is_active);
    assert_eq!(on.created_at, ring.created_at);

    // --- search: any word, ranked, description-only hits included ---
    types
        .create(input("Pendant", "Hangs from a gold chain, gold plated"))
        .await?;
    types.create(input("Bangle", "A gold loop for the wrist")).await?;
    assert_eq!(kinds(&types.search(Some("gold")).await?), vec!["Pendant", "Bangle"]);
    assert_eq!(kinds(&types.search(Some("fingers")).await?), vec!["RING"]);
    assert!(types.search(Some("platinum")).await?.is_empty());

    // --- delete + malformed id ---
    types.delete(&id).await?;
    assert!(matches!(types.get(&id).await, Err(ServiceError::NotFound(_))));
    assert!(matches!(
        types.get("not-an-id").await,
        Err(ServiceError::Unexpected(StoreError::InvalidId(_)))
    ));

    // --- contacts ---
    let contact = contacts
        .submit(ContactInput {
            name: Some("Ada".to_string()),
            email: Some("Ada@Example.com".to_string()),
            message: Some("Do you resize rings?".to_string()),
            ..Default::default()
        })
        .await?;
    assert_eq!(contact.status, ContactStatus::New);
    assert_eq!(contact.email, "ada@example.com");
    assert!(contact.phone.is_none());

    let replied = contacts
        .update_status(
            &contact.id.to_string(),
            ContactStatusInput {
                status: Some("replied".to_string()),
            },
        )
        .await?;
    assert_eq!(replied.status, ContactStatus::Replied);

    let page = contacts
        .list(&ContactQuery {
            page: PageRequest::default(),
            filter: ContactFilter {
                status: Some(ContactStatus::Replied),
            },
        })
        .await?;
    assert_eq!(page.pagination.total, 1);
    assert_eq!(page.items[0].id, contact.id);

    println!("✅ postgres store behaves like the in-memory store");
    Ok(())
}
