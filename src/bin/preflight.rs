//! Checks configuration and store connectivity before the server is started.

use jewelry_catalog_api::domain::{ContactFilter, JewelryTypeFilter};
use jewelry_catalog_api::infra::config::StoreBackend;
use jewelry_catalog_api::infra::logging;
use jewelry_catalog_api::storage::{ContactStore, JewelryTypeStore};
use jewelry_catalog_api::{Config, PgStore};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--skip-schema]\n\
         \n\
         Reads env vars (or .env):\n\
           STORE_BACKEND (postgres|memory), DATABASE_URL, DATABASE_MAX_CONNECTIONS, BIND_ADDR\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let skip_schema = args.iter().any(|a| a == "--skip-schema");

    // Force-read config (typed error if anything is missing)
    let config = Config::from_env()?;
    logging::init(&config.log_filter);

    tracing::info!(bind_addr = %config.bind_addr, "preflight");

    let (database_url, max_connections) = match &config.store {
        StoreBackend::Postgres {
            database_url,
            max_connections,
        } => (database_url.clone(), *max_connections),
        StoreBackend::Memory => {
            tracing::info!("STORE_BACKEND=memory; nothing to check");
            return Ok(());
        }
    };

    let store = PgStore::connect(&database_url, max_connections)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to DATABASE_URL: {}", e))?;
    JewelryTypeStore::ping(&store).await?;
    tracing::info!(max_connections, "postgres reachable");

    if skip_schema {
        tracing::info!("skipping schema creation");
    } else {
        store.ensure_schema().await?;
        tracing::info!("schema ensured (jewelry_types, contacts)");
    }

    let jewelry_types = JewelryTypeStore::count(&store, &JewelryTypeFilter::default()).await?;
    let active = JewelryTypeStore::count(
        &store,
        &JewelryTypeFilter {
            is_active: Some(true),
            ..Default::default()
        },
    )
    .await?;
    let contacts = ContactStore::count(&store, &ContactFilter::default()).await?;
    tracing::info!(jewelry_types, active, contacts, "record counts");

    tracing::info!("preflight OK");
    Ok(())
}
