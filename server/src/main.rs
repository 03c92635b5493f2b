use std::error::Error;
use std::sync::Arc;

use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use ticket_order_server::barcode::RandomHexBarcodes;
use ticket_order_server::config::{Config, StoreKind};
use ticket_order_server::routes::create_routes;
use ticket_order_server::state::AppState;
use ticket_order_server::store::{MemoryOrderStore, OrderStore, PgOrderStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();

    let store: Arc<dyn OrderStore> = match config.store {
        StoreKind::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.database_url)
                .await?;
            tracing::info!("Successfully connected to database");

            let store = PgOrderStore::new(pool);
            store.migrate().await?;
            tracing::info!("Migrations run successfully");

            Arc::new(store)
        }
        StoreKind::Memory => {
            tracing::warn!("Using in-memory store, orders will not survive a restart");
            Arc::new(MemoryOrderStore::new())
        }
    };

    let state = AppState::new(store, Arc::new(RandomHexBarcodes), config.barcode_retry_limit)
        .with_max_tickets(config.max_tickets_per_order);
    let app = create_routes(state);

    tracing::info!("Server running at http://{}", config.bind_addr);
    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
