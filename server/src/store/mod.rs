use axum::async_trait;
use thiserror::Error;

use crate::models::{NewOrder, Order, OrderDetails, Ticket};

pub mod memory;
pub mod postgres;

pub use memory::MemoryOrderStore;
pub use postgres::PgOrderStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A ticket barcode already exists. Nothing from the order was kept.
    #[error("barcode already exists")]
    DuplicateBarcode,

    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("migration failed")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Persistence for orders, their lines and their tickets.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Writes the order, one line per ticket type and one ticket per barcode
    /// as a single unit.
    async fn insert_order(&self, order: &NewOrder) -> Result<Order, StoreError>;

    async fn find_order(&self, id: i64) -> Result<Option<OrderDetails>, StoreError>;

    async fn find_ticket(&self, barcode: &str) -> Result<Option<Ticket>, StoreError>;
}
