use axum::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::debug;

use super::{OrderStore, StoreError};
use crate::models::{NewOrder, Order, OrderDetails, OrderTicket, Ticket};

#[derive(Clone)]
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!().run(&self.pool).await?;
        Ok(())
    }
}

fn ticket_insert_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::DuplicateBarcode,
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn insert_order(&self, order: &NewOrder) -> Result<Order, StoreError> {
        let mut tx = self.pool.begin().await?;

        let saved: Order = sqlx::query_as(
            r#"
            INSERT INTO orders (event_id, event_date, user_id, created)
            VALUES ($1, $2, $3, $4)
            RETURNING id, event_id, event_date, user_id, created
            "#,
        )
        .bind(order.event_id)
        .bind(order.event_date)
        .bind(order.user_id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        for line in &order.lines {
            sqlx::query(
                "INSERT INTO order_tickets (order_id, ticket_type_id, quantity) VALUES ($1, $2, $3)",
            )
            .bind(saved.id)
            .bind(line.ticket_type_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;

            for barcode in &line.barcodes {
                sqlx::query(
                    "INSERT INTO tickets (order_id, ticket_type_id, barcode) VALUES ($1, $2, $3)",
                )
                .bind(saved.id)
                .bind(line.ticket_type_id)
                .bind(barcode)
                .execute(&mut *tx)
                .await
                .map_err(ticket_insert_error)?;
            }
        }

        // Dropping `tx` on an early return rolls everything back.
        tx.commit().await?;
        debug!(order_id = saved.id, "Order committed");

        Ok(saved)
    }

    async fn find_order(&self, id: i64) -> Result<Option<OrderDetails>, StoreError> {
        let order: Option<Order> = sqlx::query_as(
            "SELECT id, event_id, event_date, user_id, created FROM orders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(order) = order else {
            return Ok(None);
        };

        let lines: Vec<OrderTicket> = sqlx::query_as(
            "SELECT id, order_id, ticket_type_id, quantity FROM order_tickets WHERE order_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let tickets: Vec<Ticket> = sqlx::query_as(
            "SELECT id, order_id, ticket_type_id, barcode FROM tickets WHERE order_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(OrderDetails {
            order,
            lines,
            tickets,
        }))
    }

    async fn find_ticket(&self, barcode: &str) -> Result<Option<Ticket>, StoreError> {
        let ticket = sqlx::query_as(
            "SELECT id, order_id, ticket_type_id, barcode FROM tickets WHERE barcode = $1",
        )
        .bind(barcode)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::fmt;

    #[derive(Debug)]
    struct ConstraintError {
        unique: bool,
    }

    impl fmt::Display for ConstraintError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "constraint violated")
        }
    }

    impl std::error::Error for ConstraintError {}

    impl DatabaseError for ConstraintError {
        fn message(&self) -> &str {
            "constraint violated"
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            if self.unique {
                ErrorKind::UniqueViolation
            } else {
                ErrorKind::ForeignKeyViolation
            }
        }
    }

    #[test]
    fn test_unique_violation_is_duplicate_barcode() {
        let err = sqlx::Error::Database(Box::new(ConstraintError { unique: true }));
        assert!(matches!(ticket_insert_error(err), StoreError::DuplicateBarcode));
    }

    #[test]
    fn test_other_failures_stay_database_errors() {
        let err = sqlx::Error::Database(Box::new(ConstraintError { unique: false }));
        assert!(matches!(ticket_insert_error(err), StoreError::Database(_)));

        assert!(matches!(
            ticket_insert_error(sqlx::Error::RowNotFound),
            StoreError::Database(_)
        ));
    }
}
