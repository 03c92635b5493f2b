use std::collections::HashSet;
use std::sync::Arc;

use axum::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::{OrderStore, StoreError};
use crate::models::{NewOrder, Order, OrderDetails, OrderTicket, Ticket};

#[derive(Debug, Default)]
struct Tables {
    orders: Vec<Order>,
    lines: Vec<OrderTicket>,
    tickets: Vec<Ticket>,
    barcodes: HashSet<String>,
}

/// Process-local store. Each order is applied under one lock, so a rejected
/// order leaves no rows behind.
#[derive(Debug, Clone, Default)]
pub struct MemoryOrderStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn order_count(&self) -> usize {
        self.tables.lock().await.orders.len()
    }

    pub async fn ticket_count(&self) -> usize {
        self.tables.lock().await.tickets.len()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn insert_order(&self, order: &NewOrder) -> Result<Order, StoreError> {
        let mut tables = self.tables.lock().await;

        let mut incoming = HashSet::new();
        for barcode in order.lines.iter().flat_map(|line| &line.barcodes) {
            if tables.barcodes.contains(barcode) || !incoming.insert(barcode.as_str()) {
                return Err(StoreError::DuplicateBarcode);
            }
        }

        let saved = Order {
            id: tables.orders.len() as i64 + 1,
            event_id: order.event_id,
            event_date: order.event_date,
            user_id: order.user_id,
            created: Utc::now(),
        };
        tables.orders.push(saved.clone());

        for line in &order.lines {
            let id = tables.lines.len() as i64 + 1;
            tables.lines.push(OrderTicket {
                id,
                order_id: saved.id,
                ticket_type_id: line.ticket_type_id,
                quantity: line.quantity,
            });

            for barcode in &line.barcodes {
                let id = tables.tickets.len() as i64 + 1;
                tables.tickets.push(Ticket {
                    id,
                    order_id: saved.id,
                    ticket_type_id: line.ticket_type_id,
                    barcode: barcode.clone(),
                });
                tables.barcodes.insert(barcode.clone());
            }
        }

        Ok(saved)
    }

    async fn find_order(&self, id: i64) -> Result<Option<OrderDetails>, StoreError> {
        let tables = self.tables.lock().await;

        let Some(order) = tables.orders.iter().find(|o| o.id == id).cloned() else {
            return Ok(None);
        };

        Ok(Some(OrderDetails {
            order,
            lines: tables
                .lines
                .iter()
                .filter(|l| l.order_id == id)
                .cloned()
                .collect(),
            tickets: tables
                .tickets
                .iter()
                .filter(|t| t.order_id == id)
                .cloned()
                .collect(),
        }))
    }

    async fn find_ticket(&self, barcode: &str) -> Result<Option<Ticket>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.tickets.iter().find(|t| t.barcode == barcode).cloned())
    }
}
