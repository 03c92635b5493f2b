use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};

use crate::barcode::BarcodeGenerator;
use crate::models::{NewOrder, OrderDetails, Ticket};
use crate::store::{OrderStore, StoreError};
use crate::utils::error::AppError;

/// Draws allowed per barcode before giving up on a generator that keeps
/// repeating itself within one order.
const MAX_DRAWS_PER_BARCODE: usize = 16;

/// Largest number of tickets minted for a single order.
pub const DEFAULT_MAX_TICKETS_PER_ORDER: usize = 100_000;

pub const ALLOCATION_FAILED_MESSAGE: &str = "Could not allocate barcodes";

#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn OrderStore>,
    barcodes: Arc<dyn BarcodeGenerator>,
    retry_limit: u32,
    max_tickets: usize,
}

impl OrderService {
    pub fn new(
        store: Arc<dyn OrderStore>,
        barcodes: Arc<dyn BarcodeGenerator>,
        retry_limit: u32,
    ) -> Self {
        Self {
            store,
            barcodes,
            retry_limit: retry_limit.max(1),
            max_tickets: DEFAULT_MAX_TICKETS_PER_ORDER,
        }
    }

    pub fn with_max_tickets(mut self, max_tickets: usize) -> Self {
        self.max_tickets = max_tickets;
        self
    }

    /// Persists the order with fresh barcodes and returns them in request
    /// order. A barcode collision in the store rolls the order back and
    /// retries with a new set. Orders whose total ticket count overflows or
    /// exceeds the per-order ceiling are refused before anything is written.
    pub async fn create_order(&self, mut order: NewOrder) -> Result<Vec<String>, AppError> {
        let tickets = self.allocatable_tickets(&order)?;

        for attempt in 1..=self.retry_limit {
            self.assign_barcodes(&mut order)?;

            match self.store.insert_order(&order).await {
                Ok(saved) => {
                    info!(
                        order_id = saved.id,
                        event_id = saved.event_id,
                        user_id = saved.user_id,
                        lines = order.lines.len(),
                        tickets,
                        "Order created"
                    );
                    return Ok(order.barcodes());
                }
                Err(StoreError::DuplicateBarcode) => {
                    warn!(attempt, "Barcode collision, regenerating order barcodes");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::InternalServerError(
            "Could not allocate unique barcodes".to_string(),
        ))
    }

    pub async fn find_order(&self, id: i64) -> Result<OrderDetails, AppError> {
        self.store
            .find_order(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {id} not found")))
    }

    pub async fn find_ticket(&self, barcode: &str) -> Result<Ticket, AppError> {
        self.store
            .find_ticket(barcode)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Ticket {barcode} not found")))
    }

    fn allocatable_tickets(&self, order: &NewOrder) -> Result<usize, AppError> {
        match order.ticket_count() {
            Some(total) if total <= self.max_tickets => Ok(total),
            total => {
                warn!(
                    requested = ?total,
                    max_tickets = self.max_tickets,
                    "Order ticket count cannot be allocated"
                );
                Err(AppError::InternalServerError(
                    ALLOCATION_FAILED_MESSAGE.to_string(),
                ))
            }
        }
    }

    fn assign_barcodes(&self, order: &mut NewOrder) -> Result<(), AppError> {
        let mut seen = HashSet::new();

        for line in &mut order.lines {
            line.barcodes.clear();

            for _ in 0..line.ticket_count() {
                let barcode = (0..MAX_DRAWS_PER_BARCODE)
                    .map(|_| self.barcodes.generate())
                    .find(|candidate| !seen.contains(candidate))
                    .ok_or_else(|| {
                        AppError::InternalServerError("Barcode generator exhausted".to_string())
                    })?;
                seen.insert(barcode.clone());
                line.barcodes.push(barcode);
            }
        }

        Ok(())
    }
}
