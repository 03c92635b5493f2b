use std::sync::Arc;

use crate::barcode::BarcodeGenerator;
use crate::services::OrderService;
use crate::store::OrderStore;

#[derive(Clone)]
pub struct AppState {
    pub orders: OrderService,
}

impl AppState {
    pub fn new(
        store: Arc<dyn OrderStore>,
        barcodes: Arc<dyn BarcodeGenerator>,
        barcode_retry_limit: u32,
    ) -> Self {
        Self {
            orders: OrderService::new(store, barcodes, barcode_retry_limit),
        }
    }

    pub fn with_max_tickets(self, max_tickets: usize) -> Self {
        Self {
            orders: self.orders.with_max_tickets(max_tickets),
        }
    }
}
