use serde::Serialize;
use sqlx::FromRow;

/// One requested ticket type within an order.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct OrderTicket {
    pub id: i64,
    pub order_id: i64,
    pub ticket_type_id: i64,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Ticket {
    pub id: i64,
    pub order_id: i64,
    pub ticket_type_id: i64,
    pub barcode: String,
}
