use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::ticket::{OrderTicket, Ticket};

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Order {
    pub id: i64,
    pub event_id: i64,
    pub event_date: DateTime<Utc>,
    pub user_id: i64,
    pub created: DateTime<Utc>,
}

/// An order that passed validation and is ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub event_id: i64,
    pub event_date: DateTime<Utc>,
    pub user_id: i64,
    pub lines: Vec<NewOrderLine>,
}

impl NewOrder {
    /// Barcodes of every line, in request order.
    pub fn barcodes(&self) -> Vec<String> {
        self.lines
            .iter()
            .flat_map(|line| line.barcodes.iter().cloned())
            .collect()
    }

    /// Total tickets across all lines, `None` when the sum overflows.
    pub fn ticket_count(&self) -> Option<usize> {
        self.lines
            .iter()
            .try_fold(0usize, |total, line| total.checked_add(line.ticket_count()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderLine {
    pub ticket_type_id: i64,
    pub quantity: i64,
    /// Filled in by the order service right before the insert.
    pub barcodes: Vec<String>,
}

impl NewOrderLine {
    pub fn new(ticket_type_id: i64, quantity: i64) -> Self {
        Self {
            ticket_type_id,
            quantity,
            barcodes: Vec::new(),
        }
    }

    /// Non-positive quantities still produce a line, just no tickets.
    pub fn ticket_count(&self) -> usize {
        usize::try_from(self.quantity).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: Order,
    pub lines: Vec<OrderTicket>,
    pub tickets: Vec<Ticket>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_count_ignores_non_positive_quantities() {
        assert_eq!(NewOrderLine::new(1, 3).ticket_count(), 3);
        assert_eq!(NewOrderLine::new(1, 0).ticket_count(), 0);
        assert_eq!(NewOrderLine::new(1, -4).ticket_count(), 0);
    }

    #[test]
    fn test_barcodes_follow_line_order() {
        let mut first = NewOrderLine::new(10, 2);
        first.barcodes = vec!["a1".to_string(), "a2".to_string()];
        let mut second = NewOrderLine::new(20, 1);
        second.barcodes = vec!["b1".to_string()];

        let order = NewOrder {
            event_id: 1,
            event_date: Utc::now(),
            user_id: 2,
            lines: vec![first, second],
        };

        assert_eq!(order.barcodes(), vec!["a1", "a2", "b1"]);
        assert_eq!(order.ticket_count(), Some(3));
    }

    #[test]
    fn test_ticket_count_overflow_is_reported() {
        let order = NewOrder {
            event_id: 1,
            event_date: Utc::now(),
            user_id: 2,
            lines: vec![NewOrderLine::new(1, i64::MAX); 3],
        };

        assert_eq!(order.ticket_count(), None);
    }
}
