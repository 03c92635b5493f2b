pub mod order;
pub mod ticket;

pub use order::{NewOrder, NewOrderLine, Order, OrderDetails};
pub use ticket::{OrderTicket, Ticket};
