pub mod order;

pub use order::{CreateOrderRequest, OrderCreated};
