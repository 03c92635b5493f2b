use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::services::order::DEFAULT_MAX_TICKETS_PER_ORDER;

pub mod cors;
pub mod request_id;
pub mod security;

pub use cors::create_cors_layer;
pub use request_id::{create_propagate_request_id_layer, create_request_id_layer};
pub use security::create_security_headers_layer;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/tickets";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_BARCODE_RETRY_LIMIT: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreKind::Postgres),
            "memory" => Ok(StoreKind::Memory),
            other => Err(format!("unknown store '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub barcode_retry_limit: u32,
    pub max_tickets_per_order: usize,
    pub store: StoreKind,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            bind_addr: env_or("BIND_ADDR", default_bind_addr()),
            max_connections: env_or("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS),
            barcode_retry_limit: env_or("BARCODE_RETRY_LIMIT", DEFAULT_BARCODE_RETRY_LIMIT),
            max_tickets_per_order: env_or("MAX_TICKETS_PER_ORDER", DEFAULT_MAX_TICKETS_PER_ORDER),
            store: env_or("STORE", StoreKind::Postgres),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3001))
}

fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => parse_or(key, &raw, default),
        Err(_) => default,
    }
}

fn parse_or<T>(key: &str, raw: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw.trim().parse() {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Config: invalid {}='{}' ({}), using default", key, raw, e);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bind_addr() {
        assert_eq!(default_bind_addr().port(), 3001);
    }

    #[test]
    fn test_parse_or_falls_back_on_garbage() {
        assert_eq!(parse_or("BARCODE_RETRY_LIMIT", "7", 3u32), 7);
        assert_eq!(parse_or("BARCODE_RETRY_LIMIT", "many", 3u32), 3);
        assert_eq!(parse_or("STORE", " Memory ", StoreKind::Postgres), StoreKind::Memory);
        assert_eq!(parse_or("STORE", "redis", StoreKind::Postgres), StoreKind::Postgres);
    }
}
