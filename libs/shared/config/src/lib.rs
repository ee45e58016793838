use std::env;
use tracing::warn;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_BULK_SLOTS: usize = 500;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub max_bulk_slots: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: parse_var("PORT", DEFAULT_PORT),
            max_bulk_slots: parse_var("MAX_BULK_SLOTS", DEFAULT_MAX_BULK_SLOTS),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            max_bulk_slots: DEFAULT_MAX_BULK_SLOTS,
        }
    }
}

fn parse_var<T: std::str::FromStr + std::fmt::Display>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(value) => value.parse().unwrap_or_else(|_| {
            warn!("{} is not a valid value, using default {}", name, default);
            default
        }),
        Err(_) => default,
    }
}
