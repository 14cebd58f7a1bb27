use std::env;
use std::time::Duration;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub fulfillment: FulfillmentConfig,
}

/// Delays the worker sleeps for while driving an order through its lifecycle.
/// Placeholders for real fulfillment work, so they are configuration rather
/// than constants.
#[derive(Debug, Clone, Copy)]
pub struct FulfillmentConfig {
    pub processing_delay: Duration,
    pub completion_delay: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            http_port: parse_or_default("HTTP_PORT", 3000)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            fulfillment: FulfillmentConfig {
                processing_delay: Duration::from_millis(parse_or_default(
                    "PROCESSING_DELAY_MS",
                    2000,
                )?),
                completion_delay: Duration::from_millis(parse_or_default(
                    "COMPLETION_DELAY_MS",
                    3000,
                )?),
            },
        })
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}
