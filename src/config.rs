use std::{env, fmt::Display, str::FromStr};

use log::info;
use thiserror::Error;

use crate::pricing::PricingPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub service_fee_bps: u32,
    pub max_stay_nights: i64,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            bind_addr: try_load("BIND_ADDR", "127.0.0.1")?,
            port: try_load("PORT", "8080")?,
            db_max_connections: try_load("DB_MAX_CONNECTIONS", "5")?,
            service_fee_bps: try_load("SERVICE_FEE_BPS", "1200")?,
            max_stay_nights: try_load("MAX_STAY_NIGHTS", "365")?,
        })
    }

    pub fn pricing(&self) -> PricingPolicy {
        PricingPolicy {
            service_fee_bps: self.service_fee_bps,
            max_stay_nights: self.max_stay_nights,
        }
    }
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    parse_value(key, &raw)
}

fn parse_value<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trimmed_numbers() {
        let port: u16 = parse_value("PORT", " 9090 ").unwrap();
        assert_eq!(port, 9090);
    }

    #[test]
    fn rejects_malformed_numbers() {
        let err = parse_value::<u32>("SERVICE_FEE_BPS", "twelve").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "SERVICE_FEE_BPS",
                ..
            }
        ));
    }
}
