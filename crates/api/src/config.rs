use std::str::FromStr;

use thiserror::Error;

use crate::auth::AuthConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// How bookings on the same date are grouped into capacity pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapacityGranularity {
    /// All bookings on a calendar date share one pool, whatever their slot.
    #[default]
    Date,
    /// Each (date, time slot) pair is its own pool.
    DateSlot,
}

impl FromStr for CapacityGranularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(CapacityGranularity::Date),
            "date_slot" | "date+slot" => Ok(CapacityGranularity::DateSlot),
            other => Err(format!("unknown capacity granularity: {other}")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub port: u16,
    pub skip_migrations: bool,
    pub allowed_origins: Vec<String>,
    pub gql_introspection: bool,
    pub capacity_granularity: CapacityGranularity,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key/value source (the process env in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000,http://localhost:3001".to_string())
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        Ok(Self {
            database_url,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 30)?,
            port: parse_or(&lookup, "PORT", 8080)?,
            skip_migrations: flag(&lookup, "SKIP_MIGRATIONS"),
            allowed_origins,
            gql_introspection: flag(&lookup, "GQL_INTROSPECTION"),
            capacity_granularity: parse_or(
                &lookup,
                "CAPACITY_GRANULARITY",
                CapacityGranularity::default(),
            )?,
            auth: AuthConfig::from_lookup(&lookup)?,
        })
    }
}

pub(crate) fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

fn flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> bool {
    lookup(key)
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
