use std::env;
use std::str::FromStr;

const DEFAULT_DATABASE_URL: &str = "app.db";
const DEFAULT_ADDRESS: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POOL_SIZE: u32 = 8;

/// Runtime settings for the HTTP service, read from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub address: String,
    pub port: u16,
    pub pool_size: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            address: DEFAULT_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

impl ServerConfig {
    /// Build the configuration from `DATABASE_URL`, `ADDRESS`, `PORT` and
    /// `DATABASE_POOL_SIZE`. Call `dotenvy::dotenv()` first to honour `.env`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            address: lookup("ADDRESS").unwrap_or(defaults.address),
            port: parse_or_default(&lookup, "PORT", defaults.port),
            pool_size: parse_or_default(&lookup, "DATABASE_POOL_SIZE", defaults.pool_size),
        }
    }
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("Ignoring invalid {key} value `{raw}`, using {default}");
                default
            }
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn falls_back_to_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.database_url, "app.db");
        assert_eq!(config.address, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.pool_size, 8);
    }

    #[test]
    fn reads_values_and_ignores_garbage_numbers() {
        let config = config_from(&[
            ("DATABASE_URL", "bikes.db"),
            ("PORT", "not-a-port"),
            ("DATABASE_POOL_SIZE", "2"),
        ]);
        assert_eq!(config.database_url, "bikes.db");
        assert_eq!(config.port, 8080);
        assert_eq!(config.pool_size, 2);
    }
}
