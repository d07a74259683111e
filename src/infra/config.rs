//! Centralized configuration (environment variables + defaults).

use anyhow::Context;
use std::net::SocketAddr;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    /// Connection string of the target Postgres server (`DATABASE_URL`, required).
    pub database_url: String,
    /// Listen address of the HTTP server (`BIND_ADDR`).
    pub bind_addr: SocketAddr,
    /// Upper bound of the sqlx pool (`DB_MAX_CONNECTIONS`).
    pub max_connections: u32,
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .context("DATABASE_URL must be set")?;

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address such as 0.0.0.0:3000")?;

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(v) => v
                .parse::<u32>()
                .context("DB_MAX_CONNECTIONS must be a valid u32")?
                .max(1),
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url,
            bind_addr,
            max_connections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let cfg = load(&[("DATABASE_URL", "postgres://localhost/products")]).unwrap();
        assert_eq!(cfg.database_url, "postgres://localhost/products");
        assert_eq!(cfg.bind_addr, DEFAULT_BIND_ADDR.parse().unwrap());
        assert_eq!(cfg.max_connections, DEFAULT_MAX_CONNECTIONS);
    }

    #[test]
    fn database_url_is_required() {
        assert!(load(&[]).is_err());
        assert!(load(&[("DATABASE_URL", "  ")]).is_err());
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = load(&[
            ("DATABASE_URL", "postgres://db/products"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("DB_MAX_CONNECTIONS", "0"),
        ])
        .unwrap();
        assert_eq!(cfg.bind_addr.port(), 8080);
        assert_eq!(cfg.max_connections, 1);

        assert!(load(&[("DATABASE_URL", "postgres://db"), ("BIND_ADDR", "nope")]).is_err());
        assert!(load(&[("DATABASE_URL", "postgres://db"), ("DB_MAX_CONNECTIONS", "many")]).is_err());
    }
}
