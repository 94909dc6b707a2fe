//! Application configuration management

use std::env;
use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};

/// Default port the GraphQL server listens on
pub const DEFAULT_PORT: u16 = 4000;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the HTTP listener to
    pub host: IpAddr,

    /// Server port
    pub port: u16,

    /// SQLite connection URL (e.g. `sqlite:userbase.db?mode=rwc` or `sqlite::memory:`)
    pub database_url: String,

    /// Maximum number of pooled database connections
    pub database_max_connections: u32,

    /// Path of the single GraphQL endpoint
    pub graphql_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            database_url: "sqlite:userbase.db?mode=rwc".to_string(),
            database_max_connections: 10,
            graphql_path: "/".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Missing keys fall back to
    /// [Config::default]; present but unparsable values are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = match lookup("HOST") {
            Some(v) => v.parse().with_context(|| format!("Invalid HOST '{}'", v))?,
            None => defaults.host,
        };

        let port = match lookup("PORT") {
            Some(v) => v.parse().with_context(|| format!("Invalid PORT '{}'", v))?,
            None => defaults.port,
        };

        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v
                .parse()
                .with_context(|| format!("Invalid DATABASE_MAX_CONNECTIONS '{}'", v))?,
            None => defaults.database_max_connections,
        };

        let graphql_path = lookup("GRAPHQL_PATH")
            .map(|p| normalize_path(&p))
            .unwrap_or(defaults.graphql_path);

        Ok(Self {
            host,
            port,
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            database_max_connections,
            graphql_path,
        })
    }

    /// Socket address the server binds to
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Ensure the endpoint path starts with a single `/`
fn normalize_path(path: &str) -> String {
    format!("/{}", path.trim().trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_env_empty() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 4000);
        assert_eq!(config.graphql_path, "/");
        assert_eq!(config.database_max_connections, 10);
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:4000");
    }

    #[test]
    fn test_overrides_from_env() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("HOST", "127.0.0.1"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("GRAPHQL_PATH", "graphql"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.graphql_path, "/graphql");
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[("PORT", "not-a-port")])).unwrap_err();
        assert!(err.to_string().contains("Invalid PORT"));
    }
}
