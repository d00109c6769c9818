//! Runtime configuration for the TravelMemory server.

use anyhow::{anyhow, Context, Result};
use std::env;

/// Which value ends up in the `route` label of the HTTP metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteLabel {
    /// Raw request path, e.g. `/trip/6f1c...`. Unbounded cardinality.
    #[default]
    Path,
    /// Matched resource pattern, e.g. `/trip/{id}`.
    Pattern,
}

impl std::str::FromStr for RouteLabel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "path" => Ok(RouteLabel::Path),
            "pattern" => Ok(RouteLabel::Pattern),
            other => Err(anyhow!("unknown route label mode `{other}` (expected path|pattern)")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    /// Interface to bind.
    pub host: String,
    /// TCP port to listen on.
    pub port: u16,
    /// Postgres URL; `None` keeps trips in memory.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub route_label: RouteLabel,
    /// Max accepted JSON request body (bytes).
    pub json_limit: usize,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .ok_or_else(|| anyhow!("PORT must be set"))?
            .trim()
            .parse::<u16>()
            .context("PORT is not a valid port number")?;

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());

        let database_url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());

        let db_max_connections = lookup("DB_MAX_CONNECTIONS")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(5);

        let route_label = match lookup("METRICS_ROUTE_LABEL") {
            Some(v) => v.parse()?,
            None => RouteLabel::default(),
        };

        let json_limit = lookup("JSON_LIMIT_BYTES")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(100 * 1024);

        Ok(Settings {
            host,
            port,
            database_url,
            db_max_connections,
            route_label,
            json_limit,
        })
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn port_is_required() {
        assert!(settings(&[]).is_err());
        assert!(settings(&[("PORT", "not-a-port")]).is_err());
    }

    #[test]
    fn defaults_apply() {
        let s = settings(&[("PORT", "3001")]).unwrap();
        assert_eq!(s.port, 3001);
        assert_eq!(s.host, "0.0.0.0");
        assert!(s.database_url.is_none());
        assert_eq!(s.db_max_connections, 5);
        assert_eq!(s.route_label, RouteLabel::Path);
        assert_eq!(s.json_limit, 102_400);
    }

    #[test]
    fn blank_database_url_means_memory() {
        let s = settings(&[("PORT", "80"), ("DATABASE_URL", "  ")]).unwrap();
        assert!(s.database_url.is_none());
    }

    #[test]
    fn route_label_mode() {
        let s = settings(&[("PORT", "80"), ("METRICS_ROUTE_LABEL", "Pattern")]).unwrap();
        assert_eq!(s.route_label, RouteLabel::Pattern);
        assert!(settings(&[("PORT", "80"), ("METRICS_ROUTE_LABEL", "url")]).is_err());
    }
}
