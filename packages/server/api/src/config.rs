use anyhow::{Context, Result};
use axum::http::HeaderValue;
use database::Seed;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3001";
const DEFAULT_MAX_CONNECTIONS: u32 = 50;

#[derive(Debug, Clone)]
pub struct Config {
    /// Unset means the service runs on the in-memory store.
    pub database_url: Option<String>,
    /// JSON seed for the in-memory store; ignored when `database_url` is set.
    pub seed_file: Option<PathBuf>,
    pub bind_addr: SocketAddr,
    pub cors_origin: HeaderValue,
    pub db_max_connections: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let seed_file = lookup("SEED_FILE")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address like 0.0.0.0:3000")?;

        let cors_origin = lookup("CORS_ORIGIN")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string())
            .parse::<HeaderValue>()
            .context("CORS_ORIGIN is not a valid header value")?;

        let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse::<u32>()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        if db_max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }

        Ok(Self {
            database_url,
            seed_file,
            bind_addr,
            cors_origin,
            db_max_connections,
        })
    }
}

/// Reads the tools, machines and settings an in-memory store starts with.
pub fn load_seed(path: &Path) -> Result<Seed> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Seed file {} is not valid seed JSON", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert!(config.database_url.is_none());
        assert!(config.seed_file.is_none());
        assert_eq!(config.bind_addr, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.cors_origin, "http://localhost:3001");
        assert_eq!(config.db_max_connections, 50);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://localhost/settings"),
            ("SEED_FILE", "dev/seed.json"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("DB_MAX_CONNECTIONS", "8"),
        ])
        .unwrap();
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/settings")
        );
        assert_eq!(config.seed_file, Some(PathBuf::from("dev/seed.json")));
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.db_max_connections, 8);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(config_from(&[("BIND_ADDR", "not-an-addr")]).is_err());
        assert!(config_from(&[("DB_MAX_CONNECTIONS", "lots")]).is_err());
        assert!(config_from(&[("DB_MAX_CONNECTIONS", "0")]).is_err());
    }

    #[test]
    fn test_load_seed_reads_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"tools": [{{"name": "compiler", "version": "1.0"}}], "machines": [{{"name": "build01"}}]}}"#
        )
        .unwrap();

        let seed = load_seed(file.path()).unwrap();
        assert_eq!(seed.tools.len(), 1);
        assert_eq!(seed.tools[0].version.as_deref(), Some("1.0"));
        assert_eq!(seed.machines[0].name, "build01");
        assert!(seed.settings.is_empty());
    }

    #[test]
    fn test_load_seed_errors() {
        assert!(load_seed(Path::new("/nonexistent/seed.json")).is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(load_seed(file.path()).is_err());
    }
}
