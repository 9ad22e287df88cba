//! Server configuration read from the environment.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::cart::Catalogue;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 9000;
pub const DEFAULT_CART_TTL_MINUTES: i64 = 30;
/// One hundred years.
pub const MAX_CART_TTL_MINUTES: i64 = 100 * 366 * 24 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not valid: {value:?}")]
    Invalid { var: &'static str, value: String },

    #[error("cannot read catalogue {}: {source}", .path.display())]
    CatalogueIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse catalogue {}: {source}", .path.display())]
    CatalogueFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub catalogue: Catalogue,
    pub clients: HashMap<String, String>,
    pub cart_ttl_minutes: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            catalogue: default_catalogue(),
            clients: HashMap::from([("client-1".to_string(), "pw".to_string())]),
            cart_ttl_minutes: DEFAULT_CART_TTL_MINUTES,
        }
    }
}

impl ServerConfig {
    /// Read `HOST`, `PORT`, `TUS_LIBROS_CATALOGUE`, `TUS_LIBROS_CLIENTS` and
    /// `TUS_LIBROS_CART_TTL_MINUTES`. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(host) = env::var("HOST") {
            config.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            config.port = port
                .parse()
                .map_err(|_| ConfigError::Invalid { var: "PORT", value: port })?;
        }
        if let Ok(path) = env::var("TUS_LIBROS_CATALOGUE") {
            config.catalogue = load_catalogue(PathBuf::from(path))?;
        }
        if let Ok(clients) = env::var("TUS_LIBROS_CLIENTS") {
            config.clients = parse_clients(&clients)?;
        }
        if let Ok(ttl) = env::var("TUS_LIBROS_CART_TTL_MINUTES") {
            config.cart_ttl_minutes = parse_cart_ttl(&ttl)?;
        }
        Ok(config)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub fn default_catalogue() -> Catalogue {
    Catalogue::from([
        ("0099771519".to_string(), 1200),
        ("9780132350884".to_string(), 3500),
        ("9780201633610".to_string(), 4200),
        ("9781593278281".to_string(), 3900),
    ])
}

/// A JSON object mapping ISBN to unit price.
pub fn load_catalogue(path: PathBuf) -> Result<Catalogue, ConfigError> {
    let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::CatalogueIo {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::CatalogueFormat { path, source })
}

/// Whole minutes, positive and small enough to subtract from the current
/// time.
pub fn parse_cart_ttl(raw: &str) -> Result<i64, ConfigError> {
    match raw.trim().parse::<i64>() {
        Ok(minutes) if minutes > 0 && minutes <= MAX_CART_TTL_MINUTES => Ok(minutes),
        _ => Err(ConfigError::Invalid {
            var: "TUS_LIBROS_CART_TTL_MINUTES",
            value: raw.to_string(),
        }),
    }
}

/// `id:password,id:password`. Blank entries are skipped.
pub fn parse_clients(raw: &str) -> Result<HashMap<String, String>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once(':') {
            Some((id, password)) if !id.is_empty() => Ok((id.to_string(), password.to_string())),
            _ => Err(ConfigError::Invalid {
                var: "TUS_LIBROS_CLIENTS",
                value: entry.to_string(),
            }),
        })
        .collect()
}
