use crate::errors::ConfigError;
use std::{env, path::PathBuf};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017/tipmate";
pub const DEFAULT_DATA_PATH: &str = "data/tip-calculations.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Mongo { uri: String },
    File { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub store: StoreConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let backend = lookup("TIPMATE_STORE").unwrap_or_else(|| "mongodb".to_string());
        let store = match backend.trim().to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => StoreConfig::Mongo {
                uri: lookup("MONGODB_URI")
                    .filter(|uri| !uri.is_empty())
                    .unwrap_or_else(|| DEFAULT_MONGODB_URI.to_string()),
            },
            "file" => StoreConfig::File {
                path: lookup("APP_DATA_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            },
            _ => return Err(ConfigError::UnknownBackend(backend)),
        };

        Ok(Self { port, store })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_local_mongodb() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(
            config.store,
            StoreConfig::Mongo {
                uri: DEFAULT_MONGODB_URI.to_string()
            }
        );
    }

    #[test]
    fn reads_mongodb_uri_and_port() {
        let config = config_from(&[
            ("PORT", "3000"),
            ("MONGODB_URI", "mongodb://db.internal:27017/tips"),
        ])
        .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(
            config.store,
            StoreConfig::Mongo {
                uri: "mongodb://db.internal:27017/tips".to_string()
            }
        );
    }

    #[test]
    fn invalid_port_falls_back() {
        let config = config_from(&[("PORT", "not-a-port")]).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn file_backend_uses_data_path() {
        let config = config_from(&[("TIPMATE_STORE", "file"), ("APP_DATA_PATH", "/tmp/t.json")])
            .unwrap();
        assert_eq!(
            config.store,
            StoreConfig::File {
                path: PathBuf::from("/tmp/t.json")
            }
        );
    }

    #[test]
    fn unknown_backend_is_an_error() {
        let err = config_from(&[("TIPMATE_STORE", "postgres")]).unwrap_err();
        assert!(err.to_string().contains("postgres"));
    }
}
