//! Configuration loading with figment.
//!
//! Sources, lowest precedence first: built-in defaults, the TOML file,
//! a bare `PORT` variable, then `ROSTERD_`-prefixed variables with `__`
//! separating sections (`ROSTERD_SERVER__HOST=0.0.0.0`).

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const CONFIG_FILE_NAME: &str = "config.toml";
const DATA_DIR_NAME: &str = "rosterd";
const DATABASE_FILE_NAME: &str = "students.sqlite3";
const PREFS_FILE_NAME: &str = "prefs.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    /// 0 asks the OS for a free port.
    pub port: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Defaults to `<data dir>/rosterd/students.sqlite3`.
    pub database_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API root the client talks to. Derived from `server` when unset.
    pub api_base_url: Option<String>,
    /// Where the list view remembers search/filter/sort.
    pub prefs_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl Config {
    /// Load with an optional explicit config file. A missing file is fine.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::raw().only(&["PORT"]).map(|_| "server.port".into()))
            .merge(Env::prefixed("ROSTERD_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "server.host must not be empty".to_string(),
            });
        }
        if let Some(url) = &self.client.api_base_url {
            reqwest::Url::parse(url).map_err(|e| Error::ConfigValidation {
                message: format!("client.api_base_url {url:?} is not a valid url: {e}"),
            })?;
        }
        Ok(())
    }

    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    #[must_use]
    pub fn prefs_path(&self) -> PathBuf {
        self.client
            .prefs_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(PREFS_FILE_NAME))
    }

    #[must_use]
    pub fn api_base_url(&self) -> String {
        self.client
            .api_base_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}/api", self.server.host, self.server.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5000);
        assert!(config.storage.database_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_api_base_url_follows_server() {
        let mut config = Config::default();
        config.server.port = 8081;
        assert_eq!(config.api_base_url(), "http://127.0.0.1:8081/api");

        config.client.api_base_url = Some("http://school.local/api".to_string());
        assert_eq!(config.api_base_url(), "http://school.local/api");
    }

    #[test]
    fn test_database_path_default_and_custom() {
        let mut config = Config::default();
        assert!(config
            .database_path()
            .to_string_lossy()
            .contains("students.sqlite3"));

        config.storage.database_path = Some(PathBuf::from("/custom/db.sqlite"));
        assert_eq!(config.database_path(), PathBuf::from("/custom/db.sqlite"));
    }

    #[test]
    fn test_validate_empty_host() {
        let mut config = Config::default();
        config.server.host = " ".to_string();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("server.host"));
    }

    #[test]
    fn test_validate_bad_api_url() {
        let mut config = Config::default();
        config.client.api_base_url = Some("::nope".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_and_env_layers() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                "rosterd.toml",
                r#"
                [server]
                host = "0.0.0.0"
                port = 7000

                [storage]
                database_path = "/srv/rosterd/students.sqlite3"
                "#,
            )?;
            let config = Config::load_from(Some(PathBuf::from("rosterd.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.server.host, "0.0.0.0");
            assert_eq!(config.server.port, 7000);
            assert_eq!(
                config.database_path(),
                PathBuf::from("/srv/rosterd/students.sqlite3")
            );

            jail.set_env("PORT", "7100");
            let config = Config::load_from(Some(PathBuf::from("rosterd.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.server.port, 7100);

            jail.set_env("ROSTERD_SERVER__PORT", "7200");
            jail.set_env("ROSTERD_CLIENT__API_BASE_URL", "http://example.test/api");
            let config = Config::load_from(Some(PathBuf::from("rosterd.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.server.port, 7200);
            assert_eq!(config.api_base_url(), "http://example.test/api");
            Ok(())
        });
    }

    #[test]
    fn test_load_nonexistent_config() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }
}
