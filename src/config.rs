//! Project configuration read from `sourcify.toml`.
//!
//! ```toml
//! contracts_build_directory = "build/contracts"
//! api_url = "https://sourcify.dev/server"
//!
//! [networks.goerli]
//! network_id = 5
//! url = "https://goerli.infura.io/v3/<key>"
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::{collections::BTreeMap, fs, io};
use thiserror::Error;
use url::Url;

use crate::api::{DEFAULT_API_URL, DEFAULT_REPOSITORY_URL};

pub const CONFIG_FILE: &str = "sourcify.toml";
pub const DEFAULT_BUILD_DIR: &str = "build/contracts";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("[E401] Failed to read config file {path}: {source}\n\nSuggestions:\n  • Check file permissions\n  • Use --config to point at another file")]
    Io { path: Utf8PathBuf, source: io::Error },

    #[error("[E402] Failed to parse config file {path}: {source}\n\nSuggestions:\n  • Check TOML syntax is valid\n  • Every network needs a numeric network_id")]
    Parse {
        path: Utf8PathBuf,
        source: toml::de::Error,
    },

    #[error("[E403] Network '{name}' is not configured. Available networks: {}\n\nSuggestions:\n  • Add a [networks.{name}] section with a network_id to the config file\n  • Check the --network spelling", .available.join(", "))]
    UnknownNetwork {
        name: String,
        available: Vec<String>,
    },

    #[error("[E404] Invalid URL '{url}': {source}\n\nSuggestions:\n  • Use absolute URLs with protocol (http:// or https://)")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("[E405] No contract name specified\n\nSuggestions:\n  • Pass one or more contracts to verify, e.g. MetaCoin@0x5FbDB2315678afecb367f032d93F642f64180aa3")]
    NoContracts,

    #[error("[E406] Path contains invalid UTF-8 characters\n\nSuggestions:\n  • Use only ASCII characters in file paths\n  • Avoid special characters in directory names")]
    Utf8(#[from] camino::FromPathBufError),

    #[error("[E407] Failed to determine working directory: {0}")]
    WorkingDirectory(#[from] io::Error),
}

impl ConfigError {
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "E401",
            Self::Parse { .. } => "E402",
            Self::UnknownNetwork { .. } => "E403",
            Self::InvalidUrl { .. } => "E404",
            Self::NoContracts => "E405",
            Self::Utf8(_) => "E406",
            Self::WorkingDirectory(_) => "E407",
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub contracts_build_directory: Option<Utf8PathBuf>,
    pub api_url: Option<String>,
    pub repository_url: Option<String>,
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkConfig>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct NetworkConfig {
    pub network_id: u64,
    pub url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl NetworkConfig {
    /// JSON-RPC endpoint of the network, from `url` or `host`/`port`.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the configured endpoint isn't a valid URL.
    pub fn rpc_url(&self) -> Result<Option<Url>, ConfigError> {
        let raw = match (&self.url, &self.host) {
            (Some(url), _) => url.clone(),
            (None, Some(host)) => format!("http://{host}:{}", self.port.unwrap_or(8545)),
            (None, None) => return Ok(None),
        };
        parse_url(&raw).map(Some)
    }
}

impl Config {
    /// Reads the config at `path`. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the file exists but can't be read or parsed.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("No config file at {path}, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// # Errors
    ///
    /// Will return `Err` if no network called `name` is configured.
    pub fn network(&self, name: &str) -> Result<&NetworkConfig, ConfigError> {
        self.networks
            .get(name)
            .ok_or_else(|| ConfigError::UnknownNetwork {
                name: name.to_owned(),
                available: self.networks.keys().cloned().collect(),
            })
    }

    /// Build directory, resolved against `working_dir` when relative.
    #[must_use]
    pub fn build_dir(&self, working_dir: &Utf8Path) -> Utf8PathBuf {
        let dir = self
            .contracts_build_directory
            .as_deref()
            .unwrap_or_else(|| Utf8Path::new(DEFAULT_BUILD_DIR));
        working_dir.join(dir)
    }

    /// # Errors
    ///
    /// Will return `Err` if the configured URL is invalid.
    pub fn api_url(&self) -> Result<Url, ConfigError> {
        parse_url(self.api_url.as_deref().unwrap_or(DEFAULT_API_URL))
    }

    /// # Errors
    ///
    /// Will return `Err` if the configured URL is invalid.
    pub fn repository_url(&self) -> Result<Url, ConfigError> {
        parse_url(self.repository_url.as_deref().unwrap_or(DEFAULT_REPOSITORY_URL))
    }
}

fn parse_url(raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
        url: raw.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const CONFIG: &str = r#"
contracts_build_directory = "out/artifacts"
api_url = "http://localhost:5555"

[networks.goerli]
network_id = 5
url = "https://rpc.example.com"

[networks.development]
network_id = 1337
host = "127.0.0.1"

[networks.offline]
network_id = 3
"#;

    fn config() -> Config {
        toml::from_str(CONFIG).unwrap()
    }

    #[test]
    fn test_networks() {
        let config = config();

        let goerli = config.network("goerli").unwrap();
        assert_eq!(goerli.network_id, 5);
        assert_eq!(
            goerli.rpc_url().unwrap().map(String::from).as_deref(),
            Some("https://rpc.example.com/")
        );

        let development = config.network("development").unwrap();
        assert_eq!(
            development.rpc_url().unwrap().map(String::from).as_deref(),
            Some("http://127.0.0.1:8545/")
        );

        assert_eq!(config.network("offline").unwrap().rpc_url().unwrap(), None);
    }

    #[test]
    fn test_unknown_network() {
        let err = config().network("mainnet").unwrap_err();
        assert_eq!(err.error_code(), "E403");
        assert!(err
            .to_string()
            .contains("Available networks: development, goerli, offline"));
    }

    #[test]
    fn test_directories_and_urls() {
        let config = config();
        assert_eq!(
            config.build_dir(Utf8Path::new("/project")),
            Utf8PathBuf::from("/project/out/artifacts")
        );
        assert_eq!(config.api_url().unwrap().as_str(), "http://localhost:5555/");
        assert_eq!(
            config.repository_url().unwrap().as_str(),
            "https://repo.sourcify.dev/"
        );
    }

    #[test]
    fn test_defaults_without_file() {
        let temp_dir = TempDir::new().unwrap();
        let dir = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();

        let config = Config::load(&dir.join(CONFIG_FILE)).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.build_dir(&dir), dir.join("build/contracts"));
        assert_eq!(config.api_url().unwrap().as_str(), "https://sourcify.dev/server");
    }

    #[test]
    fn test_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(temp_dir.path().join(CONFIG_FILE)).unwrap();
        fs::write(&path, "[networks.goerli]\nnetwork_id = \"five\"\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert_eq!(err.error_code(), "E402");
    }
}
