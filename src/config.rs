use std::path::Path;

use crate::error::Error;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE: &str = ".codepeek.toml";

/// Project configuration loaded from `.codepeek.toml`.
/// Every field has a default, so a partial file is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// REST API settings.
    pub api: ApiConfig,
    /// Hosts used to recognise and rewrite permalinks.
    pub hosts: Hosts,
}

/// Where the posts/profile API lives and where its token comes from.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// Origin the `/api/...` paths are joined onto.
    pub base_url: String,
    /// Environment variable holding the bearer token.
    pub token_env: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        return Self {
            base_url: "http://localhost:3000".to_string(),
            token_env: "CODEPEEK_TOKEN".to_string(),
        };
    }
}

/// The browsing host permalinks must name, and the host serving raw file
/// content for the same provider.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Hosts {
    /// Host serving unrendered file content.
    pub raw: String,
    /// Host of the human-facing browsing interface.
    pub web: String,
}

impl Default for Hosts {
    fn default() -> Self {
        return Self {
            raw: "raw.githubusercontent.com".to_string(),
            web: "github.com".to_string(),
        };
    }
}

/// Raw TOML structure for `.codepeek.toml`.
#[derive(serde::Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct CodepeekTomlConfig {
    /// `[api]` table.
    api: ApiConfig,
    /// `[hosts]` table.
    hosts: Hosts,
}

impl Config {
    /// Load config from `.codepeek.toml` in the given root directory.
    /// Returns defaults if the file doesn't exist.
    /// Returns an error if the file exists but is malformed; a config the
    /// user wrote is never silently replaced by defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            },
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };

        let raw: CodepeekTomlConfig =
            toml::from_str(&content).map_err(|source| return Error::TomlDe { path, source })?;
        return Ok(Self { api: raw.api, hosts: raw.hosts });
    }
}
