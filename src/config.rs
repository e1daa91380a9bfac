use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

pub const HUBSPOT_TOKEN_VAR: &str = "HUBSPOT_ACCESS_TOKEN";
pub const ADO_PAT_VAR: &str = "ADO_PAT";
pub const CONFIG_PATH_VAR: &str = "RELAY_CONFIG";

/// Non-secret settings, read from the optional config.toml.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub bind: String,
    pub hubspot: HubSpotConfig,
    pub ado: AdoConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:7071".into(),
            hubspot: HubSpotConfig::default(),
            ado: AdoConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct HubSpotConfig {
    pub base_url: String,
}

impl Default for HubSpotConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.hubapi.com".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AdoConfig {
    pub base_url: String,
    pub organization: String,
    pub project: String,
    pub work_item_type: String,
    pub api_version: String,
}

impl Default for AdoConfig {
    fn default() -> Self {
        Self {
            base_url: "https://dev.azure.com".into(),
            organization: "ftr-test".into(),
            project: "ScrumDummy".into(),
            work_item_type: "Client Issue".into(),
            api_version: "7.0".into(),
        }
    }
}

impl AdoConfig {
    pub fn create_url(&self) -> String {
        format!(
            "{}/{}/{}/_apis/wit/workitems/${}?api-version={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.organization),
            urlencoding::encode(&self.project),
            urlencoding::encode(&self.work_item_type),
            urlencoding::encode(&self.api_version),
        )
    }
}

/// Everything the relay needs, built once at startup.
#[derive(Clone)]
pub struct RelayConfig {
    pub settings: Settings,
    pub hubspot_access_token: String,
    pub ado_pat: String,
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("settings", &self.settings)
            .field("hubspot_access_token", &"<redacted>")
            .field("ado_pat", &"<redacted>")
            .finish()
    }
}

impl RelayConfig {
    /// Combine settings with secrets taken from `lookup` (the environment in production).
    pub fn from_parts(settings: Settings, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let secret = |name: &str| -> Result<String> {
            match lookup(name) {
                Some(value) if !value.trim().is_empty() => Ok(value),
                _ => bail!("Environment variable {name} is not set"),
            }
        };

        Ok(Self {
            hubspot_access_token: secret(HUBSPOT_TOKEN_VAR)?,
            ado_pat: secret(ADO_PAT_VAR)?,
            settings,
        })
    }
}

fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hubspot-ado-relay")
        .join("config.toml")
}

pub fn load_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let settings: Settings = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(settings)
}

pub fn load_config() -> Result<RelayConfig> {
    let settings = load_settings(&config_path())?;
    RelayConfig::from_parts(settings, |name| std::env::var(name).ok())
}
