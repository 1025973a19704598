use serde::{Deserialize, Serialize};

use crate::{DownloadMode, StorageEndpoint};

/// Feature flags controlling which optional integrations are active.
///
/// Loaded from `config.toml` at server startup. Every field defaults to
/// `false` so that a missing or incomplete config file disables them.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FeatureFlags {
    #[serde(default)]
    pub telemetry: bool,
}

/// `[storage]` section: where attachments live.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageSettings {
    #[serde(default = "default_account")]
    pub account: String,
    #[serde(default = "default_container")]
    pub container: String,
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

fn default_account() -> String {
    "devstoreaccount1".to_string()
}

fn default_container() -> String {
    "case-attachments".to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            account: default_account(),
            container: default_container(),
            endpoint_url: None,
        }
    }
}

impl StorageSettings {
    pub fn endpoint(&self) -> StorageEndpoint {
        StorageEndpoint {
            account: self.account.clone(),
            container: self.container.clone(),
            endpoint_url: self.endpoint_url.clone(),
        }
    }
}

/// `[download]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DownloadConfig {
    #[serde(default)]
    pub mode: DownloadMode,
}

/// Top-level config file structure matching `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub download: DownloadConfig,
}
