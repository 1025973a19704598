use shared_types::{AppConfig, FeatureFlags, StorageEndpoint};
use std::sync::OnceLock;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Path to the config file, relative to the project root.
const CONFIG_PATH: &str = "config.toml";

/// Read `config.toml` and store it in the global `OnceLock`. Only the first
/// call has effect.
///
/// If the file is missing or unparseable, every section takes its defaults.
pub fn load_config() {
    CONFIG.get_or_init(|| {
        let config = match std::fs::read_to_string(CONFIG_PATH) {
            Ok(contents) => parse_config(&contents),
            Err(e) => {
                eprintln!("[config] {CONFIG_PATH} not found ({e}), using defaults");
                AppConfig::default()
            }
        };
        eprintln!(
            "[config] Feature flags: {:?}, storage account: {}, download mode: {:?}",
            config.features, config.storage.account, config.download.mode
        );
        config
    });
}

fn parse_config(contents: &str) -> AppConfig {
    toml::from_str(contents).unwrap_or_else(|e| {
        eprintln!("[config] Failed to parse {CONFIG_PATH}: {e}, using defaults");
        AppConfig::default()
    })
}

/// The loaded configuration, or defaults if `load_config()` has not run.
pub fn app_config() -> &'static AppConfig {
    CONFIG.get_or_init(AppConfig::default)
}

pub fn feature_flags() -> &'static FeatureFlags {
    &app_config().features
}

/// Read `primary`, falling back to `fallback`.
pub fn env_or(primary: &str, fallback: &str) -> Option<String> {
    std::env::var(primary)
        .ok()
        .or_else(|| std::env::var(fallback).ok())
}

/// Storage endpoint from `config.toml`, with `STORAGE_ACCOUNT` /
/// `STORAGE_CONTAINER` / `STORAGE_ENDPOINT_URL` taking precedence.
pub fn storage_endpoint() -> StorageEndpoint {
    let _ = dotenvy::dotenv();
    apply_env_overrides(app_config().storage.endpoint(), |name| {
        std::env::var(name).ok().filter(|v| !v.trim().is_empty())
    })
}

fn apply_env_overrides(
    mut endpoint: StorageEndpoint,
    lookup: impl Fn(&str) -> Option<String>,
) -> StorageEndpoint {
    if let Some(account) = lookup("STORAGE_ACCOUNT") {
        endpoint.account = account;
    }
    if let Some(container) = lookup("STORAGE_CONTAINER") {
        endpoint.container = container;
    }
    if let Some(url) = lookup("STORAGE_ENDPOINT_URL") {
        endpoint.endpoint_url = Some(url);
    }
    endpoint
}

/// Base64 storage account key. Never logged.
pub fn storage_key() -> Option<String> {
    let _ = dotenvy::dotenv();
    env_or("AZURE_STORAGE_KEY", "STORAGE_SHARED_KEY").filter(|k| !k.trim().is_empty())
}
