use serde::de::DeserializeOwned;
use std::fs;

use crate::services::class_ensurer::ClassLookupPolicy;
use crate::services::oauth::service_account::ServiceAccountKey;
use crate::services::wallet_api::DEFAULT_WALLET_API_BASE_URL;

pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,

    // Issuer namespace for all class and object ids
    pub issuer_id: String,

    // Used for both upstream auth and save token signing
    pub service_account: ServiceAccountKey,

    pub wallet_api_base_url: String,
    pub class_lookup_policy: ClassLookupPolicy,

    // Per-request timeout for the token endpoint and wallet API
    pub upstream_timeout_secs: u64,

    // Served for unmatched GET paths
    pub static_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        // Load .env file if it exists (for local development)
        let _ = dotenvy::dotenv();

        let settings = config::Config::builder()
            .add_source(config::Environment::default().separator("__"))
            .build()?;

        Self::from_settings(settings)
    }

    pub fn from_settings(settings: config::Config) -> Result<Self, config::ConfigError> {
        let service_account = load_service_account(&settings)?;

        let wallet_api_base_url: String = get_or(
            &settings,
            "wallet_api_base_url",
            DEFAULT_WALLET_API_BASE_URL.to_string(),
        )?;
        url::Url::parse(&wallet_api_base_url).map_err(|e| {
            config::ConfigError::Message(format!("invalid wallet_api_base_url: {}", e))
        })?;

        let class_lookup_policy =
            match get_or::<Option<String>>(&settings, "class_lookup_errors", None)? {
                Some(raw) => raw
                    .parse::<ClassLookupPolicy>()
                    .map_err(config::ConfigError::Message)?,
                None => ClassLookupPolicy::default(),
            };

        Ok(Self {
            host: get_or(&settings, "host", "127.0.0.1".to_string())?,
            port: get_or(&settings, "port", 3000)?,

            issuer_id: settings.get("issuer_id")?,
            service_account,

            wallet_api_base_url,
            class_lookup_policy,
            upstream_timeout_secs: get_or(
                &settings,
                "upstream_timeout_secs",
                DEFAULT_UPSTREAM_TIMEOUT_SECS,
            )?,

            static_dir: get_or(&settings, "static_dir", "public".to_string())?,
        })
    }
}

/// Reads an optional key. Only a missing key falls back to `default`; a value
/// that is present but malformed is an error.
fn get_or<T: DeserializeOwned>(
    settings: &config::Config,
    key: &str,
    default: T,
) -> Result<T, config::ConfigError> {
    match settings.get::<T>(key) {
        Ok(value) => Ok(value),
        Err(config::ConfigError::NotFound(_)) => Ok(default),
        Err(e) => Err(e),
    }
}

/// Reads the service account from inline JSON, falling back to a key file path
fn load_service_account(
    settings: &config::Config,
) -> Result<ServiceAccountKey, config::ConfigError> {
    let raw = match get_or::<Option<String>>(settings, "google_credentials_json", None)? {
        Some(json) => json,
        None => {
            let path: String = settings.get("google_application_credentials").map_err(|_| {
                config::ConfigError::Message(
                    "either google_credentials_json or google_application_credentials must be set"
                        .to_string(),
                )
            })?;
            fs::read_to_string(&path).map_err(|e| {
                config::ConfigError::Message(format!("failed to read {}: {}", path, e))
            })?
        }
    };

    ServiceAccountKey::from_json(&raw)
        .map_err(|e| config::ConfigError::Message(e.to_string()))
}
