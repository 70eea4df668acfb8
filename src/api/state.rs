use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::services::{
    oauth::service_account::ServiceAccountCredentials,
    pass_issuer::IssuanceSettings,
    token_signer::TokenSigner,
    wallet_api::GoogleWalletClient,
};

/// Shared request state. Everything here is read-only after boot except the
/// credential provider's token cache.
#[derive(Clone)]
pub struct AppState {
    pub wallet: GoogleWalletClient,
    pub signer: Arc<TokenSigner>,
    pub settings: Arc<IssuanceSettings>,
}

impl AppState {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let signer = Arc::new(TokenSigner::from_service_account(&config.service_account)?);

        // Bounds every upstream call, including the token exchange made while
        // the token cache is locked
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()?;
        let credentials = Arc::new(ServiceAccountCredentials::new(
            http.clone(),
            &config.service_account.token_uri,
            signer.clone(),
        ));
        let wallet = GoogleWalletClient::new(http, &config.wallet_api_base_url, credentials);

        Ok(Self {
            wallet,
            signer,
            settings: Arc::new(IssuanceSettings::new(
                &config.issuer_id,
                config.class_lookup_policy,
            )),
        })
    }
}
