use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;

use crate::models::{pass_class::PassClass, pass_object::PassObject};
use crate::services::oauth::service_account::{CredentialError, ServiceAccountCredentials};

pub const DEFAULT_WALLET_API_BASE_URL: &str =
    "https://walletobjects.googleapis.com/walletobjects/v1";

#[derive(thiserror::Error, Debug)]
pub enum WalletApiError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Authorization failed: {0}")]
    Auth(#[from] CredentialError),

    #[error("Resource not found")]
    NotFound,

    #[error("Resource already exists")]
    Conflict,

    #[error("Wallet API error: status {status}: {body}")]
    ApiError { status: u16, body: String },
}

/// Upstream calls the issuance flow depends on
pub trait WalletApi: Send + Sync {
    /// Succeeds when the class exists; `NotFound` when it does not
    fn get_class(
        &self,
        class_id: &str,
    ) -> impl Future<Output = Result<(), WalletApiError>> + Send;

    fn insert_class(
        &self,
        class: &PassClass,
    ) -> impl Future<Output = Result<(), WalletApiError>> + Send;

    fn insert_object(
        &self,
        object: &PassObject,
    ) -> impl Future<Output = Result<(), WalletApiError>> + Send;
}

/// Wallet objects REST client authorized with service account bearer tokens
#[derive(Clone)]
pub struct GoogleWalletClient {
    http: Client,
    base_url: String,
    credentials: Arc<ServiceAccountCredentials>,
}

impl GoogleWalletClient {
    pub fn new(http: Client, base_url: &str, credentials: Arc<ServiceAccountCredentials>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    async fn bearer_token(&self) -> Result<String, WalletApiError> {
        Ok(self.credentials.access_token().await?.secret().clone())
    }

    async fn post_json<T: Serialize>(&self, url: &str, body: &T) -> Result<(), WalletApiError> {
        let token = self.bearer_token().await?;

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;

        check_status(response).await
    }
}

async fn check_status(response: reqwest::Response) -> Result<(), WalletApiError> {
    let status = response.status();

    if status.is_success() {
        return Ok(());
    }

    match status {
        StatusCode::NOT_FOUND => Err(WalletApiError::NotFound),
        StatusCode::CONFLICT => Err(WalletApiError::Conflict),
        _ => {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(
                status = %status,
                error = %body,
                "Wallet API request failed"
            );
            Err(WalletApiError::ApiError {
                status: status.as_u16(),
                body,
            })
        }
    }
}

impl WalletApi for GoogleWalletClient {
    #[tracing::instrument(skip(self))]
    async fn get_class(&self, class_id: &str) -> Result<(), WalletApiError> {
        let token = self.bearer_token().await?;
        let url = format!("{}/genericClass/{}", self.base_url, class_id);

        let response = self.http.get(&url).bearer_auth(token).send().await?;

        check_status(response).await
    }

    #[tracing::instrument(skip(self, class), fields(class_id = %class.id))]
    async fn insert_class(&self, class: &PassClass) -> Result<(), WalletApiError> {
        let url = format!("{}/genericClass", self.base_url);
        self.post_json(&url, class).await
    }

    #[tracing::instrument(skip(self, object), fields(object_id = %object.id))]
    async fn insert_object(&self, object: &PassObject) -> Result<(), WalletApiError> {
        let url = format!("{}/genericObject", self.base_url);
        self.post_json(&url, object).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum WalletCall {
        GetClass(String),
        InsertClass(String),
        InsertObject(String),
    }

    /// In-memory wallet API that records every call it receives
    #[derive(Default)]
    pub struct RecordingWalletApi {
        pub calls: Mutex<Vec<WalletCall>>,
        pub class_exists: Mutex<bool>,
        pub lookup_failure: Option<u16>,
        pub insert_class_failure: Option<u16>,
        pub insert_class_conflict: bool,
        pub insert_object_failure: Option<u16>,
    }

    fn stub_error(status: u16) -> WalletApiError {
        WalletApiError::ApiError {
            status,
            body: "stubbed failure".to_string(),
        }
    }

    impl RecordingWalletApi {
        pub fn with_existing_class() -> Self {
            let api = Self::default();
            *api.class_exists.lock().unwrap() = true;
            api
        }

        pub fn calls(&self) -> Vec<WalletCall> {
            self.calls.lock().unwrap().clone()
        }

        pub fn count(&self, matches: impl Fn(&WalletCall) -> bool) -> usize {
            self.calls.lock().unwrap().iter().filter(|c| matches(c)).count()
        }

        fn record(&self, call: WalletCall) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl WalletApi for RecordingWalletApi {
        async fn get_class(&self, class_id: &str) -> Result<(), WalletApiError> {
            self.record(WalletCall::GetClass(class_id.to_string()));

            if let Some(status) = self.lookup_failure {
                return Err(stub_error(status));
            }
            if *self.class_exists.lock().unwrap() {
                Ok(())
            } else {
                Err(WalletApiError::NotFound)
            }
        }

        async fn insert_class(&self, class: &PassClass) -> Result<(), WalletApiError> {
            self.record(WalletCall::InsertClass(class.id.clone()));

            if let Some(status) = self.insert_class_failure {
                return Err(stub_error(status));
            }
            if self.insert_class_conflict {
                return Err(WalletApiError::Conflict);
            }
            *self.class_exists.lock().unwrap() = true;
            Ok(())
        }

        async fn insert_object(&self, object: &PassObject) -> Result<(), WalletApiError> {
            self.record(WalletCall::InsertObject(object.id.clone()));

            match self.insert_object_failure {
                Some(status) => Err(stub_error(status)),
                None => Ok(()),
            }
        }
    }
}
