use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use secrecy::ExposeSecret;
use serde::Serialize;

use crate::models::{pass_object::PassObject, save_token::SaveClaims};
use crate::services::oauth::service_account::ServiceAccountKey;

#[derive(thiserror::Error, Debug)]
pub enum SigningError {
    #[error("Invalid private key: {0}")]
    InvalidKey(jsonwebtoken::errors::Error),

    #[error("Token encoding failed: {0}")]
    Encoding(jsonwebtoken::errors::Error),
}

/// RS256 signer bound to the service account's private key. Built once at boot
/// and shared read-only by every request.
pub struct TokenSigner {
    issuer_email: String,
    key_id: Option<String>,
    key: EncodingKey,
}

impl TokenSigner {
    pub fn from_service_account(account: &ServiceAccountKey) -> Result<Self, SigningError> {
        let key = EncodingKey::from_rsa_pem(account.private_key.expose_secret().as_bytes())
            .map_err(SigningError::InvalidKey)?;

        Ok(Self {
            issuer_email: account.client_email.clone(),
            key_id: account.private_key_id.clone(),
            key,
        })
    }

    pub fn issuer_email(&self) -> &str {
        &self.issuer_email
    }

    /// Signs arbitrary claims as a compact JWT
    pub fn sign<T: Serialize>(&self, claims: &T) -> Result<String, SigningError> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key_id.clone();

        encode(&header, claims, &self.key).map_err(SigningError::Encoding)
    }

    /// Wraps one pass object into save-to-wallet claims and signs them
    pub fn sign_save_token(
        &self,
        object: PassObject,
        issued_at: i64,
    ) -> Result<String, SigningError> {
        let claims = SaveClaims::new(&self.issuer_email, object, issued_at);
        self.sign(&claims)
    }
}
