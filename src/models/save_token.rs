use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::pass_object::PassObject;

pub const SAVE_AUDIENCE: &str = "google";
pub const SAVE_TOKEN_TYPE: &str = "savetowallet";
pub const SAVE_URL_BASE: &str = "https://pay.google.com/gp/v/save/";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePayload {
    pub generic_objects: Vec<PassObject>,
}

/// Claims of a save-to-wallet token. Always wraps exactly one object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveClaims {
    pub iss: String,
    pub aud: String,
    pub typ: String,
    pub iat: i64,
    pub payload: SavePayload,
}

impl SaveClaims {
    pub fn new(issuer_email: &str, object: PassObject, issued_at: i64) -> Self {
        Self {
            iss: issuer_email.to_string(),
            aud: SAVE_AUDIENCE.to_string(),
            typ: SAVE_TOKEN_TYPE.to_string(),
            iat: issued_at,
            payload: SavePayload {
                generic_objects: vec![object],
            },
        }
    }
}

/// Save-to-wallet URL embedding a signed token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveLink(String);

impl SaveLink {
    pub fn from_token(token: &str) -> Self {
        Self(format!("{}{}", SAVE_URL_BASE, token))
    }

    #[cfg(test)]
    pub fn token(&self) -> &str {
        &self.0[SAVE_URL_BASE.len()..]
    }

    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SaveLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
