use serde::{Deserialize, Serialize};

use crate::models::pass_class::{PassClass, DETAILS_MODULE_ID, SUBTITLE_MODULE_ID};

pub const DEFAULT_LANGUAGE: &str = "en-US";

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum PassInputError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// Raw caller input as posted to the create endpoint. Fields stay optional here
/// so absence surfaces as a client error rather than a body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssuePassForm {
    #[serde(alias = "details")]
    pub title: Option<String>,
    pub subtitle: Option<String>,
}

/// Validated input: both fields present and non-blank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassInput {
    pub title: String,
    pub subtitle: String,
}

impl IssuePassForm {
    pub fn validate(self) -> Result<PassInput, PassInputError> {
        let title = required(self.title, "title")?;
        let subtitle = required(self.subtitle, "subtitle")?;
        Ok(PassInput { title, subtitle })
    }
}

fn required(value: Option<String>, name: &'static str) -> Result<String, PassInputError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(PassInputError::MissingField(name)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedString {
    pub language: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedString {
    pub default_value: TranslatedString,
}

impl LocalizedString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            default_value: TranslatedString {
                language: DEFAULT_LANGUAGE.to_string(),
                value: value.into(),
            },
        }
    }

    #[cfg(test)]
    pub fn value(&self) -> &str {
        &self.default_value.value
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextModuleValue {
    pub id: String,
    pub body: String,
}

/// One issued pass, in the provider's generic object schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassObject {
    pub id: String,
    pub class_id: String,
    #[serde(rename = "cardTitle")]
    pub display_title: LocalizedString,
    #[serde(rename = "header")]
    pub display_subtitle: LocalizedString,
    #[serde(rename = "textModulesData")]
    pub text_module_values: Vec<TextModuleValue>,
}

/// Replaces every character outside `[A-Za-z0-9_.-]` with `_`
pub fn slugify(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Object id: `{issuer}.{slug}_{millis}`. Two objects built from the same
/// subtitle within the same millisecond collide.
pub fn object_id(issuer_id: &str, subtitle: &str, timestamp_ms: i64) -> String {
    format!("{}.{}_{}", issuer_id, slugify(subtitle), timestamp_ms)
}

/// Maps validated input onto the pass object schema. Module ids here must stay
/// in sync with [`PassClass::for_issuer`].
pub fn build_object(
    issuer_id: &str,
    class: &PassClass,
    input: &PassInput,
    timestamp_ms: i64,
) -> PassObject {
    PassObject {
        id: object_id(issuer_id, &input.subtitle, timestamp_ms),
        class_id: class.id.clone(),
        display_title: LocalizedString::new(input.title.clone()),
        display_subtitle: LocalizedString::new(input.subtitle.clone()),
        text_module_values: vec![
            TextModuleValue {
                id: DETAILS_MODULE_ID.to_string(),
                body: input.title.clone(),
            },
            TextModuleValue {
                id: SUBTITLE_MODULE_ID.to_string(),
                body: input.subtitle.clone(),
            },
        ],
    }
}
