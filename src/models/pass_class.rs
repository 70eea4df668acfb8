use serde::{Deserialize, Serialize};

/// Fixed local part of the single class this service issues against
pub const CLASS_ID_SUFFIX: &str = "simple_class";

/// Text module ids declared by the class. Objects must populate exactly these.
pub const DETAILS_MODULE_ID: &str = "details";
pub const SUBTITLE_MODULE_ID: &str = "subtitle";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextModuleDefinition {
    pub id: String,
    pub header: String,
}

/// Pass template registered upstream as a generic class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassClass {
    pub id: String,
    #[serde(rename = "textModulesData")]
    pub text_module_definitions: Vec<TextModuleDefinition>,
}

/// Derives the class id for an issuer. Never random: the same issuer always
/// maps to the same class.
pub fn class_id(issuer_id: &str) -> String {
    format!("{}.{}", issuer_id, CLASS_ID_SUFFIX)
}

impl PassClass {
    pub fn for_issuer(issuer_id: &str) -> Self {
        Self {
            id: class_id(issuer_id),
            text_module_definitions: vec![
                TextModuleDefinition {
                    id: DETAILS_MODULE_ID.to_string(),
                    header: "Details".to_string(),
                },
                TextModuleDefinition {
                    id: SUBTITLE_MODULE_ID.to_string(),
                    header: "Subtitle".to_string(),
                },
            ],
        }
    }

    #[cfg(test)]
    pub fn module_ids(&self) -> Vec<&str> {
        self.text_module_definitions
            .iter()
            .map(|m| m.id.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_id_is_derived_from_issuer() {
        assert_eq!(class_id("3388000000022"), "3388000000022.simple_class");
        assert_eq!(PassClass::for_issuer("42").id, PassClass::for_issuer("42").id);
    }

    #[test]
    fn test_class_serialization() {
        let class = PassClass::for_issuer("42");
        let json = serde_json::to_value(&class).unwrap();

        assert_eq!(json["id"], "42.simple_class");
        assert_eq!(json["textModulesData"][0]["id"], "details");
        assert_eq!(json["textModulesData"][0]["header"], "Details");
        assert_eq!(json["textModulesData"][1]["id"], "subtitle");
        assert_eq!(json["textModulesData"][1]["header"], "Subtitle");
    }
}
