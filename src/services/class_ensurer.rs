use std::str::FromStr;

use crate::models::pass_class::PassClass;
use crate::services::wallet_api::{WalletApi, WalletApiError};

/// What to do when the class lookup fails with anything other than "not found"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassLookupPolicy {
    /// Log the failure and continue issuing; the later object insert surfaces
    /// any real problem with the class.
    #[default]
    Suppress,
    /// Fail the request with the lookup error
    Propagate,
}

impl FromStr for ClassLookupPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "suppress" => Ok(Self::Suppress),
            "propagate" => Ok(Self::Propagate),
            other => Err(format!(
                "unknown class lookup policy '{}' (expected 'suppress' or 'propagate')",
                other
            )),
        }
    }
}

/// Outcome of an ensure pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassStatus {
    Existing,
    Created,
    /// Lookup failed and the failure was suppressed; existence is unknown
    Unresolved,
}

/// Makes sure the class exists upstream, creating it on a 404.
/// Safe to call on every request.
#[tracing::instrument(skip(api, class), fields(class_id = %class.id))]
pub async fn ensure_class<W: WalletApi>(
    api: &W,
    class: &PassClass,
    policy: ClassLookupPolicy,
) -> Result<ClassStatus, WalletApiError> {
    match api.get_class(&class.id).await {
        Ok(()) => {
            tracing::debug!("Class already exists");
            Ok(ClassStatus::Existing)
        }
        Err(WalletApiError::NotFound) => {
            tracing::info!("Class not found, creating");

            match api.insert_class(class).await {
                Ok(()) => {
                    tracing::info!("Created class");
                    Ok(ClassStatus::Created)
                }
                // Another request created it between our lookup and insert
                Err(WalletApiError::Conflict) => {
                    tracing::debug!("Class created concurrently");
                    Ok(ClassStatus::Existing)
                }
                Err(e) => Err(e),
            }
        }
        Err(e) => match policy {
            ClassLookupPolicy::Suppress => {
                tracing::error!(
                    error = %e,
                    "Class lookup failed; continuing without confirming class exists"
                );
                Ok(ClassStatus::Unresolved)
            }
            ClassLookupPolicy::Propagate => Err(e),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::wallet_api::testing::{RecordingWalletApi, WalletCall};

    fn class() -> PassClass {
        PassClass::for_issuer("42")
    }

    #[tokio::test]
    async fn test_existing_class_is_left_alone() {
        let api = RecordingWalletApi::with_existing_class();

        let status = ensure_class(&api, &class(), ClassLookupPolicy::Suppress)
            .await
            .unwrap();

        assert_eq!(status, ClassStatus::Existing);
        assert_eq!(
            api.calls(),
            vec![WalletCall::GetClass("42.simple_class".to_string())]
        );
    }

    #[tokio::test]
    async fn test_missing_class_is_created_once() {
        let api = RecordingWalletApi::default();

        let first = ensure_class(&api, &class(), ClassLookupPolicy::Suppress)
            .await
            .unwrap();
        let second = ensure_class(&api, &class(), ClassLookupPolicy::Suppress)
            .await
            .unwrap();

        assert_eq!(first, ClassStatus::Created);
        assert_eq!(second, ClassStatus::Existing);
        assert_eq!(
            api.count(|c| matches!(c, WalletCall::InsertClass(_))),
            1
        );
    }

    #[tokio::test]
    async fn test_create_failure_is_propagated() {
        let api = RecordingWalletApi {
            insert_class_failure: Some(400),
            ..Default::default()
        };

        let result = ensure_class(&api, &class(), ClassLookupPolicy::Suppress).await;

        assert!(matches!(
            result,
            Err(WalletApiError::ApiError { status: 400, .. })
        ));
    }

    #[tokio::test]
    async fn test_concurrent_create_conflict_counts_as_existing() {
        let api = RecordingWalletApi {
            insert_class_conflict: true,
            ..Default::default()
        };

        let status = ensure_class(&api, &class(), ClassLookupPolicy::Suppress)
            .await
            .unwrap();

        assert_eq!(status, ClassStatus::Existing);
    }

    #[tokio::test]
    async fn test_lookup_error_suppressed_skips_create() {
        // Suppression leaves class existence unknown: no create is attempted
        let api = RecordingWalletApi {
            lookup_failure: Some(503),
            ..Default::default()
        };

        let status = ensure_class(&api, &class(), ClassLookupPolicy::Suppress)
            .await
            .unwrap();

        assert_eq!(status, ClassStatus::Unresolved);
        assert_eq!(
            api.count(|c| matches!(c, WalletCall::InsertClass(_))),
            0
        );
    }

    #[tokio::test]
    async fn test_lookup_error_propagated_when_configured() {
        let api = RecordingWalletApi {
            lookup_failure: Some(503),
            ..Default::default()
        };

        let result = ensure_class(&api, &class(), ClassLookupPolicy::Propagate).await;

        assert!(matches!(
            result,
            Err(WalletApiError::ApiError { status: 503, .. })
        ));
        assert_eq!(
            api.count(|c| matches!(c, WalletCall::InsertClass(_))),
            0
        );
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("suppress".parse::<ClassLookupPolicy>(), Ok(ClassLookupPolicy::Suppress));
        assert_eq!(" Propagate ".parse::<ClassLookupPolicy>(), Ok(ClassLookupPolicy::Propagate));
        assert!("retry".parse::<ClassLookupPolicy>().is_err());
    }
}
