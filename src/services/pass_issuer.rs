use chrono::Utc;
use std::time::Instant;

use crate::models::{
    pass_class::PassClass,
    pass_object::{build_object, IssuePassForm, PassInputError, PassObject},
    save_token::SaveLink,
};
use crate::services::class_ensurer::{self, ClassLookupPolicy, ClassStatus};
use crate::services::token_signer::{SigningError, TokenSigner};
use crate::services::wallet_api::{WalletApi, WalletApiError};

#[derive(thiserror::Error, Debug)]
pub enum PassIssuanceError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] PassInputError),

    #[error("Class setup failed: {0}")]
    ClassSetup(#[source] WalletApiError),

    #[error("Object creation failed: {0}")]
    ObjectCreation(#[source] WalletApiError),

    #[error("Save token signing failed: {0}")]
    Signing(#[from] SigningError),
}

/// Issuer-wide settings, fixed at boot
#[derive(Debug, Clone)]
pub struct IssuanceSettings {
    pub issuer_id: String,
    pub class: PassClass,
    pub class_lookup_policy: ClassLookupPolicy,
}

impl IssuanceSettings {
    pub fn new(issuer_id: &str, class_lookup_policy: ClassLookupPolicy) -> Self {
        Self {
            issuer_id: issuer_id.to_string(),
            class: PassClass::for_issuer(issuer_id),
            class_lookup_policy,
        }
    }
}

/// Result of pass issuance
#[derive(Debug)]
pub struct IssuePassResult {
    pub object: PassObject,
    pub save_link: SaveLink,
    pub class_status: ClassStatus,
}

/// Issues a new pass
///
/// Runs every step in order, each awaited before the next:
/// 1. Validates the input (no upstream calls on failure)
/// 2. Ensures the class exists
/// 3. Builds the pass object
/// 4. Creates the object upstream
/// 5. Signs the save-to-wallet token
/// 6. Returns the save link
#[tracing::instrument(skip_all, fields(issuer_id = %settings.issuer_id))]
pub async fn issue_pass<W: WalletApi>(
    api: &W,
    signer: &TokenSigner,
    settings: &IssuanceSettings,
    form: IssuePassForm,
) -> Result<IssuePassResult, PassIssuanceError> {
    let start_time = Instant::now();

    // 1. Validate before touching the network
    let input = form.validate()?;

    // 2. Ensure class
    let class_status =
        class_ensurer::ensure_class(api, &settings.class, settings.class_lookup_policy)
            .await
            .map_err(PassIssuanceError::ClassSetup)?;

    tracing::debug!(class_status = ?class_status, "Class ensured");

    // 3. Build object
    let now = Utc::now();
    let object = build_object(
        &settings.issuer_id,
        &settings.class,
        &input,
        now.timestamp_millis(),
    );

    // 4. Create object upstream
    let wallet_start = Instant::now();
    api.insert_object(&object)
        .await
        .map_err(PassIssuanceError::ObjectCreation)?;
    let wallet_duration = wallet_start.elapsed();

    tracing::info!(
        object_id = %object.id,
        wallet_api_duration_ms = wallet_duration.as_millis(),
        "Pass object created"
    );

    // 5. Sign
    let token = signer.sign_save_token(object.clone(), now.timestamp())?;

    // 6. Save link
    let save_link = SaveLink::from_token(&token);

    tracing::info!(
        object_id = %object.id,
        duration_ms = start_time.elapsed().as_millis(),
        "Pass issuance completed"
    );

    Ok(IssuePassResult {
        object,
        save_link,
        class_status,
    })
}
