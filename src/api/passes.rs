use axum::{
    async_trait,
    extract::{FromRequest, Request, State},
    http::header,
    routing::post,
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::error::{AppError, Result};
use crate::models::pass_object::IssuePassForm;
use crate::services::pass_issuer;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePassResponse {
    pub save_url: String,
}

/// Create-pass body, decoded as JSON or as a urlencoded form depending on
/// the request's content type
pub struct PassPayload(pub IssuePassForm);

#[async_trait]
impl<S> FromRequest<S> for PassPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|content_type| content_type.starts_with("application/json"))
            .unwrap_or(false);

        if is_json {
            let Json(form) = Json::<IssuePassForm>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            Ok(Self(form))
        } else {
            let Form(form) = Form::<IssuePassForm>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            Ok(Self(form))
        }
    }
}

/// Issues a pass and returns its save-to-wallet link
async fn create_pass(
    State(state): State<AppState>,
    PassPayload(form): PassPayload,
) -> Result<Json<CreatePassResponse>> {
    let result =
        pass_issuer::issue_pass(&state.wallet, &state.signer, &state.settings, form).await?;

    tracing::info!(object_id = %result.object.id, "Pass issued successfully");

    Ok(Json(CreatePassResponse {
        save_url: result.save_link.to_string(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/create", post(create_pass))
}
