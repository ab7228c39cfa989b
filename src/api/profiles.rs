//! Bank profile endpoint
//!
//! Account identity and sessions live in the external auth service; this
//! endpoint only creates the banking profile row that recipient validation
//! resolves against.

use crate::database::profile_repository::BankProfile;
use crate::database::repository::ProfileStore;
use crate::error::{AppError, DomainError, ValidationError};
use crate::middleware::error::{app_error_response, get_request_id_from_headers, ErrorResponse};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct ProfilesState {
    pub profiles: Arc<dyn ProfileStore>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    pub email: String,
    pub full_name: String,
}

pub async fn create_profile(
    State(state): State<ProfilesState>,
    headers: HeaderMap,
    Json(payload): Json<CreateProfileRequest>,
) -> Result<Json<BankProfile>, (StatusCode, Json<ErrorResponse>)> {
    let request_id = get_request_id_from_headers(&headers);

    let email = payload.email.trim().to_string();
    let full_name = payload.full_name.trim().to_string();

    if email.is_empty() || !email.contains('@') {
        return Err(app_error_response(
            AppError::validation(ValidationError::InvalidField {
                field: "email".to_string(),
                reason: "must be an email address".to_string(),
            }),
            request_id,
        ));
    }
    if full_name.is_empty() {
        return Err(app_error_response(
            AppError::validation(ValidationError::MissingField {
                field: "full_name".to_string(),
            }),
            request_id,
        ));
    }

    match state.profiles.insert(&email, &full_name).await {
        Ok(profile) => {
            info!(email = %profile.email, "bank profile created");
            Ok(Json(profile))
        }
        Err(err) if err.is_unique_violation() => Err(app_error_response(
            AppError::domain(DomainError::ProfileExists { email }),
            request_id,
        )),
        Err(err) => Err(app_error_response(AppError::from(err), request_id)),
    }
}
