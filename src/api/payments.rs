//! Payment endpoints: form submission and the gateway callback route

use crate::database::transaction_repository::TransactionRecord;
use crate::error::{AppError, ValidationError};
use crate::middleware::error::{app_error_response, get_request_id_from_headers, ErrorResponse};
use crate::services::payment_flow::{AttemptState, PaymentFlow, SubmitRequest};
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

#[derive(Clone)]
pub struct PaymentsState {
    pub flow: Arc<PaymentFlow>,
}

#[derive(Debug, Deserialize)]
pub struct InitiatePaymentRequest {
    pub payer_email: String,
    pub recipient_email: String,
    pub amount: String,
}

#[derive(Debug, Serialize)]
pub struct InitiatePaymentResponse {
    pub status: AttemptState,
    pub authorization_url: String,
    pub reference: String,
}

pub async fn initiate_payment(
    State(state): State<PaymentsState>,
    headers: HeaderMap,
    Json(payload): Json<InitiatePaymentRequest>,
) -> Result<Json<InitiatePaymentResponse>, (StatusCode, Json<ErrorResponse>)> {
    let request_id = get_request_id_from_headers(&headers);

    let amount = BigDecimal::from_str(payload.amount.trim()).map_err(|_| {
        app_error_response(
            AppError::validation(ValidationError::InvalidAmount {
                amount: payload.amount.clone(),
                reason: "not a decimal number".to_string(),
            }),
            request_id.clone(),
        )
    })?;

    let outcome = state
        .flow
        .submit(SubmitRequest {
            payer_email: payload.payer_email,
            recipient_email: payload.recipient_email,
            amount,
        })
        .await
        .map_err(|e| app_error_response(e, request_id.clone()))?;

    Ok(Json(InitiatePaymentResponse {
        status: AttemptState::AwaitingRedirectReturn,
        authorization_url: outcome.authorization_url,
        reference: outcome.reference,
    }))
}

#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    pub reference: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VerifyPaymentResponse {
    pub status: AttemptState,
    pub transaction: TransactionRecord,
}

pub async fn verify_payment(
    State(state): State<PaymentsState>,
    headers: HeaderMap,
    Query(query): Query<VerifyQuery>,
) -> Result<Json<VerifyPaymentResponse>, (StatusCode, Json<ErrorResponse>)> {
    let request_id = get_request_id_from_headers(&headers);

    let outcome = state
        .flow
        .confirm(query.reference.as_deref())
        .await
        .map_err(|e| app_error_response(e, request_id.clone()))?;

    Ok(Json(VerifyPaymentResponse {
        status: AttemptState::Recorded,
        transaction: outcome.record,
    }))
}
