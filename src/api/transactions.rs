//! Transaction history endpoint

use crate::database::repository::TransactionStore;
use crate::database::transaction_repository::TransactionRecord;
use crate::error::{AppError, ValidationError};
use crate::middleware::error::{app_error_response, get_request_id_from_headers, ErrorResponse};
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Clone)]
pub struct TransactionsState {
    pub transactions: Arc<dyn TransactionStore>,
}

#[derive(Debug, Deserialize)]
pub struct TransactionsQuery {
    pub payer_email: String,
}

/// List a payer's transactions, newest first.
pub async fn list_transactions(
    State(state): State<TransactionsState>,
    headers: HeaderMap,
    Query(query): Query<TransactionsQuery>,
) -> Result<Json<Vec<TransactionRecord>>, (StatusCode, Json<ErrorResponse>)> {
    let request_id = get_request_id_from_headers(&headers);

    if query.payer_email.trim().is_empty() {
        return Err(app_error_response(
            AppError::validation(ValidationError::MissingField {
                field: "payer_email".to_string(),
            }),
            request_id,
        ));
    }

    state
        .transactions
        .list_by_payer(query.payer_email.trim())
        .await
        .map(Json)
        .map_err(|e| app_error_response(AppError::from(e), request_id))
}
