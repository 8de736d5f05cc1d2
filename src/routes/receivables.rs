use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        CreatePaymentRequest, CreateReceivableRequest, MessageResponse, PaymentReversal,
        Receivable, ReceivablePayment, ReceivableStatus, ReceivableWithPayments,
        UpdateReceivableRequest,
    },
    routes::{AppJson, IdParams},
    services,
    state::AppState,
    store,
};

#[derive(Deserialize)]
pub struct ReceivableParams {
    pub status: Option<ReceivableStatus>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentParams {
    pub receivable_id: Option<Uuid>,
}

pub async fn list_receivables(
    State(state): State<AppState>,
    Query(params): Query<ReceivableParams>,
) -> AppResult<Json<Vec<ReceivableWithPayments>>> {
    let records = services::receivables::list_receivables(&state.pool, params.status).await?;
    Ok(Json(records))
}

pub async fn create_receivable(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateReceivableRequest>,
) -> AppResult<(StatusCode, Json<Receivable>)> {
    let receivable = services::receivables::create_receivable(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(receivable)))
}

pub async fn update_receivable(
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateReceivableRequest>,
) -> AppResult<Json<Receivable>> {
    let receivable = services::receivables::update_receivable(&state.pool, payload).await?;
    Ok(Json(receivable))
}

pub async fn delete_receivable(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> AppResult<Json<MessageResponse>> {
    services::receivables::delete_receivable(&state.pool, params.require()?).await?;
    Ok(Json(MessageResponse::new("Receivable deleted")))
}

pub async fn list_payments(
    State(state): State<AppState>,
    Query(params): Query<PaymentParams>,
) -> AppResult<Json<Vec<ReceivablePayment>>> {
    let mut conn = state.pool.acquire().await?;
    let records = store::receivables::list_payments(&mut conn, params.receivable_id).await?;
    Ok(Json(records))
}

pub async fn create_payment(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreatePaymentRequest>,
) -> AppResult<(StatusCode, Json<ReceivablePayment>)> {
    let payment = services::payments::apply_payment(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

pub async fn delete_payment(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> AppResult<Json<PaymentReversal>> {
    let reversal = services::payments::reverse_payment(&state.pool, params.require()?).await?;
    Ok(Json(reversal))
}
