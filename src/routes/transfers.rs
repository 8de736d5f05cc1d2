use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{CreateTransferRequest, MessageResponse, Transfer},
    routes::{AppJson, IdParams, PeriodParams},
    services::entries,
    state::AppState,
    store,
};

pub async fn list_transfers(
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> AppResult<Json<Vec<Transfer>>> {
    let range = params.range()?;
    let mut conn = state.pool.acquire().await?;
    let records = store::transfers::list(&mut conn, range).await?;
    Ok(Json(records))
}

pub async fn create_transfer(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateTransferRequest>,
) -> AppResult<(StatusCode, Json<Transfer>)> {
    let transfer = entries::create_transfer(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(transfer)))
}

pub async fn delete_transfer(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> AppResult<Json<MessageResponse>> {
    entries::delete_transfer(&state.pool, params.require()?).await?;
    Ok(Json(MessageResponse::new("Transfer deleted")))
}
