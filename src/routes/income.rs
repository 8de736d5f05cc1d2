use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{CreateIncomeRequest, Income, MessageResponse, UpdateIncomeRequest},
    routes::{period_range, AppJson, IdParams},
    services::entries,
    state::AppState,
    store,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeParams {
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub account_id: Option<Uuid>,
}

pub async fn list_income(
    State(state): State<AppState>,
    Query(params): Query<IncomeParams>,
) -> AppResult<Json<Vec<Income>>> {
    let range = period_range(params.month, params.year)?;
    let mut conn = state.pool.acquire().await?;
    let records = store::incomes::list(&mut conn, range, params.account_id).await?;
    Ok(Json(records))
}

pub async fn create_income(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateIncomeRequest>,
) -> AppResult<(StatusCode, Json<Income>)> {
    let income = entries::create_income(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(income)))
}

pub async fn update_income(
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateIncomeRequest>,
) -> AppResult<Json<Income>> {
    let income = entries::update_income(&state.pool, payload).await?;
    Ok(Json(income))
}

pub async fn delete_income(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> AppResult<Json<MessageResponse>> {
    entries::delete_income(&state.pool, params.require()?).await?;
    Ok(Json(MessageResponse::new("Income deleted")))
}
