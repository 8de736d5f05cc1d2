use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{CreateExpenseRequest, Expense, MessageResponse, UpdateExpenseRequest},
    routes::{period_range, AppJson, IdParams},
    services::entries,
    state::AppState,
    store::{self, expenses::ExpenseFilter},
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseParams {
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub category_id: Option<Uuid>,
    pub account_id: Option<Uuid>,
}

pub async fn list_expenses(
    State(state): State<AppState>,
    Query(params): Query<ExpenseParams>,
) -> AppResult<Json<Vec<Expense>>> {
    let filter = ExpenseFilter {
        range: period_range(params.month, params.year)?,
        category_id: params.category_id,
        account_id: params.account_id,
    };
    let mut conn = state.pool.acquire().await?;
    let records = store::expenses::list(&mut conn, filter).await?;
    Ok(Json(records))
}

pub async fn create_expense(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateExpenseRequest>,
) -> AppResult<(StatusCode, Json<Expense>)> {
    let expense = entries::create_expense(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

pub async fn update_expense(
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateExpenseRequest>,
) -> AppResult<Json<Expense>> {
    let expense = entries::update_expense(&state.pool, payload).await?;
    Ok(Json(expense))
}

pub async fn delete_expense(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> AppResult<Json<MessageResponse>> {
    entries::delete_expense(&state.pool, params.require()?).await?;
    Ok(Json(MessageResponse::new("Expense deleted")))
}
