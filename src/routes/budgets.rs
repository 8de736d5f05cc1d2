use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{Budget, MessageResponse, UpsertBudgetRequest},
    routes::{AppJson, IdParams},
    services::require_positive,
    state::AppState,
    store,
};

#[derive(Deserialize)]
pub struct BudgetParams {
    pub month: Option<i32>,
    pub year: Option<i32>,
}

fn valid_month(month: i32) -> AppResult<i32> {
    if (1..=12).contains(&month) {
        Ok(month)
    } else {
        Err(AppError::Validation("Month must be between 1 and 12".into()))
    }
}

pub async fn list_budgets(
    State(state): State<AppState>,
    Query(params): Query<BudgetParams>,
) -> AppResult<Json<Vec<Budget>>> {
    let (Some(month), Some(year)) = (params.month, params.year) else {
        return Err(AppError::Validation("Month and year are required".into()));
    };

    let mut conn = state.pool.acquire().await?;
    let records = store::budgets::list_for_month(&mut conn, valid_month(month)?, year).await?;
    Ok(Json(records))
}

/// Creates the budget or replaces the amount of the existing one for that month.
pub async fn upsert_budget(
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpsertBudgetRequest>,
) -> AppResult<Json<Budget>> {
    let amount = require_positive(payload.amount, "Amount")?;
    let month = valid_month(payload.month)?;

    let mut transaction = state.pool.begin().await?;
    if !store::categories::exists(&mut transaction, payload.category_id).await? {
        return Err(AppError::not_found("Category"));
    }
    let budget = store::budgets::upsert(
        &mut transaction,
        payload.category_id,
        amount,
        month,
        payload.year,
    )
    .await?;
    transaction.commit().await?;

    tracing::info!(budget_id = %budget.id, category_id = %budget.category_id, "saved budget");
    Ok(Json(budget))
}

pub async fn delete_budget(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> AppResult<Json<MessageResponse>> {
    let id = params.require()?;
    let mut conn = state.pool.acquire().await?;
    if store::budgets::delete(&mut conn, id).await? == 0 {
        return Err(AppError::not_found("Budget"));
    }

    tracing::info!(budget_id = %id, "deleted budget");
    Ok(Json(MessageResponse::new("Budget deleted")))
}
