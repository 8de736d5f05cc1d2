use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{InitialBalance, InitialBalanceView, SetInitialBalanceRequest},
    routes::AppJson,
    services::{optional_text, require_amount},
    state::AppState,
    store,
};

pub async fn get_initial_balance(
    State(state): State<AppState>,
) -> AppResult<Json<InitialBalanceView>> {
    let mut conn = state.pool.acquire().await?;
    let view = match store::initial_balances::latest(&mut conn).await? {
        Some(record) => InitialBalanceView {
            amount: record.amount,
            note: record.note,
        },
        None => InitialBalanceView {
            amount: Decimal::ZERO,
            note: None,
        },
    };
    Ok(Json(view))
}

/// Appends a new baseline; earlier rows stay as history.
pub async fn set_initial_balance(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SetInitialBalanceRequest>,
) -> AppResult<(StatusCode, Json<InitialBalance>)> {
    let record = InitialBalance {
        id: Uuid::new_v4(),
        amount: require_amount(payload.amount, "Amount")?,
        note: optional_text(payload.note),
        created_at: Utc::now(),
    };

    let mut conn = state.pool.acquire().await?;
    store::initial_balances::insert(&mut conn, &record).await?;

    tracing::info!(initial_balance_id = %record.id, amount = %record.amount, "set initial balance");
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn initial_balance_history(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<InitialBalance>>> {
    let mut conn = state.pool.acquire().await?;
    let records = store::initial_balances::history(&mut conn).await?;
    Ok(Json(records))
}
