use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    balance,
    error::AppResult,
    models::{
        Account, AccountBalancesResponse, CreateAccountRequest, MessageResponse,
        UpdateAccountRequest,
    },
    routes::{AppJson, IdParams},
    services,
    state::AppState,
    store,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceParams {
    pub as_of: Option<NaiveDate>,
}

pub async fn list_accounts(State(state): State<AppState>) -> AppResult<Json<Vec<Account>>> {
    let mut conn = state.pool.acquire().await?;
    let records = store::accounts::list(&mut conn).await?;
    Ok(Json(records))
}

pub async fn create_account(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateAccountRequest>,
) -> AppResult<(StatusCode, Json<Account>)> {
    let account = services::accounts::create_account(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

pub async fn update_account(
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateAccountRequest>,
) -> AppResult<Json<Account>> {
    let account = services::accounts::update_account(&state.pool, payload).await?;
    Ok(Json(account))
}

pub async fn delete_account(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> AppResult<Json<MessageResponse>> {
    services::accounts::delete_account(&state.pool, params.require()?).await?;
    Ok(Json(MessageResponse::new("Account deleted")))
}

pub async fn account_balances(
    State(state): State<AppState>,
    Query(params): Query<BalanceParams>,
) -> AppResult<Json<AccountBalancesResponse>> {
    let mut conn = state.pool.acquire().await?;
    let accounts = balance::all_account_balances(&mut conn, params.as_of).await?;
    let total_balance = balance::total_balance(&accounts)?;
    Ok(Json(AccountBalancesResponse {
        as_of: params.as_of,
        accounts,
        total_balance,
    }))
}
