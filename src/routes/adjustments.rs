use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Adjustment, AdjustmentRemoval, ReconcileRequest},
    routes::{AppJson, IdParams},
    services::reconciliation,
    state::AppState,
    store,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentParams {
    pub account_id: Option<Uuid>,
}

pub async fn list_adjustments(
    State(state): State<AppState>,
    Query(params): Query<AdjustmentParams>,
) -> AppResult<Json<Vec<Adjustment>>> {
    let mut conn = state.pool.acquire().await?;
    let records = store::adjustments::list(&mut conn, params.account_id).await?;
    Ok(Json(records))
}

pub async fn reconcile(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ReconcileRequest>,
) -> AppResult<(StatusCode, Json<Adjustment>)> {
    let adjustment = reconciliation::reconcile(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(adjustment)))
}

pub async fn delete_adjustment(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> AppResult<Json<AdjustmentRemoval>> {
    let removal = reconciliation::delete_adjustment(&state.pool, params.require()?).await?;
    Ok(Json(removal))
}
