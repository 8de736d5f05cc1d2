use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult, models::StatsResponse, routes::PeriodParams, services, state::AppState,
};

pub async fn monthly_stats(
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> AppResult<Json<StatsResponse>> {
    let stats = services::stats::monthly_stats(&state.pool, params.month, params.year).await?;
    Ok(Json(stats))
}
