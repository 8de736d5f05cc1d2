pub mod auth;
pub mod balance;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{auth::Session, config::Config, error::AppResult, state::AppState};

/// Opens the database, applies migrations and seeds the default account and
/// categories.
pub async fn build_state(config: Config) -> AppResult<AppState> {
    let pool = db::connect(&config.database_url).await?;
    db::migrate(&pool).await?;
    services::accounts::ensure_default_account(&pool).await?;
    services::accounts::ensure_default_categories(&pool).await?;

    Ok(AppState {
        pool,
        config: Arc::new(config),
    })
}

pub fn app_router(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/accounts",
            get(routes::accounts::list_accounts)
                .post(routes::accounts::create_account)
                .put(routes::accounts::update_account)
                .delete(routes::accounts::delete_account),
        )
        .route("/accounts/balances", get(routes::accounts::account_balances))
        .route(
            "/income",
            get(routes::income::list_income)
                .post(routes::income::create_income)
                .put(routes::income::update_income)
                .delete(routes::income::delete_income),
        )
        .route(
            "/expenses",
            get(routes::expenses::list_expenses)
                .post(routes::expenses::create_expense)
                .put(routes::expenses::update_expense)
                .delete(routes::expenses::delete_expense),
        )
        .route(
            "/transfers",
            get(routes::transfers::list_transfers)
                .post(routes::transfers::create_transfer)
                .delete(routes::transfers::delete_transfer),
        )
        .route(
            "/adjustments",
            get(routes::adjustments::list_adjustments)
                .post(routes::adjustments::reconcile)
                .delete(routes::adjustments::delete_adjustment),
        )
        .route(
            "/balance",
            get(routes::balance::get_initial_balance).post(routes::balance::set_initial_balance),
        )
        .route("/balance/history", get(routes::balance::initial_balance_history))
        .route(
            "/receivables",
            get(routes::receivables::list_receivables)
                .post(routes::receivables::create_receivable)
                .put(routes::receivables::update_receivable)
                .delete(routes::receivables::delete_receivable),
        )
        .route(
            "/receivables/payments",
            get(routes::receivables::list_payments)
                .post(routes::receivables::create_payment)
                .delete(routes::receivables::delete_payment),
        )
        .route(
            "/categories",
            get(routes::categories::list_categories)
                .post(routes::categories::create_category)
                .put(routes::categories::update_category)
                .delete(routes::categories::delete_category),
        )
        .route(
            "/budgets",
            get(routes::budgets::list_budgets)
                .post(routes::budgets::upsert_budget)
                .delete(routes::budgets::delete_budget),
        )
        .route("/stats", get(routes::stats::monthly_stats))
        .route("/auth/session", get(auth::session))
        .route_layer(middleware::from_extractor_with_state::<Session, _>(
            state.clone(),
        ));

    let public = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout));

    let cors = cors_layer(&state.config.cors_allow);

    Router::new()
        .route("/health", get(health))
        .nest("/api", protected.merge(public))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

async fn health() -> &'static str {
    "ok"
}
