#![allow(dead_code)]

use std::path::Path;

use chrono::NaiveDate;
use expense_tracker_api::{
    build_state,
    config::Config,
    models::{Account, AccountType, CreateAccountRequest},
    services, store,
    state::AppState,
};
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret";

pub fn test_config(password_hash: Option<String>) -> Config {
    config_for("sqlite::memory:", password_hash)
}

fn config_for(database_url: &str, password_hash: Option<String>) -> Config {
    Config::from_lookup(|name| match name {
        "DATABASE_URL" => Some(database_url.into()),
        "JWT_SECRET" => Some(JWT_SECRET.into()),
        "AUTH_USERNAME" => Some("admin".into()),
        "AUTH_PASSWORD_HASH" => password_hash.clone(),
        _ => None,
    })
    .unwrap()
}

/// Fresh in-memory database with migrations and seed data applied.
pub async fn test_state() -> AppState {
    build_state(test_config(None)).await.unwrap()
}

pub async fn test_pool() -> SqlitePool {
    test_state().await.pool
}

/// WAL database file under `dir`, served by a multi-connection pool.
pub async fn file_pool(dir: &Path) -> SqlitePool {
    let url = format!("sqlite://{}", dir.join("tracker.db").display());
    build_state(config_for(&url, None)).await.unwrap().pool
}

pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub async fn default_account(pool: &SqlitePool) -> Account {
    let mut conn = pool.acquire().await.unwrap();
    store::accounts::find_default(&mut conn).await.unwrap().unwrap()
}

pub async fn create_account(pool: &SqlitePool, name: &str, initial_balance: Decimal) -> Account {
    services::accounts::create_account(
        pool,
        CreateAccountRequest {
            name: name.into(),
            account_type: AccountType::Bank,
            icon: "🏦".into(),
            color: "#0066cc".into(),
            initial_balance: Some(initial_balance),
        },
    )
    .await
    .unwrap()
}

pub async fn first_category(pool: &SqlitePool) -> Uuid {
    let mut conn = pool.acquire().await.unwrap();
    store::categories::list(&mut conn).await.unwrap()[0].id
}

pub async fn balance_of(pool: &SqlitePool, account_id: Uuid) -> Decimal {
    let mut conn = pool.acquire().await.unwrap();
    expense_tracker_api::balance::account_balance(&mut conn, account_id, None)
        .await
        .unwrap()
}
