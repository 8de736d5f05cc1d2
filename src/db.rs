use std::{future::Future, str::FromStr, time::Duration};

use rust_decimal::Decimal;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow},
    Row, SqlitePool,
};

use crate::error::{AppError, AppResult};

/// Attempts per unit of work, including the first one.
const MAX_ATTEMPTS: u32 = 4;

/// Initial retry delay in milliseconds (doubles each retry: 25, 50, 100ms)
const INITIAL_RETRY_DELAY_MS: u64 = 25;

pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    // every connection to an in-memory database gets its own empty database
    if database_url.contains(":memory:") {
        return SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(Option::<Duration>::None)
            .max_lifetime(Option::<Duration>::None)
            .connect_with(options)
            .await;
    }

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options.journal_mode(SqliteJournalMode::Wal))
        .await
}

pub async fn migrate(pool: &SqlitePool) -> AppResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Runs `operation` again when it fails with a transient store error, backing off
/// exponentially. The operation must be a complete unit of work: a failed attempt
/// has already rolled back its transaction by the time it is retried.
pub async fn with_retry<T, F, Fut>(label: &str, mut operation: F) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Err(error) if error.is_transient() && attempt + 1 < MAX_ATTEMPTS => {
                let delay = Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                tracing::warn!(
                    operation = label,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    %error,
                    "transient store failure, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            result => return result,
        }
    }
}

pub fn decimal(row: &SqliteRow, column: &str) -> Result<Decimal, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    parse_decimal(column, &raw)
}

pub fn parsed<T>(row: &SqliteRow, column: &str) -> Result<T, sqlx::Error>
where
    T: FromStr<Err = String>,
{
    let raw: String = row.try_get(column)?;
    raw.parse().map_err(|message: String| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: message.into(),
    })
}

/// Exact sum of decimal TEXT values. SQL `SUM` would go through binary floats.
pub fn sum_decimals<I>(column: &str, values: I) -> AppResult<Decimal>
where
    I: IntoIterator<Item = String>,
{
    values.into_iter().try_fold(Decimal::ZERO, |total, raw| {
        total
            .checked_add(parse_decimal(column, &raw)?)
            .ok_or_else(AppError::amount_overflow)
    })
}

pub fn parse_decimal(column: &str, raw: &str) -> Result<Decimal, sqlx::Error> {
    Decimal::from_str(raw).map_err(|source| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(source),
    })
}
