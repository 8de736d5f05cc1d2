use chrono::Utc;
use sqlx::{sqlite::SqliteRow, FromRow, Row, SqliteConnection};
use uuid::Uuid;

use crate::{db, error::AppResult, models::Budget};

impl<'r> FromRow<'r, SqliteRow> for Budget {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            category_id: row.try_get("category_id")?,
            amount: db::decimal(row, "amount")?,
            month: row.try_get("month")?,
            year: row.try_get("year")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

pub async fn list_for_month(
    conn: &mut SqliteConnection,
    month: i32,
    year: i32,
) -> AppResult<Vec<Budget>> {
    let records = sqlx::query_as::<_, Budget>(
        r#"
        SELECT id, category_id, amount, month, year, created_at
        FROM budgets
        WHERE month = ? AND year = ?
        ORDER BY created_at ASC
        "#,
    )
    .bind(month)
    .bind(year)
    .fetch_all(&mut *conn)
    .await?;

    Ok(records)
}

/// One budget per (category, month, year); a second write replaces the amount.
pub async fn upsert(
    conn: &mut SqliteConnection,
    category_id: Uuid,
    amount: rust_decimal::Decimal,
    month: i32,
    year: i32,
) -> AppResult<Budget> {
    sqlx::query(
        r#"
        INSERT INTO budgets (id, category_id, amount, month, year, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT (category_id, month, year) DO UPDATE SET amount = excluded.amount
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(category_id)
    .bind(amount.to_string())
    .bind(month)
    .bind(year)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;

    let record = sqlx::query_as::<_, Budget>(
        r#"
        SELECT id, category_id, amount, month, year, created_at
        FROM budgets
        WHERE category_id = ? AND month = ? AND year = ?
        "#,
    )
    .bind(category_id)
    .bind(month)
    .bind(year)
    .fetch_one(&mut *conn)
    .await?;

    Ok(record)
}

pub async fn delete(conn: &mut SqliteConnection, id: Uuid) -> AppResult<u64> {
    let result = sqlx::query("DELETE FROM budgets WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
