use sqlx::{sqlite::SqliteRow, FromRow, Row, SqliteConnection};
use uuid::Uuid;

use crate::{db, error::AppResult, models::Adjustment};

impl<'r> FromRow<'r, SqliteRow> for Adjustment {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            account_id: row.try_get("account_id")?,
            recorded_balance: db::decimal(row, "recorded_balance")?,
            actual_balance: db::decimal(row, "actual_balance")?,
            difference: db::decimal(row, "difference")?,
            note: row.try_get("note")?,
            date: row.try_get("date")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

pub async fn list(
    conn: &mut SqliteConnection,
    account_id: Option<Uuid>,
) -> AppResult<Vec<Adjustment>> {
    let records = sqlx::query_as::<_, Adjustment>(
        r#"
        SELECT id, account_id, recorded_balance, actual_balance, difference, note, date, created_at
        FROM adjustments
        WHERE (?1 IS NULL OR account_id = ?1)
        ORDER BY date DESC, created_at DESC
        "#,
    )
    .bind(account_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(records)
}

pub async fn find(conn: &mut SqliteConnection, id: Uuid) -> AppResult<Option<Adjustment>> {
    let record = sqlx::query_as::<_, Adjustment>(
        r#"
        SELECT id, account_id, recorded_balance, actual_balance, difference, note, date, created_at
        FROM adjustments
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(record)
}

pub async fn insert(conn: &mut SqliteConnection, adjustment: &Adjustment) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO adjustments (
            id, account_id, recorded_balance, actual_balance, difference, note, date, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(adjustment.id)
    .bind(adjustment.account_id)
    .bind(adjustment.recorded_balance.to_string())
    .bind(adjustment.actual_balance.to_string())
    .bind(adjustment.difference.to_string())
    .bind(&adjustment.note)
    .bind(adjustment.date)
    .bind(adjustment.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub async fn delete(conn: &mut SqliteConnection, id: Uuid) -> AppResult<u64> {
    let result = sqlx::query("DELETE FROM adjustments WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
