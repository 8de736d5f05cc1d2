use sqlx::{sqlite::SqliteRow, FromRow, Row, SqliteConnection};
use uuid::Uuid;

use crate::{db, error::AppResult, models::Transfer, store::DateRange};

impl<'r> FromRow<'r, SqliteRow> for Transfer {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            from_account_id: row.try_get("from_account_id")?,
            to_account_id: row.try_get("to_account_id")?,
            amount: db::decimal(row, "amount")?,
            date: row.try_get("date")?,
            note: row.try_get("note")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

pub async fn list(conn: &mut SqliteConnection, range: Option<DateRange>) -> AppResult<Vec<Transfer>> {
    let records = sqlx::query_as::<_, Transfer>(
        r#"
        SELECT id, from_account_id, to_account_id, amount, date, note, created_at
        FROM transfers
        WHERE (?1 IS NULL OR date >= ?1)
          AND (?2 IS NULL OR date <= ?2)
        ORDER BY date DESC, created_at DESC
        "#,
    )
    .bind(range.map(|range| range.start))
    .bind(range.map(|range| range.end))
    .fetch_all(&mut *conn)
    .await?;

    Ok(records)
}

pub async fn insert(conn: &mut SqliteConnection, transfer: &Transfer) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO transfers (
            id, from_account_id, to_account_id, amount, date, note, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(transfer.id)
    .bind(transfer.from_account_id)
    .bind(transfer.to_account_id)
    .bind(transfer.amount.to_string())
    .bind(transfer.date)
    .bind(&transfer.note)
    .bind(transfer.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub async fn delete(conn: &mut SqliteConnection, id: Uuid) -> AppResult<u64> {
    let result = sqlx::query("DELETE FROM transfers WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
