use sqlx::{sqlite::SqliteRow, FromRow, Row, SqliteConnection};

use crate::{db, error::AppResult, models::InitialBalance};

impl<'r> FromRow<'r, SqliteRow> for InitialBalance {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            amount: db::decimal(row, "amount")?,
            note: row.try_get("note")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// The authoritative baseline: the most recently created row. Older rows stay as history.
pub async fn latest(conn: &mut SqliteConnection) -> AppResult<Option<InitialBalance>> {
    let record = sqlx::query_as::<_, InitialBalance>(
        r#"
        SELECT id, amount, note, created_at
        FROM initial_balances
        ORDER BY created_at DESC, rowid DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(&mut *conn)
    .await?;

    Ok(record)
}

pub async fn history(conn: &mut SqliteConnection) -> AppResult<Vec<InitialBalance>> {
    let records = sqlx::query_as::<_, InitialBalance>(
        r#"
        SELECT id, amount, note, created_at
        FROM initial_balances
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(records)
}

pub async fn insert(conn: &mut SqliteConnection, balance: &InitialBalance) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO initial_balances (id, amount, note, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(balance.id)
    .bind(balance.amount.to_string())
    .bind(&balance.note)
    .bind(balance.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
