use sqlx::{sqlite::SqliteRow, FromRow, Row, SqliteConnection};
use uuid::Uuid;

use crate::{
    db,
    error::AppResult,
    models::{Income, IncomeSource},
    store::DateRange,
};

impl<'r> FromRow<'r, SqliteRow> for Income {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let source_payment_id: Option<Uuid> = row.try_get("source_payment_id")?;
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            amount: db::decimal(row, "amount")?,
            account_id: row.try_get("account_id")?,
            date: row.try_get("date")?,
            source: IncomeSource::from(source_payment_id),
            created_at: row.try_get("created_at")?,
        })
    }
}

pub async fn list(
    conn: &mut SqliteConnection,
    range: Option<DateRange>,
    account_id: Option<Uuid>,
) -> AppResult<Vec<Income>> {
    let records = sqlx::query_as::<_, Income>(
        r#"
        SELECT id, title, amount, account_id, date, source_payment_id, created_at
        FROM incomes
        WHERE (?1 IS NULL OR date >= ?1)
          AND (?2 IS NULL OR date <= ?2)
          AND (?3 IS NULL OR account_id = ?3)
        ORDER BY created_at DESC
        "#,
    )
    .bind(range.map(|range| range.start))
    .bind(range.map(|range| range.end))
    .bind(account_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(records)
}

pub async fn find(conn: &mut SqliteConnection, id: Uuid) -> AppResult<Option<Income>> {
    let record = sqlx::query_as::<_, Income>(
        r#"
        SELECT id, title, amount, account_id, date, source_payment_id, created_at
        FROM incomes
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(record)
}

pub async fn find_by_source_payment(
    conn: &mut SqliteConnection,
    payment_id: Uuid,
) -> AppResult<Option<Income>> {
    let record = sqlx::query_as::<_, Income>(
        r#"
        SELECT id, title, amount, account_id, date, source_payment_id, created_at
        FROM incomes
        WHERE source_payment_id = ?
        "#,
    )
    .bind(payment_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(record)
}

pub async fn insert(conn: &mut SqliteConnection, income: &Income) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO incomes (id, title, amount, account_id, date, source_payment_id, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(income.id)
    .bind(&income.title)
    .bind(income.amount.to_string())
    .bind(income.account_id)
    .bind(income.date)
    .bind(income.source.payment_id())
    .bind(income.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub async fn update(conn: &mut SqliteConnection, income: &Income) -> AppResult<()> {
    sqlx::query(
        r#"
        UPDATE incomes
        SET title = ?, amount = ?, account_id = ?, date = ?
        WHERE id = ?
        "#,
    )
    .bind(&income.title)
    .bind(income.amount.to_string())
    .bind(income.account_id)
    .bind(income.date)
    .bind(income.id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub async fn delete(conn: &mut SqliteConnection, id: Uuid) -> AppResult<u64> {
    let result = sqlx::query("DELETE FROM incomes WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

/// Removes the income mirrored from a receivable payment.
pub async fn delete_by_source_payment(
    conn: &mut SqliteConnection,
    payment_id: Uuid,
) -> AppResult<u64> {
    let result = sqlx::query("DELETE FROM incomes WHERE source_payment_id = ?")
        .bind(payment_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
