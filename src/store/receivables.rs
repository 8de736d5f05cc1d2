use rust_decimal::Decimal;
use sqlx::{sqlite::SqliteRow, FromRow, Row, SqliteConnection};
use uuid::Uuid;

use crate::{
    balance::ReceivableState,
    db,
    error::{AppError, AppResult},
    models::{Receivable, ReceivablePayment, ReceivableStatus},
};

impl<'r> FromRow<'r, SqliteRow> for Receivable {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            debtor_name: row.try_get("debtor_name")?,
            total_amount: db::decimal(row, "total_amount")?,
            remaining: db::decimal(row, "remaining")?,
            description: row.try_get("description")?,
            date: row.try_get("date")?,
            due_date: row.try_get("due_date")?,
            status: db::parsed(row, "status")?,
            version: row.try_get("version")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl<'r> FromRow<'r, SqliteRow> for ReceivablePayment {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            receivable_id: row.try_get("receivable_id")?,
            amount: db::decimal(row, "amount")?,
            account_id: row.try_get("account_id")?,
            date: row.try_get("date")?,
            note: row.try_get("note")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

pub async fn list(
    conn: &mut SqliteConnection,
    status: Option<ReceivableStatus>,
) -> AppResult<Vec<Receivable>> {
    let records = sqlx::query_as::<_, Receivable>(
        r#"
        SELECT id, debtor_name, total_amount, remaining, description, date, due_date,
               status, version, created_at
        FROM receivables
        WHERE (?1 IS NULL OR status = ?1)
        ORDER BY created_at DESC
        "#,
    )
    .bind(status.map(ReceivableStatus::as_str))
    .fetch_all(&mut *conn)
    .await?;

    Ok(records)
}

pub async fn find(conn: &mut SqliteConnection, id: Uuid) -> AppResult<Option<Receivable>> {
    let record = sqlx::query_as::<_, Receivable>(
        r#"
        SELECT id, debtor_name, total_amount, remaining, description, date, due_date,
               status, version, created_at
        FROM receivables
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(record)
}

pub async fn insert(conn: &mut SqliteConnection, receivable: &Receivable) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO receivables (
            id, debtor_name, total_amount, remaining, description, date, due_date,
            status, version, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(receivable.id)
    .bind(&receivable.debtor_name)
    .bind(receivable.total_amount.to_string())
    .bind(receivable.remaining.to_string())
    .bind(&receivable.description)
    .bind(receivable.date)
    .bind(receivable.due_date)
    .bind(receivable.status.as_str())
    .bind(receivable.version)
    .bind(receivable.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Writes every mutable column, guarded by the version the caller read.
/// Fails with `StaleWrite` when someone else updated the row in between.
pub async fn update(conn: &mut SqliteConnection, receivable: &Receivable) -> AppResult<i64> {
    let result = sqlx::query(
        r#"
        UPDATE receivables
        SET debtor_name = ?,
            total_amount = ?,
            remaining = ?,
            description = ?,
            date = ?,
            due_date = ?,
            status = ?,
            version = version + 1
        WHERE id = ? AND version = ?
        "#,
    )
    .bind(&receivable.debtor_name)
    .bind(receivable.total_amount.to_string())
    .bind(receivable.remaining.to_string())
    .bind(&receivable.description)
    .bind(receivable.date)
    .bind(receivable.due_date)
    .bind(receivable.status.as_str())
    .bind(receivable.id)
    .bind(receivable.version)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::StaleWrite("Receivable".into()));
    }

    Ok(receivable.version + 1)
}

/// Version-guarded write of the derived `remaining`/`status` pair.
pub async fn update_state(
    conn: &mut SqliteConnection,
    receivable: &Receivable,
    state: ReceivableState,
) -> AppResult<Receivable> {
    let next = Receivable {
        remaining: state.remaining,
        status: state.status,
        ..receivable.clone()
    };
    let version = update(conn, &next).await?;
    Ok(Receivable { version, ..next })
}

pub async fn delete(conn: &mut SqliteConnection, id: Uuid) -> AppResult<u64> {
    let result = sqlx::query("DELETE FROM receivables WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

pub async fn list_payments(
    conn: &mut SqliteConnection,
    receivable_id: Option<Uuid>,
) -> AppResult<Vec<ReceivablePayment>> {
    let records = sqlx::query_as::<_, ReceivablePayment>(
        r#"
        SELECT id, receivable_id, amount, account_id, date, note, created_at
        FROM receivable_payments
        WHERE (?1 IS NULL OR receivable_id = ?1)
        ORDER BY created_at DESC
        "#,
    )
    .bind(receivable_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(records)
}

pub async fn find_payment(
    conn: &mut SqliteConnection,
    id: Uuid,
) -> AppResult<Option<ReceivablePayment>> {
    let record = sqlx::query_as::<_, ReceivablePayment>(
        r#"
        SELECT id, receivable_id, amount, account_id, date, note, created_at
        FROM receivable_payments
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(record)
}

/// Amounts of every payment recorded against `receivable_id`.
pub async fn payment_amounts(
    conn: &mut SqliteConnection,
    receivable_id: Uuid,
) -> AppResult<Vec<Decimal>> {
    let rows: Vec<String> =
        sqlx::query_scalar("SELECT amount FROM receivable_payments WHERE receivable_id = ?")
            .bind(receivable_id)
            .fetch_all(&mut *conn)
            .await?;

    rows.iter()
        .map(|raw| db::parse_decimal("amount", raw).map_err(AppError::from))
        .collect()
}

pub async fn payment_count(conn: &mut SqliteConnection, receivable_id: Uuid) -> AppResult<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM receivable_payments WHERE receivable_id = ?")
        .bind(receivable_id)
        .fetch_one(&mut *conn)
        .await?;

    Ok(count)
}

pub async fn insert_payment(
    conn: &mut SqliteConnection,
    payment: &ReceivablePayment,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO receivable_payments (
            id, receivable_id, amount, account_id, date, note, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(payment.id)
    .bind(payment.receivable_id)
    .bind(payment.amount.to_string())
    .bind(payment.account_id)
    .bind(payment.date)
    .bind(&payment.note)
    .bind(payment.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub async fn delete_payment(conn: &mut SqliteConnection, id: Uuid) -> AppResult<u64> {
    let result = sqlx::query("DELETE FROM receivable_payments WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
