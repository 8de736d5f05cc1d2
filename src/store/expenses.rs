use sqlx::{sqlite::SqliteRow, FromRow, Row, SqliteConnection};
use uuid::Uuid;

use crate::{db, error::AppResult, models::Expense, store::DateRange};

impl<'r> FromRow<'r, SqliteRow> for Expense {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            amount: db::decimal(row, "amount")?,
            category_id: row.try_get("category_id")?,
            account_id: row.try_get("account_id")?,
            date: row.try_get("date")?,
            description: row.try_get("description")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ExpenseFilter {
    pub range: Option<DateRange>,
    pub category_id: Option<Uuid>,
    pub account_id: Option<Uuid>,
}

pub async fn list(conn: &mut SqliteConnection, filter: ExpenseFilter) -> AppResult<Vec<Expense>> {
    let records = sqlx::query_as::<_, Expense>(
        r#"
        SELECT id, title, amount, category_id, account_id, date, description, created_at
        FROM expenses
        WHERE (?1 IS NULL OR date >= ?1)
          AND (?2 IS NULL OR date <= ?2)
          AND (?3 IS NULL OR category_id = ?3)
          AND (?4 IS NULL OR account_id = ?4)
        ORDER BY date DESC, created_at DESC
        "#,
    )
    .bind(filter.range.map(|range| range.start))
    .bind(filter.range.map(|range| range.end))
    .bind(filter.category_id)
    .bind(filter.account_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(records)
}

pub async fn find(conn: &mut SqliteConnection, id: Uuid) -> AppResult<Option<Expense>> {
    let record = sqlx::query_as::<_, Expense>(
        r#"
        SELECT id, title, amount, category_id, account_id, date, description, created_at
        FROM expenses
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(record)
}

pub async fn insert(conn: &mut SqliteConnection, expense: &Expense) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO expenses (
            id, title, amount, category_id, account_id, date, description, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(expense.id)
    .bind(&expense.title)
    .bind(expense.amount.to_string())
    .bind(expense.category_id)
    .bind(expense.account_id)
    .bind(expense.date)
    .bind(&expense.description)
    .bind(expense.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub async fn update(conn: &mut SqliteConnection, expense: &Expense) -> AppResult<()> {
    sqlx::query(
        r#"
        UPDATE expenses
        SET title = ?, amount = ?, category_id = ?, account_id = ?, date = ?, description = ?
        WHERE id = ?
        "#,
    )
    .bind(&expense.title)
    .bind(expense.amount.to_string())
    .bind(expense.category_id)
    .bind(expense.account_id)
    .bind(expense.date)
    .bind(&expense.description)
    .bind(expense.id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub async fn delete(conn: &mut SqliteConnection, id: Uuid) -> AppResult<u64> {
    let result = sqlx::query("DELETE FROM expenses WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
