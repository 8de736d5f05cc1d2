use sqlx::{sqlite::SqliteRow, FromRow, Row, SqliteConnection};
use uuid::Uuid;

use crate::{error::AppResult, models::Category};

impl<'r> FromRow<'r, SqliteRow> for Category {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            icon: row.try_get("icon")?,
            color: row.try_get("color")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

pub async fn list(conn: &mut SqliteConnection) -> AppResult<Vec<Category>> {
    let records = sqlx::query_as::<_, Category>(
        r#"
        SELECT id, name, icon, color, created_at
        FROM categories
        ORDER BY name ASC
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(records)
}

pub async fn exists(conn: &mut SqliteConnection, id: Uuid) -> AppResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE id = ?")
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;

    Ok(count > 0)
}

pub async fn count(conn: &mut SqliteConnection) -> AppResult<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
        .fetch_one(&mut *conn)
        .await?;

    Ok(count)
}

pub async fn insert(conn: &mut SqliteConnection, category: &Category) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO categories (id, name, icon, color, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(category.id)
    .bind(&category.name)
    .bind(&category.icon)
    .bind(&category.color)
    .bind(category.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub async fn update(
    conn: &mut SqliteConnection,
    id: Uuid,
    name: &str,
    icon: &str,
    color: &str,
) -> AppResult<Option<Category>> {
    let result = sqlx::query(
        r#"
        UPDATE categories
        SET name = ?, icon = ?, color = ?
        WHERE id = ?
        "#,
    )
    .bind(name)
    .bind(icon)
    .bind(color)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    let record = sqlx::query_as::<_, Category>(
        "SELECT id, name, icon, color, created_at FROM categories WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(record)
}

/// Expenses and budgets pointing at the category, in that order.
pub async fn references(conn: &mut SqliteConnection, id: Uuid) -> AppResult<(i64, i64)> {
    let row = sqlx::query(
        r#"
        SELECT
            (SELECT COUNT(*) FROM expenses WHERE category_id = ?1) AS expenses,
            (SELECT COUNT(*) FROM budgets WHERE category_id = ?1) AS budgets
        "#,
    )
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;

    Ok((row.try_get("expenses")?, row.try_get("budgets")?))
}

pub async fn delete(conn: &mut SqliteConnection, id: Uuid) -> AppResult<u64> {
    let result = sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
