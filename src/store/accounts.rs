use sqlx::{sqlite::SqliteRow, FromRow, Row, SqliteConnection};
use uuid::Uuid;

use crate::{db, error::AppResult, models::Account};

impl<'r> FromRow<'r, SqliteRow> for Account {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            account_type: db::parsed(row, "account_type")?,
            icon: row.try_get("icon")?,
            color: row.try_get("color")?,
            initial_balance: db::decimal(row, "initial_balance")?,
            is_default: row.try_get("is_default")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// How many rows in each stream point at an account.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AccountReferences {
    pub incomes: i64,
    pub expenses: i64,
    pub transfers: i64,
    pub adjustments: i64,
    pub payments: i64,
}

impl AccountReferences {
    pub fn has_transactions(&self) -> bool {
        self.incomes > 0 || self.expenses > 0
    }

    pub fn is_referenced(&self) -> bool {
        self.has_transactions() || self.transfers > 0 || self.adjustments > 0 || self.payments > 0
    }
}

pub async fn list(conn: &mut SqliteConnection) -> AppResult<Vec<Account>> {
    let records = sqlx::query_as::<_, Account>(
        r#"
        SELECT id, name, account_type, icon, color, initial_balance, is_default, created_at
        FROM accounts
        ORDER BY is_default DESC, created_at ASC
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(records)
}

pub async fn find(conn: &mut SqliteConnection, id: Uuid) -> AppResult<Option<Account>> {
    let record = sqlx::query_as::<_, Account>(
        r#"
        SELECT id, name, account_type, icon, color, initial_balance, is_default, created_at
        FROM accounts
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(record)
}

pub async fn find_default(conn: &mut SqliteConnection) -> AppResult<Option<Account>> {
    let record = sqlx::query_as::<_, Account>(
        r#"
        SELECT id, name, account_type, icon, color, initial_balance, is_default, created_at
        FROM accounts
        WHERE is_default = 1
        "#,
    )
    .fetch_optional(&mut *conn)
    .await?;

    Ok(record)
}

pub async fn exists(conn: &mut SqliteConnection, id: Uuid) -> AppResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE id = ?")
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;

    Ok(count > 0)
}

pub async fn insert(conn: &mut SqliteConnection, account: &Account) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO accounts (
            id, name, account_type, icon, color, initial_balance, is_default, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(account.id)
    .bind(&account.name)
    .bind(account.account_type.as_str())
    .bind(&account.icon)
    .bind(&account.color)
    .bind(account.initial_balance.to_string())
    .bind(account.is_default)
    .bind(account.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub async fn update(conn: &mut SqliteConnection, account: &Account) -> AppResult<()> {
    sqlx::query(
        r#"
        UPDATE accounts
        SET name = ?,
            account_type = ?,
            icon = ?,
            color = ?,
            initial_balance = ?
        WHERE id = ?
        "#,
    )
    .bind(&account.name)
    .bind(account.account_type.as_str())
    .bind(&account.icon)
    .bind(&account.color)
    .bind(account.initial_balance.to_string())
    .bind(account.id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub async fn delete(conn: &mut SqliteConnection, id: Uuid) -> AppResult<u64> {
    let result = sqlx::query("DELETE FROM accounts WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

pub async fn references(conn: &mut SqliteConnection, id: Uuid) -> AppResult<AccountReferences> {
    let row = sqlx::query(
        r#"
        SELECT
            (SELECT COUNT(*) FROM incomes WHERE account_id = ?1) AS incomes,
            (SELECT COUNT(*) FROM expenses WHERE account_id = ?1) AS expenses,
            (SELECT COUNT(*) FROM transfers
                WHERE from_account_id = ?1 OR to_account_id = ?1) AS transfers,
            (SELECT COUNT(*) FROM adjustments WHERE account_id = ?1) AS adjustments,
            (SELECT COUNT(*) FROM receivable_payments WHERE account_id = ?1) AS payments
        "#,
    )
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(AccountReferences {
        incomes: row.try_get("incomes")?,
        expenses: row.try_get("expenses")?,
        transfers: row.try_get("transfers")?,
        adjustments: row.try_get("adjustments")?,
        payments: row.try_get("payments")?,
    })
}
