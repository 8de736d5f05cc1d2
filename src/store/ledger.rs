//! Aggregate reads over the mutation streams. Amounts come back as TEXT and are
//! summed in Rust so the totals stay exact.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

use crate::{
    balance::{AccountTotals, PeriodTotals},
    db,
    error::{AppError, AppResult},
    models::Account,
    store::DateRange,
};

const INCOME_AMOUNTS: &str = r#"
    SELECT amount FROM incomes
    WHERE account_id = ?1 AND (?2 IS NULL OR date <= ?2)
"#;

const EXPENSE_AMOUNTS: &str = r#"
    SELECT amount FROM expenses
    WHERE account_id = ?1 AND (?2 IS NULL OR date <= ?2)
"#;

const TRANSFER_IN_AMOUNTS: &str = r#"
    SELECT amount FROM transfers
    WHERE to_account_id = ?1 AND (?2 IS NULL OR date <= ?2)
"#;

const TRANSFER_OUT_AMOUNTS: &str = r#"
    SELECT amount FROM transfers
    WHERE from_account_id = ?1 AND (?2 IS NULL OR date <= ?2)
"#;

const ADJUSTMENT_DIFFERENCES: &str = r#"
    SELECT difference FROM adjustments
    WHERE account_id = ?1 AND (?2 IS NULL OR date <= ?2)
"#;

async fn account_sum(
    conn: &mut SqliteConnection,
    sql: &'static str,
    column: &str,
    account_id: Uuid,
    as_of: Option<NaiveDate>,
) -> AppResult<Decimal> {
    let values: Vec<String> = sqlx::query_scalar(sql)
        .bind(account_id)
        .bind(as_of)
        .fetch_all(&mut *conn)
        .await?;

    db::sum_decimals(column, values)
}

/// Every stream that moves `account`, restricted to rows dated on or before `as_of`.
pub async fn account_totals(
    conn: &mut SqliteConnection,
    account: &Account,
    as_of: Option<NaiveDate>,
) -> AppResult<AccountTotals> {
    let id = account.id;
    Ok(AccountTotals {
        initial_balance: account.initial_balance,
        income: account_sum(conn, INCOME_AMOUNTS, "amount", id, as_of).await?,
        expense: account_sum(conn, EXPENSE_AMOUNTS, "amount", id, as_of).await?,
        transfers_in: account_sum(conn, TRANSFER_IN_AMOUNTS, "amount", id, as_of).await?,
        transfers_out: account_sum(conn, TRANSFER_OUT_AMOUNTS, "amount", id, as_of).await?,
        adjustments: account_sum(conn, ADJUSTMENT_DIFFERENCES, "difference", id, as_of).await?,
    })
}

/// Income and expense across all accounts with `from <= date <= to`; open bounds
/// are unrestricted.
pub async fn period_totals(
    conn: &mut SqliteConnection,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> AppResult<PeriodTotals> {
    let incomes: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT amount FROM incomes
        WHERE (?1 IS NULL OR date >= ?1) AND (?2 IS NULL OR date <= ?2)
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(&mut *conn)
    .await?;

    let expenses: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT amount FROM expenses
        WHERE (?1 IS NULL OR date >= ?1) AND (?2 IS NULL OR date <= ?2)
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(&mut *conn)
    .await?;

    Ok(PeriodTotals {
        income: db::sum_decimals("amount", incomes)?,
        expense: db::sum_decimals("amount", expenses)?,
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategorySpend {
    pub total: Decimal,
    pub count: i64,
}

/// Expense total and row count per category inside `range`.
pub async fn expenses_by_category(
    conn: &mut SqliteConnection,
    range: DateRange,
) -> AppResult<HashMap<Uuid, CategorySpend>> {
    let rows = sqlx::query(
        r#"
        SELECT category_id, amount FROM expenses
        WHERE date >= ? AND date <= ?
        "#,
    )
    .bind(range.start)
    .bind(range.end)
    .fetch_all(&mut *conn)
    .await?;

    let mut spend: HashMap<Uuid, CategorySpend> = HashMap::new();
    for row in rows {
        let category_id: Uuid = row.try_get("category_id")?;
        let amount = db::decimal(&row, "amount")?;
        let entry = spend.entry(category_id).or_default();
        entry.total = entry
            .total
            .checked_add(amount)
            .ok_or_else(AppError::amount_overflow)?;
        entry.count += 1;
    }

    Ok(spend)
}
