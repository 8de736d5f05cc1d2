use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use sqlx::SqlitePool;

use crate::{
    balance::{self, cumulative_balance, opening_balance},
    error::{AppError, AppResult},
    models::{CategoryStat, StatsResponse},
    store::{self, DateRange},
};

/// Month summary. Every figure is read from one snapshot.
pub async fn monthly_stats(
    pool: &SqlitePool,
    month: Option<u32>,
    year: Option<i32>,
) -> AppResult<StatsResponse> {
    let today = Utc::now().date_naive();
    let month = month.unwrap_or_else(|| today.month());
    let year = year.unwrap_or_else(|| today.year());
    let range = DateRange::month(year, month)
        .ok_or_else(|| AppError::Validation("Invalid month or year".into()))?;
    let year_to_date = range
        .year_to_date()
        .ok_or_else(|| AppError::Validation("Invalid month or year".into()))?;

    let mut transaction = pool.begin().await?;

    let period =
        store::ledger::period_totals(&mut transaction, Some(range.start), Some(range.end)).await?;
    let before = match range.start.pred_opt() {
        Some(day_before) => {
            store::ledger::period_totals(&mut transaction, None, Some(day_before)).await?
        }
        None => Default::default(),
    };
    let ytd = store::ledger::period_totals(
        &mut transaction,
        Some(year_to_date.start),
        Some(year_to_date.end),
    )
    .await?;

    let initial_balance = store::initial_balances::latest(&mut transaction)
        .await?
        .map(|record| record.amount)
        .unwrap_or(Decimal::ZERO);

    let mut spend = store::ledger::expenses_by_category(&mut transaction, range).await?;
    let budgets = store::budgets::list_for_month(&mut transaction, month as i32, year).await?;
    let categories = store::categories::list(&mut transaction).await?;

    let mut category_stats: Vec<CategoryStat> = categories
        .into_iter()
        .filter_map(|category| {
            let totals = spend.remove(&category.id)?;
            let budget = budgets
                .iter()
                .find(|budget| budget.category_id == category.id)
                .map(|budget| budget.amount);
            Some(CategoryStat {
                category_id: category.id,
                category: category.name,
                icon: category.icon,
                color: category.color,
                total: totals.total,
                count: totals.count,
                budget,
            })
        })
        .collect();
    category_stats.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });
    if !spend.is_empty() {
        tracing::warn!(orphans = spend.len(), "expenses reference unknown categories");
    }

    let account_balances = balance::all_account_balances(&mut transaction, Some(range.end)).await?;
    let total_balance = balance::total_balance(&account_balances)?;

    transaction.commit().await?;

    Ok(StatsResponse {
        month,
        year,
        total_income: period.income,
        total_expenses: period.expense,
        balance: period.net()?,
        category_stats,
        account_balances,
        total_balance,
        opening_balance: opening_balance(initial_balance, before)?,
        cumulative_balance: cumulative_balance(initial_balance, before, period)?,
        ytd_balance: ytd.net()?,
    })
}
