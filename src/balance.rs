//! Balance engine: derives account balances and receivable state from history.
//!
//! The pure functions here never touch the store. The async helpers at the bottom
//! load aggregates through [`crate::store::ledger`] and hand them to the pure
//! functions, so every caller computes balances the same way.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Account, AccountBalance, ReceivableStatus},
    store,
};

/// Per-account aggregates of the independent mutation streams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccountTotals {
    pub initial_balance: Decimal,
    pub income: Decimal,
    pub expense: Decimal,
    pub transfers_in: Decimal,
    pub transfers_out: Decimal,
    pub adjustments: Decimal,
}

impl AccountTotals {
    pub fn opening(initial_balance: Decimal) -> Self {
        Self {
            initial_balance,
            ..Self::default()
        }
    }

    pub fn apply(mut self, movement: Movement) -> AppResult<Self> {
        let (total, amount) = match movement {
            Movement::Income(amount) => (&mut self.income, amount),
            Movement::Expense(amount) => (&mut self.expense, amount),
            Movement::TransferIn(amount) => (&mut self.transfers_in, amount),
            Movement::TransferOut(amount) => (&mut self.transfers_out, amount),
            Movement::Adjustment(difference) => (&mut self.adjustments, difference),
        };
        *total = add(*total, amount)?;
        Ok(self)
    }
}

/// One entry of an account's history, seen from that account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Income(Decimal),
    Expense(Decimal),
    TransferIn(Decimal),
    TransferOut(Decimal),
    Adjustment(Decimal),
}

impl Movement {
    /// Effect of this movement on the account balance.
    pub fn signed_amount(self) -> Decimal {
        match self {
            Movement::Income(amount) | Movement::TransferIn(amount) => amount,
            Movement::Expense(amount) | Movement::TransferOut(amount) => -amount,
            Movement::Adjustment(difference) => difference,
        }
    }
}

fn add(left: Decimal, right: Decimal) -> AppResult<Decimal> {
    left.checked_add(right).ok_or_else(AppError::amount_overflow)
}

fn sub(left: Decimal, right: Decimal) -> AppResult<Decimal> {
    left.checked_sub(right).ok_or_else(AppError::amount_overflow)
}

/// Sum that reports overflow instead of panicking.
pub fn checked_sum<I>(values: I) -> AppResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().try_fold(Decimal::ZERO, add)
}

pub fn compute_account_balance(totals: &AccountTotals) -> AppResult<Decimal> {
    let inflow = checked_sum([
        totals.initial_balance,
        totals.income,
        totals.transfers_in,
        totals.adjustments,
    ])?;
    sub(sub(inflow, totals.expense)?, totals.transfers_out)
}

pub fn fold_movements<I>(initial_balance: Decimal, movements: I) -> AppResult<AccountTotals>
where
    I: IntoIterator<Item = Movement>,
{
    movements
        .into_iter()
        .try_fold(AccountTotals::opening(initial_balance), AccountTotals::apply)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceivableState {
    pub remaining: Decimal,
    pub status: ReceivableStatus,
}

impl ReceivableStatus {
    /// Status for a receivable with `remaining` left of `total_amount`.
    /// Zero wins over everything else, then any reduction counts as a partial payment.
    pub fn derive(total_amount: Decimal, remaining: Decimal) -> Self {
        if remaining.is_zero() {
            ReceivableStatus::Paid
        } else if remaining < total_amount {
            ReceivableStatus::PartiallyPaid
        } else {
            ReceivableStatus::Active
        }
    }
}

pub fn compute_receivable_state<I>(
    total_amount: Decimal,
    payments: I,
) -> AppResult<ReceivableState>
where
    I: IntoIterator<Item = Decimal>,
{
    let remaining = sub(total_amount, checked_sum(payments)?)?;
    Ok(ReceivableState {
        remaining,
        status: ReceivableStatus::derive(total_amount, remaining),
    })
}

/// Income and expense totals over some window, across all accounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodTotals {
    pub income: Decimal,
    pub expense: Decimal,
}

impl PeriodTotals {
    pub fn net(&self) -> AppResult<Decimal> {
        sub(self.income, self.expense)
    }
}

/// Legacy single-balance view: the latest global initial balance plus everything
/// that happened before the period.
pub fn opening_balance(
    initial_balance: Decimal,
    before_period: PeriodTotals,
) -> AppResult<Decimal> {
    add(initial_balance, before_period.net()?)
}

pub fn cumulative_balance(
    initial_balance: Decimal,
    before_period: PeriodTotals,
    period: PeriodTotals,
) -> AppResult<Decimal> {
    add(opening_balance(initial_balance, before_period)?, period.net()?)
}

/// Balance of `account_id`, optionally restricted to history dated on or before `as_of`.
pub async fn account_balance(
    conn: &mut SqliteConnection,
    account_id: Uuid,
    as_of: Option<NaiveDate>,
) -> AppResult<Decimal> {
    let account = store::accounts::find(conn, account_id)
        .await?
        .ok_or_else(|| AppError::not_found("Account"))?;
    account_balance_for(conn, &account, as_of).await
}

pub async fn account_balance_for(
    conn: &mut SqliteConnection,
    account: &Account,
    as_of: Option<NaiveDate>,
) -> AppResult<Decimal> {
    let totals = store::ledger::account_totals(conn, account, as_of).await?;
    compute_account_balance(&totals)
}

/// Balances of every account, each computed on its own.
pub async fn all_account_balances(
    conn: &mut SqliteConnection,
    as_of: Option<NaiveDate>,
) -> AppResult<Vec<AccountBalance>> {
    let accounts = store::accounts::list(conn).await?;
    let mut balances = Vec::with_capacity(accounts.len());
    for account in accounts {
        let balance = account_balance_for(conn, &account, as_of).await?;
        balances.push(AccountBalance {
            account_id: account.id,
            name: account.name,
            account_type: account.account_type,
            balance,
        });
    }
    Ok(balances)
}

pub fn total_balance(balances: &[AccountBalance]) -> AppResult<Decimal> {
    checked_sum(balances.iter().map(|entry| entry.balance))
}
