//! Plain ledger entries: manual income, expenses and transfers.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        CreateExpenseRequest, CreateIncomeRequest, CreateTransferRequest, Expense, Income,
        IncomeSource, Transfer, UpdateExpenseRequest, UpdateIncomeRequest,
    },
    services::{optional_text, require_positive, require_text},
    store,
};

async fn ensure_account(conn: &mut SqliteConnection, id: Uuid) -> AppResult<()> {
    if store::accounts::exists(conn, id).await? {
        Ok(())
    } else {
        Err(AppError::not_found("Account"))
    }
}

async fn ensure_category(conn: &mut SqliteConnection, id: Uuid) -> AppResult<()> {
    if store::categories::exists(conn, id).await? {
        Ok(())
    } else {
        Err(AppError::not_found("Category"))
    }
}

/// Explicit account, or the default one when the caller leaves it out.
async fn resolve_account(conn: &mut SqliteConnection, id: Option<Uuid>) -> AppResult<Uuid> {
    match id {
        Some(id) => {
            ensure_account(conn, id).await?;
            Ok(id)
        }
        None => store::accounts::find_default(conn)
            .await?
            .map(|account| account.id)
            .ok_or_else(|| AppError::not_found("Default account")),
    }
}

fn reject_mirrored(income: &Income) -> AppResult<()> {
    match income.source {
        IncomeSource::Manual => Ok(()),
        IncomeSource::ReceivablePayment { .. } => Err(AppError::Conflict(
            "Income recorded from a receivable payment; delete the payment instead".into(),
        )),
    }
}

pub async fn create_income(pool: &SqlitePool, payload: CreateIncomeRequest) -> AppResult<Income> {
    let income = Income {
        id: Uuid::new_v4(),
        title: require_text(&payload.title, "Title")?,
        amount: require_positive(payload.amount, "Amount")?,
        account_id: payload.account_id,
        date: payload.date.unwrap_or_else(|| Utc::now().date_naive()),
        source: IncomeSource::Manual,
        created_at: Utc::now(),
    };

    let mut transaction = pool.begin().await?;
    ensure_account(&mut transaction, income.account_id).await?;
    store::incomes::insert(&mut transaction, &income).await?;
    transaction.commit().await?;

    tracing::info!(income_id = %income.id, account_id = %income.account_id, "created income");
    Ok(income)
}

pub async fn update_income(pool: &SqlitePool, payload: UpdateIncomeRequest) -> AppResult<Income> {
    let title = require_text(&payload.title, "Title")?;
    let amount = require_positive(payload.amount, "Amount")?;

    let mut transaction = pool.begin().await?;
    let existing = store::incomes::find(&mut transaction, payload.id)
        .await?
        .ok_or_else(|| AppError::not_found("Income"))?;
    reject_mirrored(&existing)?;
    ensure_account(&mut transaction, payload.account_id).await?;

    let income = Income {
        title,
        amount,
        account_id: payload.account_id,
        date: payload.date.unwrap_or(existing.date),
        ..existing
    };
    store::incomes::update(&mut transaction, &income).await?;
    transaction.commit().await?;

    tracing::info!(income_id = %income.id, "updated income");
    Ok(income)
}

pub async fn delete_income(pool: &SqlitePool, id: Uuid) -> AppResult<()> {
    let mut transaction = pool.begin().await?;
    let existing = store::incomes::find(&mut transaction, id)
        .await?
        .ok_or_else(|| AppError::not_found("Income"))?;
    reject_mirrored(&existing)?;

    store::incomes::delete(&mut transaction, id).await?;
    transaction.commit().await?;

    tracing::info!(income_id = %id, "deleted income");
    Ok(())
}

pub async fn create_expense(pool: &SqlitePool, payload: CreateExpenseRequest) -> AppResult<Expense> {
    let title = require_text(&payload.title, "Title")?;
    let amount = require_positive(payload.amount, "Amount")?;

    let mut transaction = pool.begin().await?;
    ensure_category(&mut transaction, payload.category_id).await?;
    let account_id = resolve_account(&mut transaction, payload.account_id).await?;

    let expense = Expense {
        id: Uuid::new_v4(),
        title,
        amount,
        category_id: payload.category_id,
        account_id,
        date: payload.date.unwrap_or_else(|| Utc::now().date_naive()),
        description: optional_text(payload.description),
        created_at: Utc::now(),
    };
    store::expenses::insert(&mut transaction, &expense).await?;
    transaction.commit().await?;

    tracing::info!(expense_id = %expense.id, account_id = %expense.account_id, "created expense");
    Ok(expense)
}

pub async fn update_expense(pool: &SqlitePool, payload: UpdateExpenseRequest) -> AppResult<Expense> {
    let title = require_text(&payload.title, "Title")?;
    let amount = require_positive(payload.amount, "Amount")?;

    let mut transaction = pool.begin().await?;
    let existing = store::expenses::find(&mut transaction, payload.id)
        .await?
        .ok_or_else(|| AppError::not_found("Expense"))?;
    ensure_category(&mut transaction, payload.category_id).await?;
    let account_id = match payload.account_id {
        Some(id) => {
            ensure_account(&mut transaction, id).await?;
            id
        }
        None => existing.account_id,
    };

    let expense = Expense {
        title,
        amount,
        category_id: payload.category_id,
        account_id,
        date: payload.date.unwrap_or(existing.date),
        description: optional_text(payload.description),
        ..existing
    };
    store::expenses::update(&mut transaction, &expense).await?;
    transaction.commit().await?;

    tracing::info!(expense_id = %expense.id, "updated expense");
    Ok(expense)
}

pub async fn delete_expense(pool: &SqlitePool, id: Uuid) -> AppResult<()> {
    let mut conn = pool.acquire().await?;
    if store::expenses::delete(&mut conn, id).await? == 0 {
        return Err(AppError::not_found("Expense"));
    }

    tracing::info!(expense_id = %id, "deleted expense");
    Ok(())
}

pub async fn create_transfer(
    pool: &SqlitePool,
    payload: CreateTransferRequest,
) -> AppResult<Transfer> {
    let amount = require_positive(payload.amount, "Amount")?;
    if payload.from_account_id == payload.to_account_id {
        return Err(AppError::Validation(
            "Cannot transfer to the same account".into(),
        ));
    }

    let mut transaction = pool.begin().await?;
    ensure_account(&mut transaction, payload.from_account_id).await?;
    ensure_account(&mut transaction, payload.to_account_id).await?;

    let transfer = Transfer {
        id: Uuid::new_v4(),
        from_account_id: payload.from_account_id,
        to_account_id: payload.to_account_id,
        amount,
        date: payload.date.unwrap_or_else(|| Utc::now().date_naive()),
        note: optional_text(payload.note),
        created_at: Utc::now(),
    };
    store::transfers::insert(&mut transaction, &transfer).await?;
    transaction.commit().await?;

    tracing::info!(
        transfer_id = %transfer.id,
        from_account_id = %transfer.from_account_id,
        to_account_id = %transfer.to_account_id,
        "created transfer"
    );
    Ok(transfer)
}

pub async fn delete_transfer(pool: &SqlitePool, id: Uuid) -> AppResult<()> {
    let mut conn = pool.acquire().await?;
    if store::transfers::delete(&mut conn, id).await? == 0 {
        return Err(AppError::not_found("Transfer"));
    }

    tracing::info!(transfer_id = %id, "deleted transfer");
    Ok(())
}
