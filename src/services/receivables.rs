use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    balance::compute_receivable_state,
    db::with_retry,
    error::{AppError, AppResult},
    models::{
        CreateReceivableRequest, Receivable, ReceivablePayment, ReceivableStatus,
        ReceivableWithPayments, UpdateReceivableRequest,
    },
    services::{optional_text, require_positive, require_text},
    store,
};

pub async fn create_receivable(
    pool: &SqlitePool,
    payload: CreateReceivableRequest,
) -> AppResult<Receivable> {
    let total_amount = require_positive(payload.total_amount, "Total amount")?;
    let receivable = Receivable {
        id: Uuid::new_v4(),
        debtor_name: require_text(&payload.debtor_name, "Debtor name")?,
        total_amount,
        remaining: total_amount,
        description: optional_text(payload.description),
        date: payload.date.unwrap_or_else(|| Utc::now().date_naive()),
        due_date: payload.due_date,
        status: ReceivableStatus::Active,
        version: 0,
        created_at: Utc::now(),
    };

    let mut conn = pool.acquire().await?;
    store::receivables::insert(&mut conn, &receivable).await?;

    tracing::info!(
        receivable_id = %receivable.id,
        total = %receivable.total_amount,
        "created receivable"
    );
    Ok(receivable)
}

pub async fn update_receivable(
    pool: &SqlitePool,
    payload: UpdateReceivableRequest,
) -> AppResult<Receivable> {
    let debtor_name = require_text(&payload.debtor_name, "Debtor name")?;
    require_positive(payload.total_amount, "Total amount")?;
    let payload = &payload;
    let debtor_name = debtor_name.as_str();
    with_retry("update_receivable", move || update_once(pool, payload, debtor_name)).await
}

/// Rewrites the editable fields and re-derives remaining/status from the
/// payment ledger under the new total.
async fn update_once(
    pool: &SqlitePool,
    payload: &UpdateReceivableRequest,
    debtor_name: &str,
) -> AppResult<Receivable> {
    let mut transaction = pool.begin().await?;

    let existing = store::receivables::find(&mut transaction, payload.id)
        .await?
        .ok_or_else(|| AppError::not_found("Receivable"))?;

    let paid = store::receivables::payment_amounts(&mut transaction, existing.id).await?;
    let state = compute_receivable_state(payload.total_amount, paid)?;
    if state.remaining < Decimal::ZERO {
        return Err(AppError::Validation(
            "Total amount cannot be less than already paid amount".into(),
        ));
    }

    let next = Receivable {
        debtor_name: debtor_name.to_string(),
        total_amount: payload.total_amount,
        remaining: state.remaining,
        description: optional_text(payload.description.clone()),
        date: payload.date.unwrap_or(existing.date),
        due_date: payload.due_date,
        status: state.status,
        ..existing
    };
    let version = store::receivables::update(&mut transaction, &next).await?;
    transaction.commit().await?;

    tracing::info!(receivable_id = %next.id, status = %next.status, "updated receivable");
    Ok(Receivable { version, ..next })
}

pub async fn delete_receivable(pool: &SqlitePool, id: Uuid) -> AppResult<()> {
    let mut transaction = pool.begin().await?;

    if store::receivables::find(&mut transaction, id).await?.is_none() {
        return Err(AppError::not_found("Receivable"));
    }
    if store::receivables::payment_count(&mut transaction, id).await? > 0 {
        return Err(AppError::Conflict(
            "Cannot delete receivable with existing payments".into(),
        ));
    }

    store::receivables::delete(&mut transaction, id).await?;
    transaction.commit().await?;

    tracing::info!(receivable_id = %id, "deleted receivable");
    Ok(())
}

/// Receivables (optionally one status) with their payments, newest first.
pub async fn list_receivables(
    pool: &SqlitePool,
    status: Option<ReceivableStatus>,
) -> AppResult<Vec<ReceivableWithPayments>> {
    let mut conn = pool.acquire().await?;
    let receivables = store::receivables::list(&mut conn, status).await?;
    let payments = store::receivables::list_payments(&mut conn, None).await?;

    let mut by_receivable: HashMap<Uuid, Vec<ReceivablePayment>> = HashMap::new();
    for payment in payments {
        by_receivable
            .entry(payment.receivable_id)
            .or_default()
            .push(payment);
    }

    Ok(receivables
        .into_iter()
        .map(|receivable| {
            let payments = by_receivable.remove(&receivable.id).unwrap_or_default();
            ReceivableWithPayments {
                receivable,
                payments,
            }
        })
        .collect())
}
