//! Balance adjustments: snapshot the computed balance, record the gap to what
//! the user actually holds, and let that gap flow into every later balance.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    balance,
    db::with_retry,
    error::{AppError, AppResult},
    models::{Adjustment, AdjustmentRemoval, ReconcileRequest},
    services::{optional_text, require_amount},
    store,
};

/// Records an adjustment that makes the account's all-time balance equal
/// `actual_balance`. The read and the insert share one transaction.
pub async fn reconcile(pool: &SqlitePool, request: ReconcileRequest) -> AppResult<Adjustment> {
    require_amount(request.actual_balance, "Actual balance")?;
    let request = &request;
    with_retry("reconcile", move || reconcile_once(pool, request)).await
}

async fn reconcile_once(pool: &SqlitePool, request: &ReconcileRequest) -> AppResult<Adjustment> {
    let mut transaction = pool.begin().await?;

    let recorded_balance =
        balance::account_balance(&mut transaction, request.account_id, None).await?;

    let adjustment = Adjustment {
        id: Uuid::new_v4(),
        account_id: request.account_id,
        recorded_balance,
        actual_balance: request.actual_balance,
        difference: request
            .actual_balance
            .checked_sub(recorded_balance)
            .ok_or_else(AppError::amount_overflow)?,
        note: optional_text(request.note.clone()),
        date: request.date.unwrap_or_else(|| Utc::now().date_naive()),
        created_at: Utc::now(),
    };
    store::adjustments::insert(&mut transaction, &adjustment).await?;
    transaction.commit().await?;

    tracing::info!(
        adjustment_id = %adjustment.id,
        account_id = %adjustment.account_id,
        recorded = %adjustment.recorded_balance,
        actual = %adjustment.actual_balance,
        difference = %adjustment.difference,
        "reconciled account"
    );
    Ok(adjustment)
}

/// Removes a past correction. This is not an undo of `reconcile`: every balance
/// computed after the adjustment's date shifts by its difference.
pub async fn delete_adjustment(pool: &SqlitePool, id: Uuid) -> AppResult<AdjustmentRemoval> {
    let mut transaction = pool.begin().await?;

    let adjustment = store::adjustments::find(&mut transaction, id)
        .await?
        .ok_or_else(|| AppError::not_found("Adjustment"))?;
    store::adjustments::delete(&mut transaction, id).await?;
    let balance = balance::account_balance(&mut transaction, adjustment.account_id, None).await?;
    transaction.commit().await?;

    tracing::warn!(
        adjustment_id = %id,
        account_id = %adjustment.account_id,
        difference = %adjustment.difference,
        "deleted historical adjustment"
    );
    Ok(AdjustmentRemoval {
        message: format!(
            "Adjustment removed; the account balance changed by {} and is now {}",
            -adjustment.difference, balance
        ),
        adjustment,
        balance,
    })
}
