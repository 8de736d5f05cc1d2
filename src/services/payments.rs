//! Receivable payments. Applying or reversing a payment touches three rows (the
//! payment, its receivable and the mirrored income) and always does so inside a
//! single transaction. The receivable's `version` column catches concurrent
//! writers; a lost race is replayed from scratch by [`with_retry`].

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    balance::compute_receivable_state,
    db::with_retry,
    error::{AppError, AppResult},
    models::{
        CreatePaymentRequest, Income, IncomeSource, PaymentReversal, ReceivablePayment,
    },
    services::{optional_text, require_positive},
    store,
};

pub fn mirrored_income_title(debtor_name: &str) -> String {
    format!("Payment received - {debtor_name}")
}

pub async fn apply_payment(
    pool: &SqlitePool,
    request: CreatePaymentRequest,
) -> AppResult<ReceivablePayment> {
    require_positive(request.amount, "Payment amount")?;
    let request = &request;
    with_retry("apply_payment", move || apply_once(pool, request)).await
}

async fn apply_once(
    pool: &SqlitePool,
    request: &CreatePaymentRequest,
) -> AppResult<ReceivablePayment> {
    let mut transaction = pool.begin().await?;

    let receivable = store::receivables::find(&mut transaction, request.receivable_id)
        .await?
        .ok_or_else(|| AppError::not_found("Receivable"))?;
    if !store::accounts::exists(&mut transaction, request.account_id).await? {
        return Err(AppError::not_found("Account"));
    }

    // remaining is re-read from the ledger inside this transaction
    let paid = store::receivables::payment_amounts(&mut transaction, receivable.id).await?;
    let current = compute_receivable_state(receivable.total_amount, paid.iter().copied())?;
    if request.amount > current.remaining {
        return Err(AppError::Validation(
            "Payment amount exceeds remaining balance".into(),
        ));
    }

    let payment = ReceivablePayment {
        id: Uuid::new_v4(),
        receivable_id: receivable.id,
        amount: request.amount,
        account_id: request.account_id,
        date: request.date.unwrap_or_else(|| Utc::now().date_naive()),
        note: optional_text(request.note.clone()),
        created_at: Utc::now(),
    };
    store::receivables::insert_payment(&mut transaction, &payment).await?;

    let next = compute_receivable_state(
        receivable.total_amount,
        paid.iter().copied().chain(std::iter::once(payment.amount)),
    )?;
    let updated = store::receivables::update_state(&mut transaction, &receivable, next).await?;

    let income = Income {
        id: Uuid::new_v4(),
        title: mirrored_income_title(&receivable.debtor_name),
        amount: payment.amount,
        account_id: payment.account_id,
        date: payment.date,
        source: IncomeSource::ReceivablePayment {
            payment_id: payment.id,
        },
        created_at: payment.created_at,
    };
    store::incomes::insert(&mut transaction, &income).await?;

    transaction.commit().await?;

    tracing::info!(
        payment_id = %payment.id,
        receivable_id = %updated.id,
        income_id = %income.id,
        remaining = %updated.remaining,
        status = %updated.status,
        "applied receivable payment"
    );
    Ok(payment)
}

/// Deletes a payment together with its mirrored income and restores the
/// receivable's remaining balance and status.
pub async fn reverse_payment(pool: &SqlitePool, payment_id: Uuid) -> AppResult<PaymentReversal> {
    with_retry("reverse_payment", move || reverse_once(pool, payment_id)).await
}

async fn reverse_once(pool: &SqlitePool, payment_id: Uuid) -> AppResult<PaymentReversal> {
    let mut transaction = pool.begin().await?;

    let payment = store::receivables::find_payment(&mut transaction, payment_id)
        .await?
        .ok_or_else(|| AppError::not_found("Payment"))?;
    let receivable = store::receivables::find(&mut transaction, payment.receivable_id)
        .await?
        .ok_or_else(|| AppError::not_found("Receivable"))?;

    let mirrored = store::incomes::delete_by_source_payment(&mut transaction, payment.id).await?;
    if mirrored == 0 {
        tracing::warn!(payment_id = %payment.id, "payment had no mirrored income");
    }
    store::receivables::delete_payment(&mut transaction, payment.id).await?;

    let paid = store::receivables::payment_amounts(&mut transaction, receivable.id).await?;
    let next = compute_receivable_state(receivable.total_amount, paid)?;
    let updated = store::receivables::update_state(&mut transaction, &receivable, next).await?;

    transaction.commit().await?;

    tracing::info!(
        payment_id = %payment.id,
        receivable_id = %updated.id,
        remaining = %updated.remaining,
        status = %updated.status,
        "reversed receivable payment"
    );
    Ok(PaymentReversal {
        message: "Payment deleted".into(),
        receivable: updated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirrored_title_names_the_debtor() {
        assert_eq!(mirrored_income_title("Budi"), "Payment received - Budi");
    }
}
