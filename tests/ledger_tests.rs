mod common;

use common::{
    balance_of, create_account, day, default_account, file_pool, first_category, test_pool,
};
use expense_tracker_api::{
    balance,
    error::AppError,
    models::{
        CreateExpenseRequest, CreateIncomeRequest, CreatePaymentRequest, CreateReceivableRequest,
        CreateTransferRequest, IncomeSource, Receivable, ReceivableStatus, ReconcileRequest,
        UpdateAccountRequest, UpdateReceivableRequest,
    },
    services::{accounts, entries, payments, receivables, reconciliation},
    store,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::SqlitePool;
use tempfile::TempDir;
use uuid::Uuid;

/// Payers racing for each receivable in the file-backed test.
const PAYERS: usize = 4;

async fn receivable(pool: &SqlitePool, total: Decimal) -> Receivable {
    receivables::create_receivable(
        pool,
        CreateReceivableRequest {
            debtor_name: "Budi".into(),
            total_amount: total,
            description: Some("Lunch money".into()),
            date: Some(day(2024, 3, 1)),
            due_date: None,
        },
    )
    .await
    .unwrap()
}

fn payment(receivable_id: Uuid, account_id: Uuid, amount: Decimal) -> CreatePaymentRequest {
    CreatePaymentRequest {
        receivable_id,
        amount,
        account_id,
        date: Some(day(2024, 3, 10)),
        note: None,
    }
}

async fn reload(pool: &SqlitePool, id: Uuid) -> Receivable {
    let mut conn = pool.acquire().await.unwrap();
    store::receivables::find(&mut conn, id).await.unwrap().unwrap()
}

async fn income(pool: &SqlitePool, account_id: Uuid, amount: Decimal, date: chrono::NaiveDate) {
    entries::create_income(
        pool,
        CreateIncomeRequest {
            title: "Salary".into(),
            amount,
            account_id,
            date: Some(date),
        },
    )
    .await
    .unwrap();
}

async fn expense(pool: &SqlitePool, account_id: Uuid, amount: Decimal, date: chrono::NaiveDate) {
    let category_id = first_category(pool).await;
    entries::create_expense(
        pool,
        CreateExpenseRequest {
            title: "Groceries".into(),
            amount,
            category_id,
            account_id: Some(account_id),
            date: Some(date),
            description: None,
        },
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn partial_then_full_payment_then_reversal() {
    let pool = test_pool().await;
    let cash = default_account(&pool).await;
    let receivable = receivable(&pool, dec!(100000)).await;

    payments::apply_payment(&pool, payment(receivable.id, cash.id, dec!(40000)))
        .await
        .unwrap();
    let after_first = reload(&pool, receivable.id).await;
    assert_eq!(after_first.remaining, dec!(60000));
    assert_eq!(after_first.status, ReceivableStatus::PartiallyPaid);

    let second = payments::apply_payment(&pool, payment(receivable.id, cash.id, dec!(60000)))
        .await
        .unwrap();
    let after_second = reload(&pool, receivable.id).await;
    assert_eq!(after_second.remaining, Decimal::ZERO);
    assert_eq!(after_second.status, ReceivableStatus::Paid);

    let reversal = payments::reverse_payment(&pool, second.id).await.unwrap();
    assert_eq!(reversal.receivable.remaining, dec!(60000));
    assert_eq!(reversal.receivable.status, ReceivableStatus::PartiallyPaid);
}

#[tokio::test]
async fn overpayment_is_rejected_without_side_effects() {
    let pool = test_pool().await;
    let cash = default_account(&pool).await;
    let receivable = receivable(&pool, dec!(100000)).await;
    payments::apply_payment(&pool, payment(receivable.id, cash.id, dec!(40000)))
        .await
        .unwrap();
    let balance_before = balance_of(&pool, cash.id).await;

    let error = payments::apply_payment(&pool, payment(receivable.id, cash.id, dec!(70000)))
        .await
        .unwrap_err();
    assert!(matches!(error, AppError::Validation(_)));
    assert_eq!(error.to_string(), "Payment amount exceeds remaining balance");

    let after = reload(&pool, receivable.id).await;
    assert_eq!(after.remaining, dec!(60000));
    assert_eq!(after.status, ReceivableStatus::PartiallyPaid);
    assert_eq!(balance_of(&pool, cash.id).await, balance_before);

    let mut conn = pool.acquire().await.unwrap();
    let recorded = store::receivables::list_payments(&mut conn, Some(receivable.id))
        .await
        .unwrap();
    assert_eq!(recorded.len(), 1);
}

#[tokio::test]
async fn exact_remaining_pays_off_and_a_cent_more_does_not() {
    let pool = test_pool().await;
    let cash = default_account(&pool).await;
    let receivable = receivable(&pool, dec!(60000)).await;

    let error = payments::apply_payment(&pool, payment(receivable.id, cash.id, dec!(60000.01)))
        .await
        .unwrap_err();
    assert!(matches!(error, AppError::Validation(_)));

    payments::apply_payment(&pool, payment(receivable.id, cash.id, dec!(60000)))
        .await
        .unwrap();
    let paid = reload(&pool, receivable.id).await;
    assert_eq!(paid.remaining, Decimal::ZERO);
    assert_eq!(paid.status, ReceivableStatus::Paid);
}

#[tokio::test]
async fn non_positive_payments_are_rejected() {
    let pool = test_pool().await;
    let cash = default_account(&pool).await;
    let receivable = receivable(&pool, dec!(1000)).await;

    for amount in [dec!(0), dec!(-5)] {
        let error = payments::apply_payment(&pool, payment(receivable.id, cash.id, amount))
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::Validation(_)));
    }
}

#[tokio::test]
async fn payment_against_missing_receivable_or_account_is_not_found() {
    let pool = test_pool().await;
    let cash = default_account(&pool).await;
    let receivable = receivable(&pool, dec!(1000)).await;

    let error = payments::apply_payment(&pool, payment(Uuid::new_v4(), cash.id, dec!(10)))
        .await
        .unwrap_err();
    assert_eq!(error.to_string(), "Receivable not found");

    let error = payments::apply_payment(&pool, payment(receivable.id, Uuid::new_v4(), dec!(10)))
        .await
        .unwrap_err();
    assert_eq!(error.to_string(), "Account not found");

    let error = payments::reverse_payment(&pool, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(error, AppError::NotFound(_)));
}

#[tokio::test]
async fn apply_then_reverse_restores_everything() {
    let pool = test_pool().await;
    let bank = create_account(&pool, "BCA", dec!(1000)).await;
    let receivable = receivable(&pool, dec!(500)).await;
    let balance_before = balance_of(&pool, bank.id).await;

    let applied = payments::apply_payment(&pool, payment(receivable.id, bank.id, dec!(200)))
        .await
        .unwrap();
    assert_eq!(balance_of(&pool, bank.id).await, balance_before + dec!(200));

    let mut conn = pool.acquire().await.unwrap();
    let mirrored = store::incomes::find_by_source_payment(&mut conn, applied.id)
        .await
        .unwrap()
        .unwrap();
    drop(conn);
    assert_eq!(mirrored.title, "Payment received - Budi");
    assert_eq!(mirrored.amount, dec!(200));
    assert_eq!(mirrored.account_id, bank.id);
    assert_eq!(mirrored.date, day(2024, 3, 10));
    assert_eq!(
        mirrored.source,
        IncomeSource::ReceivablePayment {
            payment_id: applied.id
        }
    );

    payments::reverse_payment(&pool, applied.id).await.unwrap();

    let restored = reload(&pool, receivable.id).await;
    assert_eq!(restored.remaining, dec!(500));
    assert_eq!(restored.status, ReceivableStatus::Active);
    assert_eq!(balance_of(&pool, bank.id).await, balance_before);

    let mut conn = pool.acquire().await.unwrap();
    let incomes = store::incomes::list(&mut conn, None, Some(bank.id)).await.unwrap();
    assert!(incomes.is_empty());
}

#[tokio::test]
async fn reversal_leaves_identical_manual_income_alone() {
    let pool = test_pool().await;
    let cash = default_account(&pool).await;
    let receivable = receivable(&pool, dec!(500)).await;

    // same title, amount, account and date as the mirrored row
    entries::create_income(
        &pool,
        CreateIncomeRequest {
            title: "Payment received - Budi".into(),
            amount: dec!(200),
            account_id: cash.id,
            date: Some(day(2024, 3, 10)),
        },
    )
    .await
    .unwrap();

    let applied = payments::apply_payment(&pool, payment(receivable.id, cash.id, dec!(200)))
        .await
        .unwrap();
    payments::reverse_payment(&pool, applied.id).await.unwrap();

    let mut conn = pool.acquire().await.unwrap();
    let incomes = store::incomes::list(&mut conn, None, Some(cash.id)).await.unwrap();
    assert_eq!(incomes.len(), 1);
    assert_eq!(incomes[0].source, IncomeSource::Manual);
}

#[tokio::test]
async fn mirrored_income_cannot_be_edited_or_deleted_directly() {
    let pool = test_pool().await;
    let cash = default_account(&pool).await;
    let receivable = receivable(&pool, dec!(500)).await;
    let applied = payments::apply_payment(&pool, payment(receivable.id, cash.id, dec!(100)))
        .await
        .unwrap();

    let mut conn = pool.acquire().await.unwrap();
    let mirrored = store::incomes::find_by_source_payment(&mut conn, applied.id)
        .await
        .unwrap()
        .unwrap();
    drop(conn);

    let error = entries::delete_income(&pool, mirrored.id).await.unwrap_err();
    assert!(matches!(error, AppError::Conflict(_)));
}

#[tokio::test]
async fn concurrent_payments_cannot_overdraw_a_receivable() {
    let pool = test_pool().await;
    let cash = default_account(&pool).await;
    let receivable = receivable(&pool, dec!(100000)).await;

    let (first, second) = tokio::join!(
        payments::apply_payment(&pool, payment(receivable.id, cash.id, dec!(60000))),
        payments::apply_payment(&pool, payment(receivable.id, cash.id, dec!(60000))),
    );

    let outcomes = [first.is_ok(), second.is_ok()];
    assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1);
    let failure = first.err().or(second.err()).unwrap();
    assert!(matches!(failure, AppError::Validation(_)));

    let after = reload(&pool, receivable.id).await;
    assert_eq!(after.remaining, dec!(40000));
    assert_eq!(after.status, ReceivableStatus::PartiallyPaid);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_payers_on_a_shared_database_file_settle_on_one_winner() {
    let dir = TempDir::new().unwrap();
    let pool = file_pool(dir.path()).await;
    let cash = default_account(&pool).await;

    for _ in 0..5 {
        let receivable = receivable(&pool, dec!(100)).await;

        let handles: Vec<_> = (0..PAYERS)
            .map(|_| {
                let pool = pool.clone();
                let request = payment(receivable.id, cash.id, dec!(60));
                tokio::spawn(async move { payments::apply_payment(&pool, request).await })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(AppError::Validation(message)) => {
                    assert_eq!(message, "Payment amount exceeds remaining balance")
                }
                Err(other) => panic!("unexpected failure: {other}"),
            }
        }
        assert_eq!(successes, 1);

        let after = reload(&pool, receivable.id).await;
        assert_eq!(after.remaining, dec!(40));
        assert_eq!(after.status, ReceivableStatus::PartiallyPaid);
        assert_eq!(after.version, receivable.version + 1);

        let mut conn = pool.acquire().await.unwrap();
        let recorded = store::receivables::payment_amounts(&mut conn, receivable.id)
            .await
            .unwrap();
        assert_eq!(recorded, vec![dec!(60)]);
    }

    assert_eq!(balance_of(&pool, cash.id).await, dec!(300));
}

#[tokio::test]
async fn oversized_amounts_are_rejected_before_they_reach_the_ledger() {
    let pool = test_pool().await;
    let cash = default_account(&pool).await;

    for _ in 0..2 {
        let error = entries::create_income(
            &pool,
            CreateIncomeRequest {
                title: "Windfall".into(),
                amount: Decimal::MAX,
                account_id: cash.id,
                date: Some(day(2024, 3, 1)),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(error.to_string(), "Amount is out of range");
    }

    let error = reconciliation::reconcile(
        &pool,
        ReconcileRequest {
            account_id: cash.id,
            actual_balance: Decimal::MIN,
            note: None,
            date: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(error, AppError::Validation(_)));

    income(&pool, cash.id, dec!(1000000000000000), day(2024, 3, 1)).await;
    assert_eq!(balance_of(&pool, cash.id).await, dec!(1000000000000000));
}

#[tokio::test]
async fn writes_from_a_stale_read_are_rejected() {
    let pool = test_pool().await;
    let receivable = receivable(&pool, dec!(500)).await;
    let stale = reload(&pool, receivable.id).await;

    let mut conn = pool.acquire().await.unwrap();
    let state = balance::compute_receivable_state(dec!(500), [dec!(100)]).unwrap();
    let updated = store::receivables::update_state(&mut conn, &receivable, state)
        .await
        .unwrap();
    assert_eq!(updated.version, receivable.version + 1);

    let error = store::receivables::update_state(&mut conn, &stale, state)
        .await
        .unwrap_err();
    assert!(matches!(error, AppError::StaleWrite(_)));
    assert!(error.is_transient());
}

#[tokio::test]
async fn receivable_with_payments_cannot_be_deleted() {
    let pool = test_pool().await;
    let cash = default_account(&pool).await;
    let receivable = receivable(&pool, dec!(500)).await;
    let applied = payments::apply_payment(&pool, payment(receivable.id, cash.id, dec!(100)))
        .await
        .unwrap();

    let error = receivables::delete_receivable(&pool, receivable.id)
        .await
        .unwrap_err();
    assert!(matches!(error, AppError::Conflict(_)));

    payments::reverse_payment(&pool, applied.id).await.unwrap();
    receivables::delete_receivable(&pool, receivable.id).await.unwrap();

    let error = receivables::delete_receivable(&pool, receivable.id)
        .await
        .unwrap_err();
    assert!(matches!(error, AppError::NotFound(_)));
}

#[tokio::test]
async fn receivable_total_cannot_drop_below_paid_amount() {
    let pool = test_pool().await;
    let cash = default_account(&pool).await;
    let receivable = receivable(&pool, dec!(1000)).await;
    payments::apply_payment(&pool, payment(receivable.id, cash.id, dec!(400)))
        .await
        .unwrap();

    let update = |total: Decimal| UpdateReceivableRequest {
        id: receivable.id,
        debtor_name: "Budi".into(),
        total_amount: total,
        description: None,
        date: None,
        due_date: None,
    };

    let error = receivables::update_receivable(&pool, update(dec!(300)))
        .await
        .unwrap_err();
    assert_eq!(
        error.to_string(),
        "Total amount cannot be less than already paid amount"
    );

    let shrunk = receivables::update_receivable(&pool, update(dec!(400)))
        .await
        .unwrap();
    assert_eq!(shrunk.remaining, Decimal::ZERO);
    assert_eq!(shrunk.status, ReceivableStatus::Paid);

    let grown = receivables::update_receivable(&pool, update(dec!(900)))
        .await
        .unwrap();
    assert_eq!(grown.remaining, dec!(500));
    assert_eq!(grown.status, ReceivableStatus::PartiallyPaid);
}

#[tokio::test]
async fn listed_receivables_carry_their_payments() {
    let pool = test_pool().await;
    let cash = default_account(&pool).await;
    let paid_off = receivable(&pool, dec!(100)).await;
    let untouched = receivable(&pool, dec!(300)).await;
    payments::apply_payment(&pool, payment(paid_off.id, cash.id, dec!(100)))
        .await
        .unwrap();

    let all = receivables::list_receivables(&pool, None).await.unwrap();
    assert_eq!(all.len(), 2);
    let with_payment = all
        .iter()
        .find(|entry| entry.receivable.id == paid_off.id)
        .unwrap();
    assert_eq!(with_payment.payments.len(), 1);

    let active = receivables::list_receivables(&pool, Some(ReceivableStatus::Active))
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].receivable.id, untouched.id);
    assert!(active[0].payments.is_empty());
}

#[tokio::test]
async fn account_balance_sums_every_stream() {
    let pool = test_pool().await;
    let bank = create_account(&pool, "BCA", dec!(500000)).await;
    let wallet = create_account(&pool, "GoPay", dec!(0)).await;

    income(&pool, bank.id, dec!(200000), day(2024, 1, 5)).await;
    expense(&pool, bank.id, dec!(50000), day(2024, 1, 6)).await;
    entries::create_transfer(
        &pool,
        CreateTransferRequest {
            from_account_id: bank.id,
            to_account_id: wallet.id,
            amount: dec!(30000),
            date: Some(day(2024, 1, 7)),
            note: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(balance_of(&pool, bank.id).await, dec!(620000));
    assert_eq!(balance_of(&pool, wallet.id).await, dec!(30000));

    let adjustment = reconciliation::reconcile(
        &pool,
        ReconcileRequest {
            account_id: bank.id,
            actual_balance: dec!(700000),
            note: Some("bank statement".into()),
            date: Some(day(2024, 1, 31)),
        },
    )
    .await
    .unwrap();
    assert_eq!(adjustment.recorded_balance, dec!(620000));
    assert_eq!(adjustment.difference, dec!(80000));
    assert_eq!(balance_of(&pool, bank.id).await, dec!(700000));
}

#[tokio::test]
async fn reconciling_twice_yields_a_zero_difference() {
    let pool = test_pool().await;
    let cash = default_account(&pool).await;
    income(&pool, cash.id, dec!(100), day(2024, 2, 1)).await;

    let request = || ReconcileRequest {
        account_id: cash.id,
        actual_balance: dec!(75.5),
        note: None,
        date: None,
    };
    let first = reconciliation::reconcile(&pool, request()).await.unwrap();
    let second = reconciliation::reconcile(&pool, request()).await.unwrap();

    assert_eq!(first.difference, dec!(-24.5));
    assert_eq!(second.difference, Decimal::ZERO);
    assert_eq!(second.recorded_balance, dec!(75.5));
}

#[tokio::test]
async fn reconciling_an_unknown_account_is_not_found() {
    let pool = test_pool().await;
    let error = reconciliation::reconcile(
        &pool,
        ReconcileRequest {
            account_id: Uuid::new_v4(),
            actual_balance: dec!(1),
            note: None,
            date: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(error, AppError::NotFound(_)));
}

#[tokio::test]
async fn deleting_an_adjustment_reports_the_new_balance() {
    let pool = test_pool().await;
    let bank = create_account(&pool, "BCA", dec!(1000)).await;
    let adjustment = reconciliation::reconcile(
        &pool,
        ReconcileRequest {
            account_id: bank.id,
            actual_balance: dec!(1250),
            note: None,
            date: None,
        },
    )
    .await
    .unwrap();

    let removal = reconciliation::delete_adjustment(&pool, adjustment.id)
        .await
        .unwrap();
    assert_eq!(removal.balance, dec!(1000));
    assert_eq!(removal.adjustment.id, adjustment.id);
    assert_eq!(balance_of(&pool, bank.id).await, dec!(1000));
}

#[tokio::test]
async fn as_of_excludes_later_history() {
    let pool = test_pool().await;
    let bank = create_account(&pool, "BCA", dec!(100)).await;
    income(&pool, bank.id, dec!(50), day(2024, 1, 10)).await;
    income(&pool, bank.id, dec!(70), day(2024, 2, 10)).await;
    expense(&pool, bank.id, dec!(20), day(2024, 1, 31)).await;

    let mut conn = pool.acquire().await.unwrap();
    let end_of_january = balance::account_balance(&mut conn, bank.id, Some(day(2024, 1, 31)))
        .await
        .unwrap();
    let before_anything = balance::account_balance(&mut conn, bank.id, Some(day(2023, 12, 31)))
        .await
        .unwrap();
    let all_time = balance::account_balance(&mut conn, bank.id, None).await.unwrap();

    assert_eq!(end_of_january, dec!(130));
    assert_eq!(before_anything, dec!(100));
    assert_eq!(all_time, dec!(200));
}

#[tokio::test]
async fn total_balance_is_the_sum_of_account_balances() {
    let pool = test_pool().await;
    let bank = create_account(&pool, "BCA", dec!(100)).await;
    let cash = default_account(&pool).await;
    income(&pool, cash.id, dec!(40), day(2024, 1, 1)).await;
    expense(&pool, bank.id, dec!(15), day(2024, 1, 2)).await;

    let mut conn = pool.acquire().await.unwrap();
    let balances = balance::all_account_balances(&mut conn, None).await.unwrap();
    assert_eq!(balances.len(), 2);
    assert_eq!(balances[0].account_id, cash.id);
    assert_eq!(balance::total_balance(&balances).unwrap(), dec!(125));
}

#[tokio::test]
async fn default_account_cannot_be_deleted() {
    let pool = test_pool().await;
    let cash = default_account(&pool).await;

    let error = accounts::delete_account(&pool, cash.id).await.unwrap_err();
    assert_eq!(error.to_string(), "Cannot delete default account");
}

#[tokio::test]
async fn account_with_transactions_cannot_be_deleted() {
    let pool = test_pool().await;
    let bank = create_account(&pool, "BCA", dec!(0)).await;
    let empty = create_account(&pool, "BRI", dec!(0)).await;
    income(&pool, bank.id, dec!(10), day(2024, 1, 1)).await;

    let error = accounts::delete_account(&pool, bank.id).await.unwrap_err();
    assert!(matches!(error, AppError::Conflict(_)));

    accounts::delete_account(&pool, empty.id).await.unwrap();
    let error = accounts::delete_account(&pool, empty.id).await.unwrap_err();
    assert!(matches!(error, AppError::NotFound(_)));
}

#[tokio::test]
async fn initial_balance_is_frozen_once_referenced() {
    let pool = test_pool().await;
    let bank = create_account(&pool, "BCA", dec!(100)).await;

    let update = |initial_balance| UpdateAccountRequest {
        id: bank.id,
        name: "BCA Main".into(),
        account_type: bank.account_type,
        icon: bank.icon.clone(),
        color: bank.color.clone(),
        initial_balance: Some(initial_balance),
    };

    let renamed = accounts::update_account(&pool, update(dec!(150))).await.unwrap();
    assert_eq!(renamed.initial_balance, dec!(150));
    assert_eq!(renamed.name, "BCA Main");

    income(&pool, bank.id, dec!(10), day(2024, 1, 1)).await;
    let error = accounts::update_account(&pool, update(dec!(200)))
        .await
        .unwrap_err();
    assert!(matches!(error, AppError::Conflict(_)));

    // display-only edits still go through
    let same_balance = accounts::update_account(&pool, update(dec!(150))).await.unwrap();
    assert_eq!(same_balance.initial_balance, dec!(150));
}

#[tokio::test]
async fn transfer_between_the_same_account_is_rejected() {
    let pool = test_pool().await;
    let cash = default_account(&pool).await;

    let error = entries::create_transfer(
        &pool,
        CreateTransferRequest {
            from_account_id: cash.id,
            to_account_id: cash.id,
            amount: dec!(10),
            date: None,
            note: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(error, AppError::Validation(_)));
}

#[tokio::test]
async fn expense_without_account_lands_on_the_default_account() {
    let pool = test_pool().await;
    let cash = default_account(&pool).await;
    let category_id = first_category(&pool).await;

    let expense = entries::create_expense(
        &pool,
        CreateExpenseRequest {
            title: "Coffee".into(),
            amount: dec!(3.5),
            category_id,
            account_id: None,
            date: None,
            description: Some("  ".into()),
        },
    )
    .await
    .unwrap();

    assert_eq!(expense.account_id, cash.id);
    assert_eq!(expense.description, None);
    assert_eq!(balance_of(&pool, cash.id).await, dec!(-3.5));
}

#[tokio::test]
async fn seeding_is_idempotent() {
    let pool = test_pool().await;
    let first = default_account(&pool).await;

    let again = accounts::ensure_default_account(&pool).await.unwrap();
    accounts::ensure_default_categories(&pool).await.unwrap();

    assert_eq!(again.id, first.id);
    let mut conn = pool.acquire().await.unwrap();
    assert_eq!(store::accounts::list(&mut conn).await.unwrap().len(), 1);
    assert_eq!(store::categories::count(&mut conn).await.unwrap(), 8);
}
