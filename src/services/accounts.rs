use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Account, AccountType, Category, CreateAccountRequest, UpdateAccountRequest},
    services::{require_amount, require_text},
    store,
};

const DEFAULT_CATEGORIES: [(&str, &str, &str); 8] = [
    ("Food & Drinks", "🍔", "#FF6B6B"),
    ("Transportation", "🚗", "#4ECDC4"),
    ("Shopping", "🛍️", "#FFE66D"),
    ("Bills", "💳", "#A8E6CF"),
    ("Entertainment", "🎮", "#C7B8EA"),
    ("Health", "🏥", "#FF8B94"),
    ("Education", "📚", "#B4E7CE"),
    ("Other", "📦", "#95E1D3"),
];

/// Creates the "Cash" default account unless one already exists.
pub async fn ensure_default_account(pool: &SqlitePool) -> AppResult<Account> {
    let mut transaction = pool.begin().await?;

    if let Some(account) = store::accounts::find_default(&mut transaction).await? {
        return Ok(account);
    }

    let account = Account {
        id: Uuid::new_v4(),
        name: "Cash".into(),
        account_type: AccountType::Cash,
        icon: "💵".into(),
        color: "#10b981".into(),
        initial_balance: Decimal::ZERO,
        is_default: true,
        created_at: Utc::now(),
    };
    store::accounts::insert(&mut transaction, &account).await?;
    transaction.commit().await?;

    tracing::info!(account_id = %account.id, "created default account");
    Ok(account)
}

/// Seeds the starter category set into an empty category table.
pub async fn ensure_default_categories(pool: &SqlitePool) -> AppResult<()> {
    let mut transaction = pool.begin().await?;

    if store::categories::count(&mut transaction).await? > 0 {
        return Ok(());
    }

    for (name, icon, color) in DEFAULT_CATEGORIES {
        let category = Category {
            id: Uuid::new_v4(),
            name: name.into(),
            icon: icon.into(),
            color: color.into(),
            created_at: Utc::now(),
        };
        store::categories::insert(&mut transaction, &category).await?;
    }
    transaction.commit().await?;

    tracing::info!(count = DEFAULT_CATEGORIES.len(), "seeded default categories");
    Ok(())
}

pub async fn create_account(pool: &SqlitePool, payload: CreateAccountRequest) -> AppResult<Account> {
    let account = Account {
        id: Uuid::new_v4(),
        name: require_text(&payload.name, "Name")?,
        account_type: payload.account_type,
        icon: require_text(&payload.icon, "Icon")?,
        color: require_text(&payload.color, "Color")?,
        initial_balance: require_amount(
            payload.initial_balance.unwrap_or(Decimal::ZERO),
            "Initial balance",
        )?,
        is_default: false,
        created_at: Utc::now(),
    };

    let mut conn = pool.acquire().await?;
    store::accounts::insert(&mut conn, &account).await?;

    tracing::info!(account_id = %account.id, "created account");
    Ok(account)
}

/// Display fields are always editable. The opening balance is frozen once any
/// history points at the account, since it would silently rewrite past balances.
pub async fn update_account(pool: &SqlitePool, payload: UpdateAccountRequest) -> AppResult<Account> {
    let name = require_text(&payload.name, "Name")?;
    let icon = require_text(&payload.icon, "Icon")?;
    let color = require_text(&payload.color, "Color")?;

    let mut transaction = pool.begin().await?;

    let existing = store::accounts::find(&mut transaction, payload.id)
        .await?
        .ok_or_else(|| AppError::not_found("Account"))?;

    let initial_balance = match payload.initial_balance {
        Some(amount) if amount != existing.initial_balance => {
            require_amount(amount, "Initial balance")?;
            let references = store::accounts::references(&mut transaction, existing.id).await?;
            if references.is_referenced() {
                return Err(AppError::Conflict(
                    "Initial balance cannot be changed once the account has transactions".into(),
                ));
            }
            amount
        }
        _ => existing.initial_balance,
    };

    let account = Account {
        name,
        account_type: payload.account_type,
        icon,
        color,
        initial_balance,
        ..existing
    };
    store::accounts::update(&mut transaction, &account).await?;
    transaction.commit().await?;

    tracing::info!(account_id = %account.id, "updated account");
    Ok(account)
}

pub async fn delete_account(pool: &SqlitePool, id: Uuid) -> AppResult<()> {
    let mut transaction = pool.begin().await?;

    let account = store::accounts::find(&mut transaction, id)
        .await?
        .ok_or_else(|| AppError::not_found("Account"))?;

    if account.is_default {
        return Err(AppError::Conflict("Cannot delete default account".into()));
    }

    let references = store::accounts::references(&mut transaction, id).await?;
    if references.has_transactions() {
        return Err(AppError::Conflict(
            "Cannot delete account with existing transactions".into(),
        ));
    }
    if references.is_referenced() {
        return Err(AppError::Conflict(
            "Cannot delete account referenced by transfers, adjustments or payments".into(),
        ));
    }

    store::accounts::delete(&mut transaction, id).await?;
    transaction.commit().await?;

    tracing::info!(account_id = %id, "deleted account");
    Ok(())
}
