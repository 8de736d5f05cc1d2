use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Category, CreateCategoryRequest, MessageResponse, UpdateCategoryRequest},
    routes::{AppJson, IdParams},
    services::require_text,
    state::AppState,
    store,
};

fn duplicate_name(error: AppError) -> AppError {
    match error {
        AppError::Database(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            AppError::Validation("A category with this name already exists".into())
        }
        other => other,
    }
}

pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    let mut conn = state.pool.acquire().await?;
    let records = store::categories::list(&mut conn).await?;
    Ok(Json(records))
}

pub async fn create_category(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let category = Category {
        id: Uuid::new_v4(),
        name: require_text(&payload.name, "Name")?,
        icon: require_text(&payload.icon, "Icon")?,
        color: require_text(&payload.color, "Color")?,
        created_at: Utc::now(),
    };

    let mut conn = state.pool.acquire().await?;
    store::categories::insert(&mut conn, &category)
        .await
        .map_err(duplicate_name)?;

    tracing::info!(category_id = %category.id, "created category");
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateCategoryRequest>,
) -> AppResult<Json<Category>> {
    let name = require_text(&payload.name, "Name")?;
    let icon = require_text(&payload.icon, "Icon")?;
    let color = require_text(&payload.color, "Color")?;

    let mut conn = state.pool.acquire().await?;
    let category = store::categories::update(&mut conn, payload.id, &name, &icon, &color)
        .await
        .map_err(duplicate_name)?
        .ok_or_else(|| AppError::not_found("Category"))?;

    tracing::info!(category_id = %category.id, "updated category");
    Ok(Json(category))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> AppResult<Json<MessageResponse>> {
    let id = params.require()?;
    let mut transaction = state.pool.begin().await?;

    if !store::categories::exists(&mut transaction, id).await? {
        return Err(AppError::not_found("Category"));
    }
    let (expenses, budgets) = store::categories::references(&mut transaction, id).await?;
    if expenses > 0 || budgets > 0 {
        return Err(AppError::Conflict(
            "Cannot delete category with existing expenses or budgets".into(),
        ));
    }

    store::categories::delete(&mut transaction, id).await?;
    transaction.commit().await?;

    tracing::info!(category_id = %id, "deleted category");
    Ok(Json(MessageResponse::new("Category deleted")))
}
