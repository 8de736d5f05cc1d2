use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// A delete or update blocked by a referential rule.
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    /// Optimistic version check failed; the caller may retry.
    #[error("{0} was modified concurrently")]
    StaleWrite(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(entity: &str) -> Self {
        AppError::NotFound(format!("{entity} not found"))
    }

    /// A money total left the range `Decimal` can represent.
    pub fn amount_overflow() -> Self {
        AppError::Validation("Amount total is out of range".into())
    }

    /// Failures worth replaying the whole unit of work for: lock contention and lost
    /// optimistic updates. Everything else is surfaced immediately.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::StaleWrite(_) => true,
            AppError::Database(sqlx::Error::PoolTimedOut) => true,
            AppError::Database(sqlx::Error::Database(error)) => {
                let busy_code = error
                    .code()
                    .and_then(|code| code.parse::<i32>().ok())
                    // extended result codes keep the primary code in the low byte
                    .map(|code| matches!(code & 0xff, 5 | 6))
                    .unwrap_or(false);
                busy_code || error.message().to_lowercase().contains("database is locked")
            }
            _ => false,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::StaleWrite(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Migrate(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub fn internal_error<E: std::fmt::Display>(error: E) -> AppError {
    AppError::Internal(error.to_string())
}
