pub mod accounts;
pub mod adjustments;
pub mod balance;
pub mod budgets;
pub mod categories;
pub mod expenses;
pub mod income;
pub mod receivables;
pub mod stats;
pub mod transfers;

use axum::extract::{rejection::JsonRejection, FromRequest};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    store::DateRange,
};

/// `axum::Json` whose rejections use the API's error body and status.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

#[derive(Deserialize)]
pub struct IdParams {
    pub id: Option<Uuid>,
}

impl IdParams {
    pub fn require(&self) -> AppResult<Uuid> {
        self.id
            .ok_or_else(|| AppError::Validation("ID is required".into()))
    }
}

/// Optional `month`/`year` filter. Both must be present to filter.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PeriodParams {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl PeriodParams {
    pub fn range(&self) -> AppResult<Option<DateRange>> {
        period_range(self.month, self.year)
    }
}

pub fn period_range(month: Option<u32>, year: Option<i32>) -> AppResult<Option<DateRange>> {
    match (month, year) {
        (Some(month), Some(year)) => DateRange::month(year, month)
            .map(Some)
            .ok_or_else(|| AppError::Validation("Invalid month or year".into())),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_needs_both_parts() {
        let params = PeriodParams {
            month: Some(3),
            year: None,
        };
        assert_eq!(params.range().unwrap(), None);
    }

    #[test]
    fn out_of_range_month_is_a_validation_error() {
        let params = PeriodParams {
            month: Some(13),
            year: Some(2024),
        };
        assert!(matches!(params.range(), Err(AppError::Validation(_))));
    }

    #[test]
    fn missing_id_is_reported() {
        let error = IdParams { id: None }.require().unwrap_err();
        assert_eq!(error.to_string(), "ID is required");
    }
}
