//! Ledger store: row mapping and SQL for every persisted entity.
//!
//! Functions take a plain `&mut SqliteConnection` so the same code runs on a pooled
//! connection or inside a transaction (`&mut *tx`).

pub mod accounts;
pub mod adjustments;
pub mod budgets;
pub mod categories;
pub mod expenses;
pub mod incomes;
pub mod initial_balances;
pub mod ledger;
pub mod receivables;
pub mod transfers;

use chrono::{Datelike, NaiveDate};

/// Inclusive date bounds used by list filters and period aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Calendar month `month` of `year`; `None` when either is out of range.
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        Some(Self {
            start,
            end: next.pred_opt()?,
        })
    }

    /// January 1 of the range's year through the range end.
    pub fn year_to_date(&self) -> Option<Self> {
        Some(Self {
            start: NaiveDate::from_ymd_opt(self.end.year(), 1, 1)?,
            end: self.end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_bounds_cover_leap_february() {
        let range = DateRange::month(2024, 2).unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn december_rolls_into_next_year() {
        let range = DateRange::month(2023, 12).unwrap();
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        let ytd = range.year_to_date().unwrap();
        assert_eq!(ytd.start, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert!(DateRange::month(2024, 13).is_none());
        assert!(DateRange::month(2024, 0).is_none());
    }
}
