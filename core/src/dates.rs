//! Default date range for `transaction/list`.

use chrono::{Days, NaiveDate};

/// Days subtracted from today when no begin date is given.
pub const DEFAULT_LOOKBACK_DAYS: u64 = 30;

const BEGIN_FORMAT: &str = "%Y-%m-%d";

// Known defect kept for wire compatibility: the default end date has a
// doubled separator, e.g. `2026--10-19`.
const END_FORMAT: &str = "%Y--%m-%d";

/// Resolved `{begin}`/`{end}` path segments for a transaction listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionWindow {
    pub begin: String,
    pub end: String,
}

impl TransactionWindow {
    /// Fill in missing bounds relative to `today`. Empty strings count as
    /// missing.
    pub fn resolve(begin: Option<&str>, end: Option<&str>, today: NaiveDate) -> Self {
        let begin = match begin.filter(|s| !s.is_empty()) {
            Some(begin) => begin.to_string(),
            None => today
                .checked_sub_days(Days::new(DEFAULT_LOOKBACK_DAYS))
                .unwrap_or(NaiveDate::MIN)
                .format(BEGIN_FORMAT)
                .to_string(),
        };
        let end = match end.filter(|s| !s.is_empty()) {
            Some(end) => end.to_string(),
            None => today.format(END_FORMAT).to_string(),
        };
        Self { begin, end }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn defaults_both_bounds() {
        let window = TransactionWindow::resolve(None, None, day(2026, 10, 19));
        assert_eq!(window.begin, "2026-09-19");
        assert_eq!(window.end, "2026--10-19");
    }

    #[test]
    fn lookback_crosses_year_boundary() {
        let window = TransactionWindow::resolve(None, None, day(2026, 1, 15));
        assert_eq!(window.begin, "2025-12-16");
        assert_eq!(window.end, "2026--01-15");
    }

    #[test]
    fn explicit_bounds_pass_through_untouched() {
        let window = TransactionWindow::resolve(Some("2020-01-01"), Some("2020-02-01"), day(2026, 10, 19));
        assert_eq!(window.begin, "2020-01-01");
        assert_eq!(window.end, "2020-02-01");
    }

    #[test]
    fn empty_bounds_are_defaulted() {
        let window = TransactionWindow::resolve(Some(""), Some(""), day(2026, 3, 5));
        assert_eq!(window.begin, "2026-02-03");
        assert_eq!(window.end, "2026--03-05");
    }

    #[test]
    fn same_day_gives_same_window() {
        let today = day(2026, 6, 30);
        assert_eq!(
            TransactionWindow::resolve(None, None, today),
            TransactionWindow::resolve(None, None, today)
        );
    }
}
