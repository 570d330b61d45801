//! # Week Window
//!
//! Sunday-to-Saturday calendar weeks used to bucket sales and expenses.
//!
//! ## How a Window Is Chosen
//! ```text
//!   reference date: Mon 19 Oct 2026, offset: -1
//!
//!   1. shift by offset × 7 days     → Mon 12 Oct 2026
//!   2. step back to the Sunday      → Sun 11 Oct 2026   (start)
//!   3. start + 6 days               → Sat 17 Oct 2026   (end)
//!
//!   ┌─────┬─────┬─────┬─────┬─────┬─────┬─────┐
//!   │ Sun │ Mon │ Tue │ Wed │ Thu │ Fri │ Sat │
//!   │ 11  │ 12  │ 13  │ 14  │ 15  │ 16  │ 17  │
//!   └─────┴─────┴─────┴─────┴─────┴─────┴─────┘
//!     ▲ start                             end ▲
//! ```
//!
//! ## Inclusive by Date
//! Membership compares calendar dates, not instants: a sale at 23:59 on the
//! Saturday belongs to the week. Instants are converted to dates in the
//! window's UTC offset, which is how the business sees its own days.

use chrono::{DateTime, Datelike, Days, Duration, FixedOffset, NaiveDate, Offset, Utc};

use crate::error::ValidationError;
use crate::validation::ValidationResult;

/// A Sunday-to-Saturday week in a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    /// The Sunday.
    pub start: NaiveDate,
    /// The Saturday, six days after `start`.
    pub end: NaiveDate,
    /// Offset used to turn stored UTC instants into local dates.
    pub utc_offset: FixedOffset,
}

/// Returns the week containing `reference` shifted by `offset_weeks`.
///
/// `offset_weeks` is 0 for the current week, -1 for last week, and so on.
/// Fails only when the window would fall outside the dates chrono can
/// represent.
///
/// ```rust
/// use chrono::NaiveDate;
/// use stockbook_core::week::week_range;
///
/// let monday = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
/// let week = week_range(monday, 0).unwrap();
/// assert_eq!(week.start, NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
/// assert_eq!(week.end, NaiveDate::from_ymd_opt(2026, 10, 24).unwrap());
///
/// assert!(week_range(monday, 1_000_000_000).is_err());
/// ```
pub fn week_range(reference: NaiveDate, offset_weeks: i64) -> ValidationResult<WeekWindow> {
    week_range_in(reference, offset_weeks, utc())
}

/// Same as [`week_range`], but the window converts instants with `utc_offset`.
pub fn week_range_in(
    reference: NaiveDate,
    offset_weeks: i64,
    utc_offset: FixedOffset,
) -> ValidationResult<WeekWindow> {
    let out_of_range = || ValidationError::DateOutOfRange {
        field: "week".to_string(),
    };

    let shifted = offset_weeks
        .checked_mul(7)
        .and_then(Duration::try_days)
        .and_then(|shift| reference.checked_add_signed(shift))
        .ok_or_else(out_of_range)?;
    let back_to_sunday = Days::new(u64::from(shifted.weekday().num_days_from_sunday()));
    let start = shifted
        .checked_sub_days(back_to_sunday)
        .ok_or_else(out_of_range)?;
    let end = start.checked_add_days(Days::new(6)).ok_or_else(out_of_range)?;

    Ok(WeekWindow {
        start,
        end,
        utc_offset,
    })
}

/// Week window for an instant, read as a local date in `utc_offset`.
pub fn week_range_at(
    now: DateTime<Utc>,
    offset_weeks: i64,
    utc_offset: FixedOffset,
) -> ValidationResult<WeekWindow> {
    let today = now.with_timezone(&utc_offset).date_naive();
    week_range_in(today, offset_weeks, utc_offset)
}

fn utc() -> FixedOffset {
    Utc.fix()
}

impl WeekWindow {
    /// The calendar date of `instant` in this window's offset.
    #[inline]
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.utc_offset).date_naive()
    }

    /// True when the instant's local date lies in `[start, end]`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.contains_date(self.local_date(instant))
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The seven dates of the week, Sunday first.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(7)
    }

    /// The window `weeks` weeks later (or earlier when negative).
    pub fn shift(&self, weeks: i64) -> ValidationResult<WeekWindow> {
        week_range_in(self.start, weeks, self.utc_offset)
    }

    /// Week number within the month of `start`, as printed on report titles.
    ///
    /// Counts the partial first week as week 1: a window starting on the
    /// 4th is week 1, on the 11th week 2, on the 18th week 3.
    pub fn week_of_month(&self) -> u32 {
        self.start.day() / 7 + 1
    }

    /// Short label such as `Oct 18 - Oct 24, 2026`.
    ///
    /// The start date carries its own year only when the week spans New Year.
    pub fn label(&self) -> String {
        if self.start.year() == self.end.year() {
            format!(
                "{} - {}",
                self.start.format("%b %-d"),
                self.end.format("%b %-d, %Y")
            )
        } else {
            format!(
                "{} - {}",
                self.start.format("%b %-d, %Y"),
                self.end.format("%b %-d, %Y")
            )
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_every_day_maps_to_a_sunday_window_containing_it() {
        let first = date(2026, 1, 1);
        for reference in first.iter_days().take(800) {
            let week = week_range(reference, 0).unwrap();
            assert_eq!(week.start.weekday(), Weekday::Sun);
            assert_eq!(week.end - week.start, Duration::days(6));
            assert!(week.contains_date(reference), "{reference} not in {week:?}");
        }
    }

    #[test]
    fn test_sunday_is_its_own_start() {
        let sunday = date(2026, 10, 18);
        assert_eq!(week_range(sunday, 0).unwrap().start, sunday);
    }

    #[test]
    fn test_offsets() {
        let monday = date(2026, 10, 19);
        assert_eq!(week_range(monday, -1).unwrap().start, date(2026, 10, 11));
        assert_eq!(week_range(monday, 1).unwrap().start, date(2026, 10, 25));
        assert_eq!(week_range(monday, -52).unwrap().start, date(2025, 10, 19));
    }

    #[test]
    fn test_window_across_month_and_year() {
        let week = week_range(date(2026, 12, 31), 0).unwrap();
        assert_eq!(week.start, date(2026, 12, 27));
        assert_eq!(week.end, date(2027, 1, 2));
        assert_eq!(week.label(), "Dec 27, 2026 - Jan 2, 2027");
    }

    #[test]
    fn test_contains_is_inclusive_by_date() {
        let week = week_range(date(2026, 10, 19), 0).unwrap();
        let first_moment = Utc.with_ymd_and_hms(2026, 10, 18, 0, 0, 0).unwrap();
        let last_moment = Utc.with_ymd_and_hms(2026, 10, 24, 23, 59, 59).unwrap();
        let after = Utc.with_ymd_and_hms(2026, 10, 25, 0, 0, 0).unwrap();

        assert!(week.contains(first_moment));
        assert!(week.contains(last_moment));
        assert!(!week.contains(after));
    }

    #[test]
    fn test_contains_uses_local_offset() {
        // 22:30 UTC on Saturday is already Sunday in UTC+2.
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let week = week_range_in(date(2026, 10, 19), 0, plus_two).unwrap();
        let late_saturday_utc = Utc.with_ymd_and_hms(2026, 10, 24, 22, 30, 0).unwrap();

        assert!(!week.contains(late_saturday_utc));
        assert!(week.shift(1).unwrap().contains(late_saturday_utc));
    }

    #[test]
    fn test_week_range_at_uses_local_today() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 10, 24, 23, 0, 0).unwrap();
        assert_eq!(week_range_at(now, 0, plus_two).unwrap().start, date(2026, 10, 25));
        assert_eq!(week_range_at(now, 0, utc()).unwrap().start, date(2026, 10, 18));
    }

    #[test]
    fn test_out_of_range_offset_is_an_error() {
        let monday = date(2026, 10, 19);

        assert!(matches!(
            week_range(monday, 1_000_000_000),
            Err(ValidationError::DateOutOfRange { .. })
        ));
        assert!(week_range(monday, i64::MAX).is_err());
        assert!(week_range(monday, i64::MIN).is_err());
        assert!(week_range(NaiveDate::MAX, 0).is_err());
        assert!(week_range(NaiveDate::MIN, 0).is_err());
    }

    #[test]
    fn test_days() {
        let days: Vec<_> = week_range(date(2026, 10, 19), 0).unwrap().days().collect();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], date(2026, 10, 18));
        assert_eq!(days[6], date(2026, 10, 24));
    }

    #[test]
    fn test_week_of_month() {
        assert_eq!(week_range(date(2026, 10, 4), 0).unwrap().week_of_month(), 1);
        assert_eq!(week_range(date(2026, 10, 11), 0).unwrap().week_of_month(), 2);
        assert_eq!(week_range(date(2026, 10, 18), 0).unwrap().week_of_month(), 3);
        assert_eq!(week_range(date(2026, 11, 1), 0).unwrap().week_of_month(), 1);
    }

    #[test]
    fn test_label() {
        assert_eq!(week_range(date(2026, 10, 19), 0).unwrap().label(), "Oct 18 - Oct 24, 2026");
    }
}
