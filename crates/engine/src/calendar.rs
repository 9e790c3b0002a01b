//! Calendar projection of shifts onto day cells.
//!
//! Pure functions, no database access. A shift lands on the cell whose date
//! equals its start day; the end date never affects placement, so a
//! multi-day shift still renders on its start cell only.

use chrono::{Datelike, Duration, NaiveDate};
use uuid::Uuid;

use crate::Shift;

/// One renderable calendar cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    /// Day-of-week offset, 0 = Sunday .. 6 = Saturday. A month view uses the
    /// first cell's offset to compute its grid column.
    pub weekday: u8,
    pub shifts: Vec<Uuid>,
}

/// Every day of a calendar month, in order. `None` for an invalid month.
pub fn month_days(year: i32, month: u32) -> Option<Vec<NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(days_between(first, next_month.pred_opt()?))
}

/// The Sunday-started week containing `anchor`.
pub fn week_days(anchor: NaiveDate) -> Vec<NaiveDate> {
    let offset = anchor.weekday().num_days_from_sunday() as i64;
    let start = anchor - Duration::days(offset);
    days_between(start, start + Duration::days(6))
}

fn days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut day = start;
    while day <= end {
        days.push(day);
        day += Duration::days(1);
    }
    days
}

/// Projects shifts onto cells: one cell per day, a shift on the cell
/// matching its start day (UTC date).
pub fn project(days: &[NaiveDate], shifts: &[Shift]) -> Vec<DayCell> {
    days.iter()
        .map(|day| DayCell {
            date: *day,
            weekday: day.weekday().num_days_from_sunday() as u8,
            shifts: shifts
                .iter()
                .filter(|shift| shift.start_at.date_naive() == *day)
                .map(|shift| shift.id)
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn march_shift(start_day: u32, end_day: u32) -> Shift {
        Shift::new(
            "group-1".to_string(),
            Utc.with_ymd_and_hms(2024, 3, start_day, 22, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, end_day, 6, 0, 0).unwrap(),
        )
    }

    #[test]
    fn month_days_covers_the_whole_month() {
        let days = month_days(2024, 3).unwrap();
        assert_eq!(days.len(), 31);
        assert_eq!(days[0], NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(days[30], NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());

        // December rolls the year over.
        let days = month_days(2024, 12).unwrap();
        assert_eq!(days.len(), 31);
    }

    #[test]
    fn month_days_rejects_invalid_month() {
        assert!(month_days(2024, 0).is_none());
        assert!(month_days(2024, 13).is_none());
    }

    #[test]
    fn week_days_start_on_sunday() {
        // 2024-03-06 is a Wednesday.
        let anchor = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
        let days = week_days(anchor);
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], NaiveDate::from_ymd_opt(2024, 3, 3).unwrap());
        assert_eq!(days[6], NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
    }

    #[test]
    fn first_cell_carries_the_grid_offset() {
        // March 2024 starts on a Friday.
        let days = month_days(2024, 3).unwrap();
        let cells = project(&days, &[]);
        assert_eq!(cells.len(), 31);
        assert_eq!(cells[0].weekday, 5);
        assert_eq!(cells[2].weekday, 0);
    }

    #[test]
    fn shift_lands_only_on_its_start_day() {
        let shift = march_shift(5, 7);
        let days = month_days(2024, 3).unwrap();
        let cells = project(&days, &[shift.clone()]);

        assert_eq!(cells[4].date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(cells[4].shifts, vec![shift.id]);
        assert!(cells[5].shifts.is_empty());
        assert!(cells[6].shifts.is_empty());
    }

    #[test]
    fn same_day_shifts_share_a_cell() {
        let first = march_shift(5, 6);
        let second = march_shift(5, 7);
        let days = month_days(2024, 3).unwrap();
        let cells = project(&days, &[first.clone(), second.clone()]);

        assert_eq!(cells[4].shifts, vec![first.id, second.id]);
    }
}
