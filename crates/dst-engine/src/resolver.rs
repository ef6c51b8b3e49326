//! Transition resolution -- turns a symbolic rule into a concrete date/time.
//!
//! Weekdays are handled on the ISO 1 (Monday) ..= 7 (Sunday) scale so that
//! "how many days until/since weekday X" is a single modular expression.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};

use crate::error::{DstError, Result};
use crate::rule::{check_month, Occurrence, TransitionRule};

/// A transition resolved for one specific year.
pub type ResolvedTransition = NaiveDateTime;

/// Resolve `rule` to the calendar date and time it fires on in `year`.
///
/// # Errors
/// Returns `DstError::InvalidRule` if the month is outside 1..=12, if a
/// fixed-date rule names a day that does not exist in that month of `year`
/// (e.g. Feb 29 in a non-leap year), or if `year` is outside chrono's range.
pub fn resolve(year: i32, rule: &TransitionRule) -> Result<ResolvedTransition> {
    let date = match *rule {
        TransitionRule::Fixed { month, day, .. } => {
            check_month(month)?;
            NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
                DstError::InvalidRule(format!("{:04}-{:02}-{:02} does not exist", year, month, day))
            })?
        }
        TransitionRule::Floating {
            month,
            week,
            day_of_week,
            ..
        } => floating_date(year, month, week, day_of_week)?,
    };

    Ok(date.and_time(rule.time_of_day()))
}

/// ISO weekday number, Monday = 1 ..= Sunday = 7.
pub fn iso_weekday(weekday: Weekday) -> u32 {
    weekday.number_from_monday()
}

/// Number of days in `month` of `year`, or `None` for an invalid month/year.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    last_day_of_month(year, month).map(|d| d.day())
}

fn floating_date(year: i32, month: u32, week: Occurrence, weekday: Weekday) -> Result<NaiveDate> {
    check_month(month)?;
    let target = iso_weekday(weekday);

    if week == Occurrence::Last {
        let last_day = last_day_of_month(year, month).ok_or_else(|| out_of_range(year))?;
        let last_dow = iso_weekday(last_day.weekday());
        let days_back = (last_dow + 7 - target) % 7;
        return Ok(last_day - Duration::days(i64::from(days_back)));
    }

    let first_day = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| out_of_range(year))?;
    let first_dow = iso_weekday(first_day.weekday());
    let first_match = 1 + (target + 7 - first_dow) % 7;
    let day = first_match + 7 * (u32::from(week.index()) - 1);

    // Occurrences 1..=4 land on day 28 at the latest, so this never leaves the month.
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| out_of_range(year))
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

fn out_of_range(year: i32) -> DstError {
    DstError::InvalidRule(format!("year {} is out of range", year))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn days_in_month_handles_leap_years_and_december() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(1900, 2), Some(28));
        assert_eq!(days_in_month(2000, 2), Some(29));
        assert_eq!(days_in_month(2024, 12), Some(31));
        assert_eq!(days_in_month(2024, 13), None);
    }

    #[test]
    fn sunday_is_seven() {
        assert_eq!(iso_weekday(Weekday::Mon), 1);
        assert_eq!(iso_weekday(Weekday::Sun), 7);
    }

    #[test]
    fn fourth_occurrence_stays_in_february() {
        // February 2015 starts on a Sunday, so the fourth Saturday is the 28th.
        let rule = TransitionRule::Floating {
            month: 2,
            week: Occurrence::Fourth,
            day_of_week: Weekday::Sat,
            time_of_day: NaiveTime::MIN,
        };
        let resolved = resolve(2015, &rule).unwrap();
        assert_eq!(resolved.date(), NaiveDate::from_ymd_opt(2015, 2, 28).unwrap());
    }

    #[test]
    fn unchecked_month_is_rejected() {
        let rule = TransitionRule::Floating {
            month: 0,
            week: Occurrence::First,
            day_of_week: Weekday::Sun,
            time_of_day: NaiveTime::MIN,
        };
        assert!(matches!(resolve(2024, &rule), Err(DstError::InvalidRule(_))));
    }
}
