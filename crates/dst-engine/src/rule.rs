//! Abstract DST transition rules.
//!
//! A rule either pins a transition to a calendar day ("March 15th") or floats
//! it on a weekday occurrence ("second Sunday of March", "last Sunday of
//! October"). Rules are symbolic: [`crate::resolver::resolve`] turns one into
//! a concrete date for a given year.

use chrono::{NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{DstError, Result};

/// The "end of day" sentinel. A rule at this time means 24:00:00 of its day,
/// i.e. 00:00:00 of the following day.
pub const END_OF_DAY: NaiveTime = hms(23, 59, 59);

/// Compile-time `NaiveTime` constructor for rule constants.
pub(crate) const fn hms(hour: u32, min: u32, sec: u32) -> NaiveTime {
    match NaiveTime::from_hms_opt(hour, min, sec) {
        Some(t) => t,
        None => panic!("invalid time of day"),
    }
}

/// Which occurrence of a weekday within a month a floating rule fires on.
///
/// Serialized as the legacy integer 1..=5, where 5 means the last occurrence
/// (not a literal fifth one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Occurrence {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

impl Occurrence {
    /// The 1-based index of this occurrence, with [`Occurrence::Last`] as 5.
    pub fn index(self) -> u8 {
        match self {
            Occurrence::First => 1,
            Occurrence::Second => 2,
            Occurrence::Third => 3,
            Occurrence::Fourth => 4,
            Occurrence::Last => 5,
        }
    }
}

impl TryFrom<u8> for Occurrence {
    type Error = DstError;

    fn try_from(week: u8) -> Result<Self> {
        match week {
            1 => Ok(Occurrence::First),
            2 => Ok(Occurrence::Second),
            3 => Ok(Occurrence::Third),
            4 => Ok(Occurrence::Fourth),
            5 => Ok(Occurrence::Last),
            other => Err(DstError::InvalidRule(format!(
                "week must be in 1..=5, got {}",
                other
            ))),
        }
    }
}

impl From<Occurrence> for u8 {
    fn from(o: Occurrence) -> u8 {
        o.index()
    }
}

/// A symbolic DST transition rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TransitionRule {
    /// Fires on `day` of `month` every year.
    #[serde(rename_all = "camelCase")]
    Fixed {
        month: u32,
        day: u32,
        time_of_day: NaiveTime,
    },
    /// Fires on the given occurrence of `weekday` within `month`.
    #[serde(rename_all = "camelCase")]
    Floating {
        month: u32,
        week: Occurrence,
        day_of_week: Weekday,
        time_of_day: NaiveTime,
    },
}

impl TransitionRule {
    /// Build a fixed-date rule, validating the month and that the day can
    /// exist in that month (Feb 29 is accepted).
    pub fn fixed_date(time_of_day: NaiveTime, month: u32, day: u32) -> Result<Self> {
        check_month(month)?;
        let max_day = max_days_in_month(month);
        if day == 0 || day > max_day {
            return Err(DstError::InvalidRule(format!(
                "day {} out of range for month {}",
                day, month
            )));
        }
        Ok(TransitionRule::Fixed {
            month,
            day,
            time_of_day,
        })
    }

    /// Build a floating rule, e.g. `floating_date(t, 3, Occurrence::Second, Weekday::Sun)`
    /// for "second Sunday of March".
    pub fn floating_date(
        time_of_day: NaiveTime,
        month: u32,
        week: Occurrence,
        day_of_week: Weekday,
    ) -> Result<Self> {
        check_month(month)?;
        Ok(TransitionRule::Floating {
            month,
            week,
            day_of_week,
            time_of_day,
        })
    }

    pub fn is_fixed_date(&self) -> bool {
        matches!(self, TransitionRule::Fixed { .. })
    }

    pub fn month(&self) -> u32 {
        match *self {
            TransitionRule::Fixed { month, .. } | TransitionRule::Floating { month, .. } => month,
        }
    }

    pub fn time_of_day(&self) -> NaiveTime {
        match *self {
            TransitionRule::Fixed { time_of_day, .. }
            | TransitionRule::Floating { time_of_day, .. } => time_of_day,
        }
    }

    /// True when the rule uses the 23:59:59 "end of day" convention.
    ///
    /// Fractions of a second are ignored, so registries that spell 24:00 as
    /// 23:59:59.999 count too.
    pub fn is_end_of_day(&self) -> bool {
        let t = self.time_of_day();
        (t.hour(), t.minute(), t.second()) == (23, 59, 59)
    }
}

pub(crate) fn check_month(month: u32) -> Result<()> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(DstError::InvalidRule(format!(
            "month must be in 1..=12, got {}",
            month
        )))
    }
}

fn max_days_in_month(month: u32) -> u32 {
    match month {
        2 => 29,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}
