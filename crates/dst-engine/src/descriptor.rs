//! Normalized, serializable view of a resolved transition.
//!
//! Every field is derived from the *resolved* date, not copied from the rule:
//! a "last Sunday of October" rule reports week 4 or 5 depending on which
//! occurrence it actually landed on that year.

use chrono::{Datelike, Duration, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::resolver::{iso_weekday, resolve};
use crate::rule::TransitionRule;

const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const TIME_OF_DAY_FORMAT: &str = "%H:%M:%S";

/// A transition described for display and comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransitionDescriptor {
    /// `yyyy-MM-ddTHH:mm:ss` of the transition instant.
    pub date_time: String,
    /// Day of month for fixed rules; ISO weekday (Monday = 1 ..= Sunday = 7)
    /// for floating rules.
    pub day: u32,
    pub month: u32,
    /// 0 for fixed rules, otherwise the occurrence of the weekday in the month.
    pub week: u32,
    pub time_of_day: String,
    pub is_fixed_date_rule: bool,
}

/// Resolve `rule` for `year` and describe the result.
///
/// A rule at 23:59:59 denotes midnight at the end of its day: the instant is
/// advanced by one second (rolling day, month and year as needed) and the
/// time of day is shown as `00:00:00`. Fractions of a second are dropped.
pub fn describe(year: i32, rule: &TransitionRule) -> Result<TransitionDescriptor> {
    let resolved = resolve(year, rule)?;
    let mut at = resolved.with_nanosecond(0).unwrap_or(resolved);

    let time_of_day = if rule.is_end_of_day() {
        at += Duration::seconds(1);
        at.format(TIME_OF_DAY_FORMAT).to_string()
    } else {
        rule.time_of_day().format(TIME_OF_DAY_FORMAT).to_string()
    };

    let is_fixed = rule.is_fixed_date();
    let (day, week) = if is_fixed {
        (at.day(), 0)
    } else {
        (iso_weekday(at.weekday()), (at.day() - 1) / 7 + 1)
    };

    Ok(TransitionDescriptor {
        date_time: at.format(DATE_TIME_FORMAT).to_string(),
        day,
        month: at.month(),
        week,
        time_of_day,
        is_fixed_date_rule: is_fixed,
    })
}
