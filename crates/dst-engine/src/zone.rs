//! Timezone registry model and the [`ZoneSource`] capability.
//!
//! The report never enumerates timezones on its own; it asks an injected
//! source. [`StaticSource`] holds an explicit list (built in code or loaded
//! from JSON) and [`crate::tzdb::TzdbSource`] derives one from the IANA
//! database.

use std::io::Read;

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{DstError, Result};
use crate::rule::{hms, TransitionRule, END_OF_DAY};

/// A timezone as listed by a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneDescriptor {
    pub id: String,
    pub display_name: String,
    pub standard_name: String,
    pub daylight_name: String,
    /// Standard-time offset from UTC in minutes (east positive).
    pub base_utc_offset_minutes: i32,
    pub supports_dst: bool,
}

/// DST rule for a zone, valid for the years `date_start.year()..=date_end.year()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentRule {
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    /// Clock shift while DST is in effect, in minutes.
    pub daylight_delta_minutes: i32,
    pub start: TransitionRule,
    pub end: TransitionRule,
}

impl AdjustmentRule {
    /// Whether this rule is in effect for any part of `year`.
    pub fn covers(&self, year: i32) -> bool {
        self.date_start.year() <= year && self.date_end.year() >= year
    }
}

/// Anything that can list timezones and their DST adjustment rules.
pub trait ZoneSource {
    fn zones(&self) -> Result<Vec<ZoneDescriptor>>;

    fn adjustment_rules(&self, zone: &ZoneDescriptor) -> Result<Vec<AdjustmentRule>>;
}

/// One registry entry: a zone and the rules attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneEntry {
    #[serde(flatten)]
    pub zone: ZoneDescriptor,
    #[serde(default)]
    pub adjustment_rules: Vec<AdjustmentRule>,
}

/// An explicit, in-memory registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticSource {
    entries: Vec<ZoneEntry>,
}

impl StaticSource {
    pub fn new(entries: Vec<ZoneEntry>) -> Self {
        Self { entries }
    }

    /// Parse a registry document: a JSON array of zone entries.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<ZoneEntry> = serde_json::from_str(json)?;
        Ok(Self::new(entries))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let entries: Vec<ZoneEntry> = serde_json::from_reader(reader)?;
        Ok(Self::new(entries))
    }

    /// The two fixed-rule regression zones that every report ends with.
    ///
    /// Both sit at UTC+01:00 with a one hour DST delta and switch on March 15th.
    /// The second one ends at 24:00 on October 25th, written as 23:59:59.
    pub fn samples() -> Self {
        const TWO_AM: NaiveTime = hms(2, 0, 0);
        const THREE_AM: NaiveTime = hms(3, 0, 0);

        let sample = |id: &str, label: &str, start: NaiveTime, end: NaiveTime| ZoneEntry {
            zone: ZoneDescriptor {
                id: id.to_string(),
                display_name: format!("(UTC+01:00) {}", label),
                standard_name: "Dummy Standard Time".to_string(),
                daylight_name: "Dummy Daylight Time".to_string(),
                base_utc_offset_minutes: 60,
                supports_dst: true,
            },
            adjustment_rules: vec![AdjustmentRule {
                date_start: NaiveDate::MIN,
                date_end: NaiveDate::MAX,
                daylight_delta_minutes: 60,
                start: TransitionRule::Fixed {
                    month: 3,
                    day: 15,
                    time_of_day: start,
                },
                end: TransitionRule::Fixed {
                    month: 10,
                    day: 25,
                    time_of_day: end,
                },
            }],
        };

        Self::new(vec![
            sample(
                "Dummy Fixed Rule Timezone",
                "Dummy Fixed Rule",
                TWO_AM,
                THREE_AM,
            ),
            sample(
                "Dummy 2 Fixed Rule Timezone",
                "Dummy 2 Fixed Rule",
                NaiveTime::MIN,
                END_OF_DAY,
            ),
        ])
    }

    pub fn entries(&self) -> &[ZoneEntry] {
        &self.entries
    }
}

impl ZoneSource for StaticSource {
    fn zones(&self) -> Result<Vec<ZoneDescriptor>> {
        Ok(self.entries.iter().map(|e| e.zone.clone()).collect())
    }

    fn adjustment_rules(&self, zone: &ZoneDescriptor) -> Result<Vec<AdjustmentRule>> {
        self.entries
            .iter()
            .find(|e| e.zone.id == zone.id)
            .map(|e| e.adjustment_rules.clone())
            .ok_or_else(|| DstError::Registry(format!("unknown zone '{}'", zone.id)))
    }
}

/// Format a UTC offset in minutes as `(UTC+hh:mm)`.
pub fn format_utc_offset(minutes: i32) -> String {
    let sign = if minutes < 0 { '-' } else { '+' };
    let abs = minutes.unsigned_abs();
    format!("(UTC{}{:02}:{:02})", sign, abs / 60, abs % 60)
}
