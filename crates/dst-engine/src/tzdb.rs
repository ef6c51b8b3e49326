//! A [`ZoneSource`] backed by the IANA tz database bundled with `chrono-tz`.
//!
//! The database stores transitions, not symbolic rules, so for a given year
//! each zone is scanned for the instants where daylight saving switches on and
//! off. Each switch is then re-expressed as a floating rule ("second Sunday of
//! March at 02:00") in the wall-clock time in effect just before it.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone};
use chrono_tz::{OffsetComponents, Tz, TzOffset, TZ_VARIANTS};
use log::{trace, warn};

use crate::error::{DstError, Result};
use crate::resolver::days_in_month;
use crate::rule::{Occurrence, TransitionRule};
use crate::zone::{format_utc_offset, AdjustmentRule, ZoneDescriptor, ZoneSource};

/// Derives zone descriptors and adjustment rules for one year from tzdata.
///
/// Each zone is scanned once, when the source is built.
#[derive(Debug, Clone)]
pub struct TzdbSource {
    year: i32,
    scans: Vec<(Tz, YearScan)>,
}

impl TzdbSource {
    /// Every zone in the bundled database.
    ///
    /// # Errors
    /// Returns `DstError::InvalidRule` if `year` is outside chrono's range.
    pub fn new(year: i32) -> Result<Self> {
        Self::scan(year, TZ_VARIANTS.to_vec())
    }

    /// Only the named zones, in the given order.
    ///
    /// # Errors
    /// Returns `DstError::InvalidTimezone` for a name not in the database.
    pub fn with_zones<S: AsRef<str>>(year: i32, names: &[S]) -> Result<Self> {
        let zones = names
            .iter()
            .map(|n| parse_tz(n.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::scan(year, zones)
    }

    fn scan(year: i32, zones: Vec<Tz>) -> Result<Self> {
        let scans = zones
            .into_iter()
            .map(|tz| Ok((tz, scan_year(tz, year)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { year, scans })
    }

    fn scan_for(&self, id: &str) -> Result<&YearScan> {
        self.scans
            .iter()
            .find(|(tz, _)| tz.name() == id)
            .map(|(_, scan)| scan)
            .ok_or_else(|| DstError::Registry(format!("zone '{}' was not scanned", id)))
    }
}

impl ZoneSource for TzdbSource {
    fn zones(&self) -> Result<Vec<ZoneDescriptor>> {
        Ok(self
            .scans
            .iter()
            .map(|(tz, scan)| {
                let name = tz.name();
                ZoneDescriptor {
                    id: name.to_string(),
                    display_name: format!("{} {}", format_utc_offset(scan.base_minutes), name),
                    standard_name: name.to_string(),
                    daylight_name: name.to_string(),
                    base_utc_offset_minutes: scan.base_minutes,
                    supports_dst: scan.start.is_some() && scan.end.is_some(),
                }
            })
            .collect())
    }

    fn adjustment_rules(&self, zone: &ZoneDescriptor) -> Result<Vec<AdjustmentRule>> {
        let scan = self.scan_for(&zone.id)?;

        let (start, end) = match (scan.start, scan.end) {
            (Some(start), Some(end)) => (start, end),
            (None, None) => return Ok(Vec::new()),
            (start, end) => {
                warn!(
                    "{}: only one DST switch in {} (start: {}, end: {}), skipping",
                    zone.id,
                    self.year,
                    start.is_some(),
                    end.is_some()
                );
                return Ok(Vec::new());
            }
        };

        let year_range = |month, day| {
            NaiveDate::from_ymd_opt(self.year, month, day)
                .ok_or_else(|| DstError::InvalidRule(format!("year {} is out of range", self.year)))
        };

        Ok(vec![AdjustmentRule {
            date_start: year_range(1, 1)?,
            date_end: year_range(12, 31)?,
            daylight_delta_minutes: start.after.dst_offset().num_minutes() as i32,
            start: floating_rule_at(start.local_before())?,
            end: floating_rule_at(end.local_before())?,
        }])
    }
}

/// Look up an IANA zone name.
pub fn parse_tz(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| DstError::InvalidTimezone(name.to_string()))
}

/// A change of the DST component of a zone's offset.
#[derive(Debug, Clone, Copy)]
struct Switch {
    /// First UTC second with the new offset.
    utc: NaiveDateTime,
    before: TzOffset,
    after: TzOffset,
}

impl Switch {
    /// The wall-clock reading at the switch, in the offset it switches away from.
    fn local_before(&self) -> NaiveDateTime {
        self.utc + Duration::seconds(i64::from(self.before.fix().local_minus_utc()))
    }
}

#[derive(Debug, Clone, Copy)]
struct YearScan {
    base_minutes: i32,
    start: Option<Switch>,
    end: Option<Switch>,
}

fn scan_year(tz: Tz, year: i32) -> Result<YearScan> {
    let out_of_range = || DstError::InvalidRule(format!("year {} is out of range", year));
    let first = NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(out_of_range)?
        .and_time(NaiveTime::MIN);
    let last = NaiveDate::from_ymd_opt(year.checked_add(1).ok_or_else(out_of_range)?, 1, 1)
        .ok_or_else(out_of_range)?
        .and_time(NaiveTime::MIN);

    let offset_at = |t: NaiveDateTime| tz.offset_from_utc_datetime(&t);
    let base_minutes = offset_at(first).base_utc_offset().num_minutes() as i32;

    let mut scan = YearScan {
        base_minutes,
        start: None,
        end: None,
    };

    let mut lo = first;
    while lo < last {
        let hi = (lo + Duration::days(1)).min(last);
        if in_dst(&offset_at(lo)) != in_dst(&offset_at(hi)) {
            let switch = bisect(tz, lo, hi);
            trace!(
                "{}: DST {} at {}Z",
                tz.name(),
                if in_dst(&switch.after) { "starts" } else { "ends" },
                switch.utc
            );
            if in_dst(&switch.after) {
                scan.start.get_or_insert(switch);
            } else {
                scan.end.get_or_insert(switch);
            }
        }
        lo = hi;
    }

    Ok(scan)
}

/// Narrow a day known to contain a DST switch down to the exact second.
///
/// `lo` and `hi` start on whole seconds and the midpoint is taken in whole
/// seconds, so the switch never carries a fractional part.
fn bisect(tz: Tz, mut lo: NaiveDateTime, mut hi: NaiveDateTime) -> Switch {
    let dst_at = |t: NaiveDateTime| in_dst(&tz.offset_from_utc_datetime(&t));
    let dst_lo = dst_at(lo);

    while (hi - lo).num_seconds() > 1 {
        let mid = lo + Duration::seconds((hi - lo).num_seconds() / 2);
        if dst_at(mid) == dst_lo {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    Switch {
        utc: hi,
        before: tz.offset_from_utc_datetime(&lo),
        after: tz.offset_from_utc_datetime(&hi),
    }
}

fn in_dst(offset: &TzOffset) -> bool {
    offset.dst_offset() != Duration::zero()
}

/// Express a local transition instant as a floating weekday rule.
fn floating_rule_at(local: NaiveDateTime) -> Result<TransitionRule> {
    let date = local.date();
    let days = days_in_month(date.year(), date.month())
        .ok_or_else(|| DstError::InvalidRule(format!("no such month: {}", date)))?;

    let week = if date.day() + 7 > days {
        Occurrence::Last
    } else {
        Occurrence::try_from(((date.day() - 1) / 7 + 1) as u8)?
    };

    TransitionRule::floating_date(local.time(), date.month(), week, date.weekday())
}
