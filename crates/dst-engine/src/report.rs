//! Per-timezone DST report -- the record downstream consumers read.
//!
//! For each zone the source lists, the adjustment rule covering the target
//! year (if any) is resolved into start/end descriptors. Keys serialize in
//! PascalCase with `DSTOffset`/`UTCOffset` spelled out, matching the
//! established output format.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::descriptor::{describe, TransitionDescriptor};
use crate::error::Result;
use crate::zone::{AdjustmentRule, ZoneDescriptor, ZoneSource};

/// DST summary for one timezone in one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ZoneReport {
    pub id: String,
    pub display_name: String,
    pub standard_name: String,
    pub daylight_name: String,
    /// Whether the registry says the zone has DST at all.
    pub supports_daylight_saving_time: bool,
    /// Whether DST actually applies in the reported year.
    pub daylight_saving_time: bool,
    /// DST shift in minutes, 0 when `daylight_saving_time` is false.
    #[serde(rename = "DSTOffset")]
    pub dst_offset: i32,
    /// Minutes to add to local standard time to get UTC (UTC+01:00 is -60).
    #[serde(rename = "UTCOffset")]
    pub utc_offset: i32,
    pub daylight_transition_start: Option<TransitionDescriptor>,
    pub daylight_transition_end: Option<TransitionDescriptor>,
}

/// The first rule whose year range includes `year`.
pub fn active_rule(rules: &[AdjustmentRule], year: i32) -> Option<&AdjustmentRule> {
    rules.iter().find(|r| r.covers(year))
}

/// Build the report record for a single zone.
pub fn build_zone_report(
    zone: &ZoneDescriptor,
    rules: &[AdjustmentRule],
    year: i32,
) -> Result<ZoneReport> {
    let rule = active_rule(rules, year).filter(|_| zone.supports_dst);
    if rule.is_none() && zone.supports_dst {
        debug!("{}: no adjustment rule covers {}", zone.id, year);
    }

    let (dst_offset, start, end) = match rule {
        Some(r) => (
            r.daylight_delta_minutes,
            Some(describe(year, &r.start)?),
            Some(describe(year, &r.end)?),
        ),
        None => (0, None, None),
    };

    Ok(ZoneReport {
        id: zone.id.clone(),
        display_name: zone.display_name.clone(),
        standard_name: zone.standard_name.clone(),
        daylight_name: zone.daylight_name.clone(),
        supports_daylight_saving_time: zone.supports_dst,
        daylight_saving_time: rule.is_some(),
        dst_offset,
        utc_offset: -zone.base_utc_offset_minutes,
        daylight_transition_start: start,
        daylight_transition_end: end,
    })
}

/// Build one report per zone of `source`, in source order.
///
/// # Errors
/// Propagates registry failures from the source and `DstError::InvalidRule`
/// for an active rule that cannot be resolved in `year`.
pub fn build_report<S: ZoneSource>(source: &S, year: i32) -> Result<Vec<ZoneReport>> {
    source
        .zones()?
        .iter()
        .map(|zone| {
            let rules = source.adjustment_rules(zone)?;
            build_zone_report(zone, &rules, year)
        })
        .collect()
}

/// Serialize reports as a JSON array, indented when `pretty`.
pub fn to_json(reports: &[ZoneReport], pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(reports)?
    } else {
        serde_json::to_string(reports)?
    };
    Ok(json)
}
