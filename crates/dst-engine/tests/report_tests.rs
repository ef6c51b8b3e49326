//! Tests for report orchestration: active-rule selection, DST flags, offsets,
//! the sample zones and JSON shape.

use chrono::{NaiveDate, NaiveTime, Weekday};
use dst_engine::report::{active_rule, build_zone_report};
use dst_engine::{
    build_report, to_json, AdjustmentRule, DstError, Occurrence, StaticSource, TransitionRule,
    ZoneDescriptor, ZoneEntry,
};

fn time(h: u32, m: u32, s: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, s).unwrap()
}

fn zone(id: &str, base: i32, supports_dst: bool) -> ZoneDescriptor {
    ZoneDescriptor {
        id: id.to_string(),
        display_name: format!("Test {}", id),
        standard_name: format!("{} Standard Time", id),
        daylight_name: format!("{} Daylight Time", id),
        base_utc_offset_minutes: base,
        supports_dst,
    }
}

fn us_rule(from: i32, to: i32) -> AdjustmentRule {
    AdjustmentRule {
        date_start: NaiveDate::from_ymd_opt(from, 1, 1).unwrap(),
        date_end: NaiveDate::from_ymd_opt(to, 12, 31).unwrap(),
        daylight_delta_minutes: 60,
        start: TransitionRule::floating_date(time(2, 0, 0), 3, Occurrence::Second, Weekday::Sun)
            .unwrap(),
        end: TransitionRule::floating_date(time(2, 0, 0), 11, Occurrence::First, Weekday::Sun)
            .unwrap(),
    }
}

fn old_us_rule() -> AdjustmentRule {
    AdjustmentRule {
        date_start: NaiveDate::from_ymd_opt(1987, 1, 1).unwrap(),
        date_end: NaiveDate::from_ymd_opt(2006, 12, 31).unwrap(),
        daylight_delta_minutes: 60,
        start: TransitionRule::floating_date(time(2, 0, 0), 4, Occurrence::First, Weekday::Sun)
            .unwrap(),
        end: TransitionRule::floating_date(time(2, 0, 0), 10, Occurrence::Last, Weekday::Sun)
            .unwrap(),
    }
}

// ---------------------------------------------------------------------------
// Active rule selection
// ---------------------------------------------------------------------------

#[test]
fn active_rule_picks_rule_covering_year() {
    let rules = vec![old_us_rule(), us_rule(2007, 9999)];
    assert_eq!(active_rule(&rules, 2000), Some(&rules[0]));
    assert_eq!(active_rule(&rules, 2024), Some(&rules[1]));
    assert_eq!(active_rule(&rules, 1980), None);
}

#[test]
fn active_rule_boundaries_are_inclusive() {
    let rules = vec![us_rule(2007, 2010)];
    assert!(active_rule(&rules, 2007).is_some());
    assert!(active_rule(&rules, 2010).is_some());
    assert!(active_rule(&rules, 2011).is_none());
}

// ---------------------------------------------------------------------------
// Zone reports
// ---------------------------------------------------------------------------

#[test]
fn zone_with_active_rule_reports_both_transitions() {
    let report =
        build_zone_report(&zone("Eastern", -300, true), &[us_rule(2007, 9999)], 2024).unwrap();

    assert!(report.supports_daylight_saving_time);
    assert!(report.daylight_saving_time);
    assert_eq!(report.dst_offset, 60);
    assert_eq!(report.utc_offset, 300, "UTC offset is inverted");

    let start = report.daylight_transition_start.unwrap();
    assert_eq!(start.date_time, "2024-03-10T02:00:00");
    assert_eq!(start.week, 2);
    let end = report.daylight_transition_end.unwrap();
    assert_eq!(end.date_time, "2024-11-03T02:00:00");
    assert_eq!(end.week, 1);
}

#[test]
fn zone_without_rule_for_year_has_no_dst() {
    let report = build_zone_report(&zone("Eastern", -300, true), &[old_us_rule()], 2024).unwrap();

    assert!(report.supports_daylight_saving_time);
    assert!(!report.daylight_saving_time);
    assert_eq!(report.dst_offset, 0);
    assert!(report.daylight_transition_start.is_none());
    assert!(report.daylight_transition_end.is_none());
}

#[test]
fn zone_that_does_not_support_dst_ignores_rules() {
    let report = build_zone_report(&zone("Odd", 60, false), &[us_rule(2007, 9999)], 2024).unwrap();
    assert!(!report.supports_daylight_saving_time);
    assert!(!report.daylight_saving_time);
    assert_eq!(report.dst_offset, 0);
    assert_eq!(report.utc_offset, -60);
}

#[test]
fn unresolvable_active_rule_is_an_error() {
    let mut rule = us_rule(2007, 9999);
    rule.start = TransitionRule::Fixed {
        month: 2,
        day: 29,
        time_of_day: time(2, 0, 0),
    };
    let err = build_zone_report(&zone("Leap", 0, true), &[rule], 2023).unwrap_err();
    assert!(matches!(err, DstError::InvalidRule(_)));
}

#[test]
fn report_preserves_source_order() {
    let source = StaticSource::new(vec![
        ZoneEntry {
            zone: zone("B", 0, false),
            adjustment_rules: vec![],
        },
        ZoneEntry {
            zone: zone("A", -300, true),
            adjustment_rules: vec![us_rule(2007, 9999)],
        },
    ]);
    let reports = build_report(&source, 2024).unwrap();
    let ids: Vec<&str> = reports.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["B", "A"]);
}

// ---------------------------------------------------------------------------
// Sample zones
// ---------------------------------------------------------------------------

#[test]
fn sample_zones_resolve_fixed_rules() {
    let reports = build_report(&StaticSource::samples(), 2025).unwrap();
    assert_eq!(reports.len(), 2);

    let first = &reports[0];
    assert_eq!(first.id, "Dummy Fixed Rule Timezone");
    assert_eq!(first.display_name, "(UTC+01:00) Dummy Fixed Rule");
    assert_eq!(first.utc_offset, -60);
    assert_eq!(first.dst_offset, 60);
    let start = first.daylight_transition_start.as_ref().unwrap();
    assert_eq!(start.date_time, "2025-03-15T02:00:00");
    assert_eq!(start.day, 15);
    assert_eq!(start.week, 0);
    let end = first.daylight_transition_end.as_ref().unwrap();
    assert_eq!(end.date_time, "2025-10-25T03:00:00");
    assert_eq!(end.time_of_day, "03:00:00");

    let second = &reports[1];
    assert_eq!(second.id, "Dummy 2 Fixed Rule Timezone");
    let start = second.daylight_transition_start.as_ref().unwrap();
    assert_eq!(start.date_time, "2025-03-15T00:00:00");
    let end = second.daylight_transition_end.as_ref().unwrap();
    assert_eq!(end.date_time, "2025-10-26T00:00:00");
    assert_eq!(end.time_of_day, "00:00:00");
    assert_eq!(end.day, 26);
    assert_eq!(end.month, 10);
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

#[test]
fn json_uses_established_key_names() {
    let reports = build_report(&StaticSource::samples(), 2025).unwrap();
    let json: serde_json::Value = serde_json::from_str(&to_json(&reports, true).unwrap()).unwrap();
    let first = &json[0];

    for key in [
        "Id",
        "DisplayName",
        "StandardName",
        "DaylightName",
        "SupportsDaylightSavingTime",
        "DaylightSavingTime",
        "DSTOffset",
        "UTCOffset",
        "DaylightTransitionStart",
        "DaylightTransitionEnd",
    ] {
        assert!(first.get(key).is_some(), "missing key {}", key);
    }
    assert_eq!(first["UTCOffset"], -60);
    assert_eq!(first["DaylightTransitionEnd"]["IsFixedDateRule"], true);
    assert_eq!(first["DaylightTransitionEnd"]["TimeOfDay"], "03:00:00");
}

#[test]
fn json_without_dst_has_null_transitions() {
    let report = build_zone_report(&zone("UTC", 0, false), &[], 2025).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&to_json(&[report], false).unwrap()).unwrap();
    assert!(json[0]["DaylightTransitionStart"].is_null());
    assert!(json[0]["DaylightTransitionEnd"].is_null());
    assert_eq!(json[0]["DSTOffset"], 0);
}

#[test]
fn compact_json_is_single_line() {
    let reports = build_report(&StaticSource::samples(), 2025).unwrap();
    assert!(!to_json(&reports, false).unwrap().contains('\n'));
    assert!(to_json(&reports, true).unwrap().contains('\n'));
}

// ---------------------------------------------------------------------------
// JSON registry
// ---------------------------------------------------------------------------

#[test]
fn registry_document_loads_rules() {
    let json = r#"[
        {
            "id": "Test/Eastern",
            "displayName": "(UTC-05:00) Test Eastern",
            "standardName": "Eastern Standard Time",
            "daylightName": "Eastern Daylight Time",
            "baseUtcOffsetMinutes": -300,
            "supportsDst": true,
            "adjustmentRules": [
                {
                    "dateStart": "2007-01-01",
                    "dateEnd": "9999-12-31",
                    "daylightDeltaMinutes": 60,
                    "start": { "kind": "floating", "month": 3, "week": 2, "dayOfWeek": "Sun", "timeOfDay": "02:00:00" },
                    "end": { "kind": "floating", "month": 11, "week": 1, "dayOfWeek": "Sun", "timeOfDay": "02:00:00" }
                }
            ]
        },
        {
            "id": "Test/Tokyo",
            "displayName": "(UTC+09:00) Test Tokyo",
            "standardName": "Tokyo Standard Time",
            "daylightName": "Tokyo Daylight Time",
            "baseUtcOffsetMinutes": 540,
            "supportsDst": false
        }
    ]"#;

    let source = StaticSource::from_json(json).unwrap();
    assert_eq!(source.entries()[0].adjustment_rules, vec![us_rule(2007, 9999)]);
    assert!(source.entries()[1].adjustment_rules.is_empty());

    let reports = build_report(&source, 2024).unwrap();
    assert_eq!(
        reports[0].daylight_transition_start.as_ref().unwrap().date_time,
        "2024-03-10T02:00:00"
    );
    assert_eq!(reports[1].utc_offset, -540);
}

#[test]
fn registry_rejects_week_outside_legacy_range() {
    let json = r#"[{
        "id": "Bad", "displayName": "Bad", "standardName": "Bad", "daylightName": "Bad",
        "baseUtcOffsetMinutes": 0, "supportsDst": true,
        "adjustmentRules": [{
            "dateStart": "2000-01-01", "dateEnd": "2000-12-31", "daylightDeltaMinutes": 60,
            "start": { "kind": "floating", "month": 3, "week": 6, "dayOfWeek": "Sun", "timeOfDay": "02:00:00" },
            "end": { "kind": "fixed", "month": 10, "day": 1, "timeOfDay": "02:00:00" }
        }]
    }]"#;
    assert!(matches!(StaticSource::from_json(json), Err(DstError::Json(_))));
}
