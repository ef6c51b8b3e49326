//! # dst-engine
//!
//! Resolve symbolic daylight-saving-time rules into concrete transition dates.
//!
//! Timezone registries describe DST with rules such as "second Sunday of March
//! at 02:00" or "October 25th at 24:00". This crate computes the exact date
//! each rule fires on in a given year and produces a normalized, serializable
//! record per timezone for display, scheduling and cross-platform comparison.
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::{NaiveTime, Weekday};
//! use dst_engine::{describe, Occurrence, TransitionRule};
//!
//! let two_am = NaiveTime::from_hms_opt(2, 0, 0).unwrap();
//! let rule = TransitionRule::floating_date(two_am, 3, Occurrence::Second, Weekday::Sun).unwrap();
//! let d = describe(2024, &rule).unwrap();
//! assert_eq!(d.date_time, "2024-03-10T02:00:00");
//! assert_eq!(d.day, 7); // Sunday
//! assert_eq!(d.week, 2);
//! ```
//!
//! ## Modules
//!
//! - [`rule`] — Fixed and floating transition rules
//! - [`resolver`] — Rule + year → concrete date/time
//! - [`descriptor`] — Resolved transition → display record
//! - [`zone`] — Zone registry model and the `ZoneSource` capability
//! - [`tzdb`] — `ZoneSource` derived from the IANA database via `chrono-tz`
//! - [`report`] — Per-timezone report and JSON output
//! - [`error`] — Error types

pub mod descriptor;
pub mod error;
pub mod report;
pub mod resolver;
pub mod rule;
pub mod tzdb;
pub mod zone;

pub use descriptor::{describe, TransitionDescriptor};
pub use error::{DstError, Result};
pub use report::{build_report, to_json, ZoneReport};
pub use resolver::{resolve, ResolvedTransition};
pub use rule::{Occurrence, TransitionRule, END_OF_DAY};
pub use tzdb::TzdbSource;
pub use zone::{AdjustmentRule, StaticSource, ZoneDescriptor, ZoneEntry, ZoneSource};
