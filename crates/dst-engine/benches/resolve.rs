use std::hint::black_box;

use chrono::{NaiveTime, Weekday};
use criterion::{criterion_group, criterion_main, Criterion};
use dst_engine::{build_report, describe, Occurrence, TransitionRule, TzdbSource};

fn bench_describe(c: &mut Criterion) {
    let two_am = NaiveTime::from_hms_opt(2, 0, 0).unwrap();
    let last_sunday =
        TransitionRule::floating_date(two_am, 10, Occurrence::Last, Weekday::Sun).unwrap();
    let second_sunday =
        TransitionRule::floating_date(two_am, 3, Occurrence::Second, Weekday::Sun).unwrap();

    c.bench_function("describe_last_sunday_400_years", |b| {
        b.iter(|| {
            for year in 1800..2200 {
                black_box(describe(black_box(year), &last_sunday).unwrap());
            }
        })
    });

    c.bench_function("describe_second_sunday_400_years", |b| {
        b.iter(|| {
            for year in 1800..2200 {
                black_box(describe(black_box(year), &second_sunday).unwrap());
            }
        })
    });
}

fn bench_tzdb_report(c: &mut Criterion) {
    let source = TzdbSource::with_zones(2025, &["America/New_York", "Europe/Berlin"]).unwrap();
    c.bench_function("tzdb_report_two_zones", |b| {
        b.iter(|| black_box(build_report(&source, 2025).unwrap()))
    });
}

criterion_group!(benches, bench_describe, bench_tzdb_report);
criterion_main!(benches);
