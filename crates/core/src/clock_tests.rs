// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn parse(ts: &str) -> DateTime<FixedOffset> {
    ts.parse().unwrap()
}

#[test]
fn format_ts_renders_microsecond_precision() {
    let ts = parse("2026-03-01T10:02:03.123456+00:00");
    assert_eq!(format_ts(&ts), "2026-03-01 10:02:03.123456");
}

#[test]
fn format_ts_pads_whole_seconds() {
    let ts = parse("2026-03-01T10:02:03+00:00");
    assert_eq!(format_ts(&ts), "2026-03-01 10:02:03.000000");
}

#[test]
fn format_ts_renders_in_the_timestamp_offset() {
    let ts = parse("2026-03-01T10:00:00+02:00");
    assert_eq!(format_ts(&ts), "2026-03-01 10:00:00.000000");
}

#[test]
fn system_clock_returns_increasing_time() {
    let clock = SystemClock;
    let t1 = clock.now();
    std::thread::sleep(std::time::Duration::from_millis(1));
    let t2 = clock.now();
    assert!(t2 > t1);
}

#[test]
fn fixed_offset_clock_reports_its_offset() {
    let offset = FixedOffset::east_opt(2 * 3600).unwrap();
    let clock = FixedOffsetClock::new(offset);
    assert_eq!(clock.now().offset(), &offset);
}

#[test]
fn fake_clock_can_be_advanced() {
    let clock = FakeClock::new();
    let t1 = clock.now();
    clock.advance(Duration::seconds(60));
    assert_eq!(clock.now() - t1, Duration::seconds(60));
}

#[test]
fn fake_clock_can_be_set() {
    let clock = FakeClock::new();
    let target = parse("2026-03-01T10:00:00+00:00");
    clock.set(target);
    assert_eq!(clock.now(), target);
}

#[test]
fn fake_clock_is_cloneable_and_shared() {
    let clock1 = FakeClock::new();
    let clock2 = clock1.clone();
    let t1 = clock1.now();
    clock2.advance(Duration::seconds(30));
    assert_eq!(clock1.now() - t1, Duration::seconds(30));
}
