use std::sync::Arc;

use proptest::prelude::*;
use tschart::api::{
    FormattedValue, TimeAxisRequest, TimeZoneSpec, ValueAxisStyle, ValueFormatterFn,
    format_time_ago, format_time_labels, plan_time_axis_ticks, plan_value_axis_ticks,
    select_increment, time_axis_tick_spacing_px, value_axis_tick_spacing_px,
};
use tschart::core::TimeUnit;

// 2024-01-15T00:00:00Z
const JAN_15_MIDNIGHT_MS: f64 = 1_705_276_800_000.0;
const HOUR_MS: f64 = 3_600_000.0;
const DAY_MS: f64 = 86_400_000.0;

#[test]
fn increment_table_boundaries() {
    assert_eq!(select_increment(0.0).increment_ms, 1_000.0);
    assert_eq!(select_increment(1.0).increment_ms, 1_000.0);
    assert_eq!(select_increment(31.0).unit, TimeUnit::Minute);
    let hour = select_increment(3_000.0);
    assert_eq!((hour.unit, hour.multiplier), (TimeUnit::Hour, 1));
    let week = select_increment(5.0 * 86_400.0);
    assert_eq!((week.unit, week.multiplier), (TimeUnit::Day, 7));
    let month = select_increment(20.0 * 86_400.0);
    assert_eq!((month.unit, month.multiplier), (TimeUnit::Month, 1));
}

#[test]
fn tick_spacing_bands() {
    assert_eq!(time_axis_tick_spacing_px(399.0), 100.0);
    assert_eq!(time_axis_tick_spacing_px(400.0), 150.0);
    assert_eq!(time_axis_tick_spacing_px(800.0), 250.0);

    assert_eq!(value_axis_tick_spacing_px(100.0), 30.0);
    assert_eq!(value_axis_tick_spacing_px(150.0), 35.0);
    assert_eq!(value_axis_tick_spacing_px(200.0), 45.0);
    assert_eq!(value_axis_tick_spacing_px(250.0), 55.0);
    assert_eq!(value_axis_tick_spacing_px(300.0), 60.0);
    assert_eq!(value_axis_tick_spacing_px(301.0), 70.0);
}

#[test]
fn intraday_labels_follow_increment_precision() {
    let split = JAN_15_MIDNIGHT_MS + 13.0 * HOUR_MS + 5.0 * 60_000.0 + 7_250.0;
    let utc = TimeZoneSpec::Utc;
    assert_eq!(format_time_labels(&[split], HOUR_MS, DAY_MS, utc), vec!["13:05"]);
    assert_eq!(format_time_labels(&[split], 10_000.0, DAY_MS, utc), vec!["13:05:07"]);
    assert_eq!(format_time_labels(&[split], 500.0, DAY_MS, utc), vec!["13:05:07.250"]);
}

#[test]
fn midnight_shows_the_date_unless_seconds_are_visible() {
    let utc = TimeZoneSpec::Utc;
    assert_eq!(
        format_time_labels(&[JAN_15_MIDNIGHT_MS], 6.0 * HOUR_MS, 2.0 * DAY_MS, utc),
        vec!["Jan 15"]
    );
    assert_eq!(
        format_time_labels(&[JAN_15_MIDNIGHT_MS], 30_000.0, HOUR_MS, utc),
        vec!["00:00:00"]
    );
}

#[test]
fn midnight_is_checked_in_the_configured_zone() {
    let plus_two = TimeZoneSpec::parse("+02:00").expect("offset zone");
    let local_midnight = JAN_15_MIDNIGHT_MS - 2.0 * HOUR_MS;
    assert_eq!(
        format_time_labels(&[local_midnight], HOUR_MS, DAY_MS, plus_two),
        vec!["Jan 15"]
    );
    assert_eq!(
        format_time_labels(&[local_midnight], HOUR_MS, DAY_MS, TimeZoneSpec::Utc),
        vec!["22:00"]
    );
}

#[test]
fn month_increments_label_month_starts_with_the_year() {
    let month = select_increment(20.0 * 86_400.0).increment_ms;
    // 2024-02-01T00:00:00Z and 2024-02-15T00:00:00Z
    let feb_first = 1_706_745_600_000.0;
    let feb_fifteenth = feb_first + 14.0 * DAY_MS;
    assert_eq!(
        format_time_labels(&[feb_first, feb_fifteenth], month, 120.0 * DAY_MS, TimeZoneSpec::Utc),
        vec!["Feb 2024", "Feb 15"]
    );
}

#[test]
fn yearly_and_multi_year_increments() {
    let utc = TimeZoneSpec::Utc;
    let year = select_increment(300.0 * 86_400.0);
    assert_eq!(year.unit, TimeUnit::Year);
    assert_eq!(
        format_time_labels(&[JAN_15_MIDNIGHT_MS], year.increment_ms, 0.0, utc),
        vec!["2024"]
    );
    let decade = select_increment(8.0 * 365.0 * 86_400.0);
    assert_eq!(
        format_time_labels(&[JAN_15_MIDNIGHT_MS], decade.increment_ms, 0.0, utc),
        vec!["01/15"]
    );
}

#[test]
fn time_ago_phrases() {
    let now = JAN_15_MIDNIGHT_MS;
    assert_eq!(format_time_ago(now - 10_000.0, now), "a few seconds ago");
    assert_eq!(format_time_ago(now - 15.0 * 60_000.0, now), "15 minutes ago");
    assert_eq!(format_time_ago(now - 5.0 * HOUR_MS, now), "5 hours ago");
    assert_eq!(format_time_ago(now - 3.0 * DAY_MS, now), "3 days ago");
    assert_eq!(format_time_ago(now - 90.0 * DAY_MS, now), "3 months ago");
    assert_eq!(format_time_ago(now - 400.0 * DAY_MS, now), "a year ago");
    assert_eq!(format_time_ago(now - 1_000.0 * DAY_MS, now), "3 years ago");
}

#[test]
fn hourly_ticks_align_to_local_wall_clock() {
    let zone = TimeZoneSpec::parse("+05:30").expect("offset zone");
    let min = JAN_15_MIDNIGHT_MS / 1_000.0;
    let ticks = plan_time_axis_ticks(TimeAxisRequest {
        min_seconds: min,
        max_seconds: min + 12.0 * 3_600.0,
        plot_width_px: 600.0,
        zone,
        relative: false,
        now_ms: 0.0,
    });
    let increment = ticks.increment.expect("absolute axis increment");
    assert_eq!(increment.unit, TimeUnit::Hour);
    assert!(ticks.labels.iter().all(|label| label.ends_with(":00")));
    assert_eq!(ticks.splits.len(), ticks.labels.len());
}

#[test]
fn value_ticks_cover_range_on_nice_steps() {
    let formatter: ValueFormatterFn =
        Arc::new(|value: f64| FormattedValue::new(format!("{value}"), " ms "));
    let ticks = plan_value_axis_ticks(0.0, 200.0, 240.0, &formatter, ValueAxisStyle::default());
    // 240px / 55px -> 4 intervals -> rough 50 -> step 50
    assert_eq!(ticks.step, 50.0);
    assert_eq!(ticks.values, vec![0.0, 50.0, 100.0, 150.0, 200.0]);
    assert_eq!(ticks.labels[4], "200ms");
    assert!(ticks.size_px > ValueAxisStyle::default().tick_size_px);
}

#[test]
fn degenerate_value_range_yields_single_tick() {
    let formatter: ValueFormatterFn = Arc::new(|value: f64| FormattedValue::new(value.to_string(), ""));
    let ticks = plan_value_axis_ticks(5.0, 5.0, 200.0, &formatter, ValueAxisStyle::default());
    assert_eq!(ticks.values, vec![5.0]);
}

proptest! {
    #[test]
    fn select_increment_is_monotonic(a in 0.0f64..5e9, b in 0.0f64..5e9) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(select_increment(low).increment_ms <= select_increment(high).increment_ms);
    }

    #[test]
    fn selected_increment_covers_target_below_a_century(target in 0.0f64..3e9) {
        prop_assert!(select_increment(target).increment_ms >= target * 1_000.0);
    }

    #[test]
    fn absolute_ticks_stay_inside_the_range(
        min in 1.6e9f64..1.8e9,
        span in 60.0f64..4e7,
        width in 100.0f64..2_000.0
    ) {
        let ticks = plan_time_axis_ticks(TimeAxisRequest {
            min_seconds: min,
            max_seconds: min + span,
            plot_width_px: width,
            zone: TimeZoneSpec::Utc,
            relative: false,
            now_ms: 0.0,
        });
        prop_assert!(ticks.splits.iter().all(|split| *split >= min - 1e-6 && *split <= min + span));
        prop_assert!(ticks.splits.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
