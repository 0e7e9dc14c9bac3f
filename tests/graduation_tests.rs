use std::sync::Arc;

use chrono::{Datelike, NaiveDate, TimeZone, Utc};
use timeline_rs::api::{TimelineEngine, TimelineEngineConfig};
use timeline_rs::core::{
    CalendarLocale, Dataset, Milestone, MonthNameFormat, MonthNameLookup, TimeRange, TimeScale,
};
use timeline_rs::layout::{
    GraduationConfig, GraduationLabel, GraduationTier, ReferenceWidths, generate_graduations,
};

const DAY_MS: f64 = 86_400_000.0;

fn range(start: (i32, u32, u32), end: (i32, u32, u32)) -> TimeRange {
    TimeRange::new(
        Utc.with_ymd_and_hms(start.0, start.1, start.2, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(end.0, end.1, end.2, 0, 0, 0).unwrap(),
    )
    .expect("range")
}

#[test]
fn one_year_window_at_high_zoom_labels_new_year_fully() {
    let window = range((2001, 1, 1), (2001, 12, 31));
    let scale = TimeScale::new(window.earliest, DAY_MS / 40.0).expect("scale");
    let ticks = generate_graduations(
        window,
        scale,
        GraduationConfig::default(),
        &CalendarLocale::EnUs,
    )
    .expect("ticks");

    assert_eq!(ticks.len(), 365);
    let new_year = &ticks[0];
    assert_eq!(new_year.tier, GraduationTier::Year);
    assert_eq!(
        new_year.labels.as_slice(),
        [
            GraduationLabel::Year {
                year: 2001,
                decade: false
            },
            GraduationLabel::Month {
                month: 1,
                format: MonthNameFormat::Long,
                text: "January".to_owned()
            },
            GraduationLabel::Day { day: 1 },
        ]
    );
    let month_ticks = ticks
        .iter()
        .filter(|t| t.tier == GraduationTier::Month)
        .count();
    assert_eq!(month_ticks, 11);
}

#[test]
fn month_ticks_follow_true_month_lengths() {
    // 2 px per day: months tick (56 px reference), days do not.
    let window = range((2004, 1, 15), (2004, 4, 15));
    let scale = TimeScale::new(window.earliest, DAY_MS / 2.0).expect("scale");
    let ticks = generate_graduations(
        window,
        scale,
        GraduationConfig::default(),
        &CalendarLocale::EnUs,
    )
    .expect("ticks");

    let dates: Vec<NaiveDate> = ticks.iter().map(|t| t.date).collect();
    assert_eq!(
        dates,
        [
            NaiveDate::from_ymd_opt(2004, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2004, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2004, 4, 1).unwrap(),
        ]
    );
    // Leap February: March 1 sits 29 days (58 px) after February 1.
    assert!((ticks[1].x_px - ticks[0].x_px - 58.0).abs() <= 1e-9);
    assert!(matches!(
        ticks[0].labels.as_slice(),
        [GraduationLabel::Month {
            format: MonthNameFormat::Short,
            ..
        }]
    ));
}

#[test]
fn walker_matches_a_plain_day_by_day_scan() {
    let window = range((1998, 11, 20), (2002, 2, 10));
    let config = GraduationConfig::default();
    for ms_per_px in [DAY_MS / 20.0, DAY_MS / 2.0, DAY_MS, 30.0 * DAY_MS] {
        let scale = TimeScale::new(window.earliest, ms_per_px).expect("scale");
        let widths = ReferenceWidths::at(scale).expect("widths");
        let ticks =
            generate_graduations(window, scale, config, &CalendarLocale::EnUs).expect("ticks");

        let mut expected = Vec::new();
        let mut day = window.earliest.date_naive();
        while day <= window.latest.date_naive() {
            let new_year = day.month() == 1 && day.day() == 1;
            let new_month = day.day() == 1 && widths.month_px > config.month_tick_min_px;
            if new_year || new_month || widths.day_px > config.day_tick_min_px {
                expected.push(day);
            }
            day = day.succ_opt().expect("next day");
        }
        let actual: Vec<NaiveDate> = ticks.iter().map(|t| t.date).collect();
        assert_eq!(actual, expected, "scale {ms_per_px}");
    }
}

struct Numbered;

impl MonthNameLookup for Numbered {
    fn month_names(&self, format: MonthNameFormat) -> [String; 12] {
        std::array::from_fn(|index| format!("{format:?}-{}", index + 1))
    }
}

#[test]
fn engine_uses_month_name_override() {
    let mut engine = TimelineEngine::new(TimelineEngineConfig::default(), 1000.0).expect("engine");
    engine
        .set_dataset(Dataset::new(
            Vec::new(),
            vec![
                Milestone::parse("a", "2001-01-01").expect("a"),
                Milestone::parse("b", "2001-06-30").expect("b"),
            ],
        ))
        .expect("dataset");

    let month_text = |engine: &mut TimelineEngine| -> Vec<String> {
        engine
            .layout()
            .expect("layout")
            .graduations
            .iter()
            .flat_map(|g| g.labels.iter())
            .filter_map(|label| match label {
                GraduationLabel::Month { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    };

    let default_names = month_text(&mut engine);
    assert_eq!(default_names.first().map(String::as_str), Some("January"));

    engine.set_month_name_lookup(Arc::new(Numbered));
    let custom = month_text(&mut engine);
    assert_eq!(custom.first().map(String::as_str), Some("Long-1"));
    assert_eq!(custom.len(), default_names.len());

    engine.clear_month_name_lookup();
    assert_eq!(month_text(&mut engine), default_names);
}

#[test]
fn locale_config_switches_built_in_tables() {
    let config = TimelineEngineConfig::default().with_graduations(GraduationConfig {
        locale: CalendarLocale::EsEs,
        ..GraduationConfig::default()
    });
    let mut engine = TimelineEngine::new(config, 1000.0).expect("engine");
    engine
        .set_dataset(Dataset::new(
            Vec::new(),
            vec![
                Milestone::parse("a", "2001-01-01").expect("a"),
                Milestone::parse("b", "2001-06-30").expect("b"),
            ],
        ))
        .expect("dataset");
    let layout = engine.layout().expect("layout");
    assert!(layout.graduations.iter().any(|g| g.labels.iter().any(
        |label| matches!(label, GraduationLabel::Month { text, .. } if text == "enero")
    )));
}

#[test]
fn window_past_the_range_yields_no_graduations() {
    let mut engine = TimelineEngine::new(TimelineEngineConfig::default(), 500.0).expect("engine");
    engine
        .set_dataset(Dataset::new(
            Vec::new(),
            vec![
                Milestone::parse("a", "1990-01-01").expect("a"),
                Milestone::parse("b", "2000-01-01").expect("b"),
            ],
        ))
        .expect("dataset");
    engine.set_scroll_offset(5_000.0).expect("scroll");
    let layout = engine.layout().expect("layout");
    assert!(layout.is_ready());
    assert!(layout.graduations.is_empty());
}

#[test]
fn huge_scroll_offset_still_lays_out_without_graduations() {
    let mut engine = TimelineEngine::new(TimelineEngineConfig::default(), 500.0).expect("engine");
    engine
        .set_dataset(Dataset::new(
            Vec::new(),
            vec![
                Milestone::parse("a", "1990-01-01").expect("a"),
                Milestone::parse("b", "2000-01-01").expect("b"),
            ],
        ))
        .expect("dataset");
    engine.set_scroll_offset(1.0e12).expect("scroll");
    let layout = engine.layout().expect("layout");
    assert!(layout.is_ready());
    assert!(layout.graduations.is_empty());
    assert_eq!(layout.isolated_milestones.len(), 2);
}
