use timeline_rs::api::{TimelineEngine, TimelineEngineConfig};
use timeline_rs::core::{Dataset, Milestone, Period};
use timeline_rs::error::TimelineError;
use timeline_rs::layout::assign_period_lanes;

fn period(name: &str, start: &str, end: &str) -> Period {
    Period::new(
        name,
        vec![
            Milestone::parse(format!("{name} start"), start).expect("start"),
            Milestone::parse(format!("{name} end"), end).expect("end"),
        ],
    )
}

#[test]
fn overlapping_periods_get_distinct_lanes_and_disjoint_reuse() {
    let periods = vec![
        period("P1", "1990-01-01", "1995-01-01"),
        period("P2", "1993-01-01", "1998-01-01"),
        period("P3", "2000-01-01", "2001-01-01"),
    ];
    let lanes = assign_period_lanes(&periods).expect("lanes");
    assert_ne!(lanes.lane("P1"), lanes.lane("P2"));
    assert_eq!(lanes.lane("P3"), Some(1));
    assert_eq!(lanes.lane_count(), 2);
}

#[test]
fn touching_endpoints_count_as_overlap() {
    let periods = vec![
        period("before", "1990-01-01", "1995-01-01"),
        period("after", "1995-01-01", "1999-01-01"),
    ];
    let lanes = assign_period_lanes(&periods).expect("lanes");
    assert_eq!(lanes.lane("before"), Some(1));
    assert_eq!(lanes.lane("after"), Some(2));
}

#[test]
fn assignment_follows_input_order() {
    // Chain a-b-c where a and c are disjoint.
    let a = period("a", "2000-01-01", "2000-03-01");
    let b = period("b", "2000-02-01", "2000-05-01");
    let c = period("c", "2000-04-01", "2000-06-01");

    let forward = assign_period_lanes(&[a.clone(), b.clone(), c.clone()]).expect("forward");
    assert_eq!(forward.lane_count(), 2);
    assert_eq!(forward.lane("c"), Some(1));

    let reordered = assign_period_lanes(&[a, c, b]).expect("reordered");
    assert_eq!(reordered.lane("c"), Some(1));
    assert_eq!(reordered.lane("b"), Some(2));
    let order: Vec<&str> = reordered.iter().map(|(name, _)| name).collect();
    assert_eq!(order, ["a", "c", "b"]);
}

#[test]
fn single_milestone_period_is_a_point_interval() {
    let periods = vec![
        Period::new(
            "flash",
            vec![Milestone::parse("f", "1990-06-01").expect("f")],
        ),
        period("span", "1990-01-01", "1991-01-01"),
    ];
    let lanes = assign_period_lanes(&periods).expect("lanes");
    assert_eq!(lanes.lane("flash"), Some(1));
    assert_eq!(lanes.lane("span"), Some(2));
}

#[test]
fn duplicate_period_names_are_rejected() {
    let periods = vec![
        period("same", "1990-01-01", "1991-01-01"),
        period("same", "2000-01-01", "2001-01-01"),
    ];
    assert!(matches!(
        assign_period_lanes(&periods),
        Err(TimelineError::InvalidData(_))
    ));
}

#[test]
fn engine_reports_lane_per_period_and_skips_empty_ones() {
    let mut engine = TimelineEngine::new(TimelineEngineConfig::default(), 900.0).expect("engine");
    engine
        .set_dataset(Dataset::new(
            vec![
                period("P1", "1990-01-01", "1995-01-01"),
                Period::new("blank", Vec::new()),
                period("P2", "1993-01-01", "1998-01-01"),
                period("P3", "2000-01-01", "2001-01-01"),
            ],
            Vec::new(),
        ))
        .expect("dataset");
    let layout = engine.layout().expect("layout");

    assert_eq!(layout.lane_count, 2);
    assert_eq!(layout.period("P1").map(|p| p.lane), Some(1));
    assert_eq!(layout.period("P2").map(|p| p.lane), Some(2));
    assert_eq!(layout.period("P3").map(|p| p.lane), Some(1));
    assert!(layout.period("blank").is_none());
    assert_eq!(layout.empty_periods, ["blank"]);
}
