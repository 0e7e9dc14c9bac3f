use timeline_rs::api::{TimelineEngine, TimelineEngineConfig};
use timeline_rs::core::{Dataset, Milestone, Period};

fn dataset() -> Dataset {
    Dataset::new(
        vec![
            Period::new(
                "first",
                vec![
                    Milestone::parse("f1", "1990-01-01").expect("f1"),
                    Milestone::parse("f2", "1992-01-01").expect("f2"),
                ],
            ),
            Period::new(
                "second",
                vec![
                    Milestone::parse("s1", "1991-01-01").expect("s1"),
                    Milestone::parse("s2", "1995-01-01").expect("s2"),
                ],
            ),
        ],
        vec![Milestone::parse("loose", "1993-06-01").expect("loose")],
    )
}

fn engine() -> TimelineEngine {
    let mut engine = TimelineEngine::new(TimelineEngineConfig::default(), 1200.0).expect("engine");
    engine.set_dataset(dataset()).expect("dataset");
    engine
}

#[test]
fn identical_inputs_yield_identical_layouts() {
    let mut engine = engine();
    let first = engine.layout().expect("first");
    let second = engine.layout().expect("second");
    assert_eq!(first, second);
    assert_eq!(
        first.to_json_pretty().expect("json"),
        second.to_json_pretty().expect("json")
    );

    let stats = engine.cache_stats();
    assert_eq!(stats.time_range_computations, 1);
    assert_eq!(stats.scale_computations, 1);
    assert_eq!(stats.lane_computations, 1);
    assert_eq!(stats.cluster_computations, 2);
    assert_eq!(stats.graduation_computations, 1);
    assert!(stats.hits >= 5);
}

#[test]
fn scrolling_only_recomputes_graduations() {
    let mut engine = engine();
    engine.layout().expect("initial");
    engine.set_scroll_offset(300.0).expect("scroll");
    engine.layout().expect("scrolled");

    let stats = engine.cache_stats();
    assert_eq!(stats.scale_computations, 1);
    assert_eq!(stats.lane_computations, 1);
    assert_eq!(stats.cluster_computations, 2);
    assert_eq!(stats.graduation_computations, 2);
}

#[test]
fn zoom_recomputes_scale_clusters_and_graduations_but_not_lanes() {
    let mut engine = engine();
    engine.layout().expect("initial");
    engine.set_zoom(3.0).expect("zoom");
    engine.layout().expect("zoomed");

    let stats = engine.cache_stats();
    assert_eq!(stats.time_range_computations, 1);
    assert_eq!(stats.scale_computations, 2);
    assert_eq!(stats.lane_computations, 1);
    assert_eq!(stats.cluster_computations, 4);
    assert_eq!(stats.graduation_computations, 2);
}

#[test]
fn replacing_one_period_reclusters_only_that_period() {
    let mut engine = engine();
    engine.layout().expect("initial");

    let mut edited = dataset();
    edited.periods[1]
        .milestones
        .push(Milestone::parse("s3", "1994-01-01").expect("s3"));
    engine.set_dataset(edited).expect("edited");
    let layout = engine.layout().expect("edited layout");

    let stats = engine.cache_stats();
    assert_eq!(stats.time_range_computations, 2);
    // s3 falls inside the existing span of "second".
    assert_eq!(stats.lane_computations, 1);
    assert_eq!(stats.cluster_computations, 3);
    let second = layout.period("second").expect("second");
    assert_eq!(
        second
            .items
            .iter()
            .map(|item| item.milestone_names().count())
            .sum::<usize>(),
        3
    );
}

#[test]
fn stretching_a_period_span_reassigns_lanes() {
    let mut engine = engine();
    let before = engine.layout().expect("initial");
    assert_eq!(before.lane_count, 2);

    let mut edited = dataset();
    edited.periods[0]
        .milestones
        .push(Milestone::parse("f3", "1989-01-01").expect("f3"));
    edited.periods[1].milestones[0] = Milestone::parse("s1", "1993-01-01").expect("s1");
    engine.set_dataset(edited).expect("edited");
    let after = engine.layout().expect("edited layout");

    assert_eq!(engine.cache_stats().lane_computations, 2);
    assert_eq!(after.lane_count, 1);
    assert_eq!(after.period("first").expect("first").lane, 1);
    assert_eq!(after.period("second").expect("second").lane, 1);
}

#[test]
fn clearing_the_dataset_reports_no_data() {
    let mut engine = engine();
    assert!(engine.layout().expect("layout").is_ready());
    engine.clear_dataset();
    assert!(engine.dataset().is_none());
    let layout = engine.layout().expect("layout");
    assert!(!layout.is_ready());
    assert!(layout.periods.is_empty());
}
