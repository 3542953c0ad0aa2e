use pretty_assertions::assert_eq;
use winlog_timeline::parser::schema::NormalizedEvent;
use winlog_timeline::store::TimelineStore;
use winlog_timeline::utils::error::FilterError;

fn events(source: &str, timestamps: &[f64]) -> Vec<NormalizedEvent> {
    timestamps
        .iter()
        .map(|&ts| NormalizedEvent::from_timestamp(source, ts))
        .collect()
}

fn working_timestamps(store: &TimelineStore, source: &str) -> Vec<Option<f64>> {
    store
        .get(source)
        .unwrap()
        .working()
        .iter()
        .map(|ev| ev.timestamp_epoch)
        .collect()
}

#[test]
fn test_set_span_keeps_order_preserving_subsequence() {
    let mut store = TimelineStore::new();
    store.add("EVTX:sys", events("EVTX:sys", &[10.0, 20.0, 30.0, 40.0, 50.0]));

    let kept = store.set_span("EVTX:sys", 20.0, 40.0).unwrap();
    assert_eq!(kept, 3);
    assert_eq!(
        working_timestamps(&store, "EVTX:sys"),
        vec![Some(20.0), Some(30.0), Some(40.0)]
    );
    // Original untouched
    assert_eq!(store.get("EVTX:sys").unwrap().original().len(), 5);
}

#[test]
fn test_set_span_excludes_untimestamped_events() {
    let mut store = TimelineStore::new();
    let mut evs = events("a", &[10.0, 20.0]);
    evs.insert(1, NormalizedEvent::new("a"));
    store.add("a", evs);

    store.set_span("a", 0.0, 100.0).unwrap();
    assert_eq!(working_timestamps(&store, "a"), vec![Some(10.0), Some(20.0)]);
}

#[test]
fn test_invalid_span_leaves_working_unchanged() {
    let mut store = TimelineStore::new();
    store.add("a", events("a", &[10.0, 20.0, 30.0]));
    store.set_span("a", 15.0, 100.0).unwrap();

    let before = working_timestamps(&store, "a");
    let err = store.set_span("a", 50.0, 50.0).unwrap_err();
    assert_eq!(
        err,
        FilterError::InvalidRange {
            start: 50.0,
            end: 50.0
        }
    );
    assert_eq!(working_timestamps(&store, "a"), before);
}

#[test]
fn test_reset_span_restores_original() {
    let mut store = TimelineStore::new();
    store.add("a", events("a", &[10.0, 20.0, 30.0]));
    store.set_span("a", 25.0, 35.0).unwrap();
    assert_eq!(working_timestamps(&store, "a"), vec![Some(30.0)]);

    store.reset_span("a").unwrap();
    assert_eq!(
        working_timestamps(&store, "a"),
        vec![Some(10.0), Some(20.0), Some(30.0)]
    );

    assert_eq!(
        store.reset_span("missing"),
        Err(FilterError::UnknownSource("missing".to_string()))
    );
}

#[test]
fn test_add_overwrites_instead_of_merging() {
    let mut store = TimelineStore::new();
    store.add("a", events("a", &[1.0, 2.0]));
    store.set_span("a", 1.5, 3.0).unwrap();

    store.add("a", events("a", &[100.0]));
    assert_eq!(store.get("a").unwrap().original().len(), 1);
    assert_eq!(working_timestamps(&store, "a"), vec![Some(100.0)]);
}

#[test]
fn test_remove_unknown_source_is_noop() {
    let mut store = TimelineStore::new();
    store.add("a", events("a", &[1.0]));
    store.remove("missing");
    store.remove("a");
    store.remove("a");
    assert!(store.is_empty());
}

#[test]
fn test_bounds_follow_working_set() {
    let mut store = TimelineStore::new();
    store.add("a", events("a", &[10.0, 50.0, 90.0]));
    assert_eq!(store.bounds("a"), Some((10.0, 90.0)));

    store.set_span("a", 40.0, 60.0).unwrap();
    assert_eq!(store.bounds("a"), Some((50.0, 50.0)));

    store.set_span("a", 60.0, 80.0).unwrap();
    assert_eq!(store.bounds("a"), None);
}
