use super::*;

/// Build a record with synthetic relative times; the key only needs to be
/// unique within a test catalog.
fn rec(
    network: &str,
    station: &str,
    channel: &str,
    tag: &str,
    start_time: f64,
    end_time: f64,
) -> SegmentRecord {
    SegmentRecord {
        network: network.to_string(),
        station: station.to_string(),
        location: String::new(),
        channel: channel.to_string(),
        tag: tag.to_string(),
        start_time,
        end_time,
        key: format!("{network}.{station}..{channel}__{start_time}__{end_time}__{tag}"),
    }
}

fn index(records: Vec<SegmentRecord>) -> WaveformIndex {
    WaveformIndex::new(Catalog::from_records(records))
}

#[test]
fn test_query_wildcards_match_everything() {
    let idx = index(vec![
        rec("AU", "XYZ", "BHZ", "raw_recording", 0.0, 100.0),
        rec("OA", "BY22", "HHZ", "earthquake", 50.0, 150.0),
    ]);

    let hits = idx.query_by_time(&TimeQuery::window(0.0, 200.0));
    assert_eq!(hits.len(), 2);
}

#[test]
fn test_query_filters_each_dimension() {
    let idx = index(vec![
        rec("AU", "XYZ", "BHZ", "raw_recording", 0.0, 100.0),
        rec("AU", "XYZ", "BHN", "raw_recording", 0.0, 100.0),
        rec("AU", "ABC", "BHZ", "raw_recording", 0.0, 100.0),
        rec("OA", "XYZ", "BHZ", "earthquake", 0.0, 100.0),
    ]);

    let query = TimeQuery::window(0.0, 100.0)
        .networks(Filter::exactly("AU"))
        .stations(Filter::exactly("XYZ"))
        .channels(Filter::one_of(["BHZ", "BHN"]))
        .tags(Filter::exactly("raw_recording"));
    let hits = idx.query_by_time(&query);
    assert_eq!(hits.len(), 2);
    for hit in hits.values() {
        assert_eq!(hit.new_network, "AU");
        assert_eq!(hit.new_station, "XYZ");
    }
}

#[test]
fn test_empty_one_of_matches_nothing() {
    let idx = index(vec![rec("AU", "XYZ", "BHZ", "raw_recording", 0.0, 100.0)]);

    let query = TimeQuery::window(0.0, 100.0).channels(Filter::one_of(Vec::<String>::new()));
    assert!(idx.query_by_time(&query).is_empty());
}

#[test]
fn test_overlap_is_strict() {
    let idx = index(vec![rec("AU", "XYZ", "BHZ", "raw_recording", 100.0, 200.0)]);

    // Windows that merely touch the segment boundary do not match.
    assert!(idx.query_by_time(&TimeQuery::window(0.0, 100.0)).is_empty());
    assert!(idx.query_by_time(&TimeQuery::window(200.0, 300.0)).is_empty());

    assert_eq!(idx.query_by_time(&TimeQuery::window(0.0, 101.0)).len(), 1);
    assert_eq!(idx.query_by_time(&TimeQuery::window(199.0, 300.0)).len(), 1);
    assert_eq!(idx.query_by_time(&TimeQuery::window(150.0, 160.0)).len(), 1);
}

#[test]
fn test_query_match_carries_remap_fields() {
    let idx = index(vec![rec("AU", "XYZ", "BHZ", "raw_recording", 0.0, 100.0)]);

    let hits = idx.query_by_time(&TimeQuery::window(0.0, 100.0));
    let (key, hit) = hits.iter().next().unwrap();
    assert_eq!(&hit.key, key);
    assert_eq!(hit.new_network, "AU");
    assert_eq!(hit.new_station, "XYZ");
    assert_eq!(hit.new_channel, "BHZ");
    assert_eq!(hit.new_location, "");
}

#[test]
fn test_intervals_merge_overlapping_and_touching() {
    // [0,50] and [50,120] touch, [200,250] stands alone.
    let idx = index(vec![
        rec("AU", "XYZ", "BHZ", "raw_recording", 50.0, 120.0),
        rec("AU", "XYZ", "BHZ", "raw_recording", 0.0, 50.0),
        rec("AU", "XYZ", "BHZ", "raw_recording", 200.0, 250.0),
    ]);

    let intervals = idx.recording_intervals("AU", "XYZ", "BHZ", "raw_recording");
    assert_eq!(
        intervals,
        vec![
            RecordingInterval { start: 0.0, end: 120.0 },
            RecordingInterval { start: 200.0, end: 250.0 },
        ]
    );
}

#[test]
fn test_intervals_merge_contained_segment() {
    let idx = index(vec![
        rec("AU", "XYZ", "BHZ", "raw_recording", 0.0, 100.0),
        rec("AU", "XYZ", "BHZ", "raw_recording", 90.0, 200.0),
        rec("AU", "XYZ", "BHZ", "raw_recording", 120.0, 130.0),
    ]);

    let intervals = idx.recording_intervals("AU", "XYZ", "BHZ", "raw_recording");
    assert_eq!(intervals, vec![RecordingInterval { start: 0.0, end: 200.0 }]);
}

#[test]
fn test_intervals_ignore_other_groups() {
    let idx = index(vec![
        rec("AU", "XYZ", "BHZ", "raw_recording", 0.0, 100.0),
        rec("AU", "XYZ", "BHN", "raw_recording", 150.0, 250.0),
        rec("AU", "XYZ", "BHZ", "earthquake", 150.0, 250.0),
    ]);

    let intervals = idx.recording_intervals("AU", "XYZ", "BHZ", "raw_recording");
    assert_eq!(intervals, vec![RecordingInterval { start: 0.0, end: 100.0 }]);
}

#[test]
fn test_intervals_empty_group() {
    let idx = index(vec![rec("AU", "XYZ", "BHZ", "raw_recording", 0.0, 100.0)]);
    assert!(idx
        .recording_intervals("AU", "NOPE", "BHZ", "raw_recording")
        .is_empty());
}

#[test]
fn test_gaps_between_intervals() {
    let idx = index(vec![
        rec("AU", "XYZ", "BHZ", "raw_recording", 0.0, 120.0),
        rec("AU", "XYZ", "BHZ", "raw_recording", 200.0, 250.0),
        rec("AU", "XYZ", "BHZ", "raw_recording", 300.0, 400.0),
    ]);

    let gaps = idx.recording_gaps("AU", "XYZ", "BHZ", "raw_recording");
    assert_eq!(
        gaps,
        vec![
            RecordingInterval { start: 120.0, end: 200.0 },
            RecordingInterval { start: 250.0, end: 300.0 },
        ]
    );
}

#[test]
fn test_gaps_single_interval_is_empty() {
    let idx = index(vec![rec("AU", "XYZ", "BHZ", "raw_recording", 0.0, 100.0)]);
    assert!(idx.recording_gaps("AU", "XYZ", "BHZ", "raw_recording").is_empty());
}

#[test]
fn test_unique_information_scans_full_catalog() {
    let idx = index(vec![
        rec("AU", "XYZ", "BHZ", "raw_recording", 0.0, 100.0),
        rec("AU", "XYZ", "BHN", "raw_recording", 0.0, 100.0),
        rec("OA", "BY22", "HHZ", "earthquake", 0.0, 100.0),
    ]);

    let info = idx.unique_information();
    assert_eq!(
        info.channels.iter().collect::<Vec<_>>(),
        vec!["BHN", "BHZ", "HHZ"]
    );
    assert_eq!(
        info.tags.iter().collect::<Vec<_>>(),
        vec!["earthquake", "raw_recording"]
    );
}

#[test]
fn test_unique_information_empty_catalog() {
    let idx = index(vec![]);
    let info = idx.unique_information();
    assert!(info.channels.is_empty());
    assert!(info.tags.is_empty());
    assert!(idx.query_by_time(&TimeQuery::window(0.0, 1.0e9)).is_empty());
}

#[test]
fn test_net_sta_codes() {
    let idx = index(vec![
        rec("AU", "XYZ", "BHZ", "raw_recording", 0.0, 100.0),
        rec("AU", "XYZ", "BHN", "raw_recording", 0.0, 100.0),
        rec("OA", "BY22", "HHZ", "earthquake", 0.0, 100.0),
    ]);

    assert_eq!(
        idx.net_sta_codes().into_iter().collect::<Vec<_>>(),
        vec!["AU.XYZ", "OA.BY22"]
    );
}

#[test]
fn test_entry_exact_lookup() {
    let record = rec("AU", "XYZ", "BHZ", "raw_recording", 0.0, 100.0);
    let key = record.key.clone();
    let idx = index(vec![record.clone()]);

    assert_eq!(idx.entry(&key).unwrap(), &record);

    let err = idx.entry("AU.XYZ..BHZ__missing__missing__raw").unwrap_err();
    assert!(matches!(err, IndexError::UnknownKey(_)));
}

#[test]
fn test_shrinking_window_shrinks_result() {
    let idx = index(vec![
        rec("AU", "XYZ", "BHZ", "raw_recording", 0.0, 100.0),
        rec("AU", "XYZ", "BHZ", "raw_recording", 150.0, 250.0),
        rec("AU", "XYZ", "BHZ", "raw_recording", 300.0, 400.0),
    ]);

    let wide = idx.query_by_time(&TimeQuery::window(0.0, 500.0));
    let narrow = idx.query_by_time(&TimeQuery::window(120.0, 260.0));
    assert_eq!(wide.len(), 3);
    assert_eq!(narrow.len(), 1);
    for key in narrow.keys() {
        assert!(wide.contains_key(key));
    }
}
