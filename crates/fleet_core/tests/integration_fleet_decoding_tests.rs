mod support;

use fleet_core::priority::{score, ScoringParams};
use fleet_core::snapshot::{decode_twins, SnapshotProvider, StaticSnapshot};
use fleet_core::spatial::GeoPoint;
use fleet_core::test_helpers::test_now;
use fleet_core::twin::{Health, Risk, DEFAULT_STATUS_CODE};
use support::fleet::fleet;

#[test]
fn every_record_decodes_even_with_garbage_fields() {
    let twins = fleet();
    assert_eq!(twins.len(), 5);

    let garbled = &twins[4];
    assert_eq!(garbled.station_id, "ST005");
    assert_eq!(garbled.location, GeoPoint::new(0.0, 0.0));
    assert_eq!(garbled.signals.status_code, DEFAULT_STATUS_CODE);
    assert_eq!(garbled.signals.traffic_congestion, 0.0);
    assert_eq!(garbled.derived.health, None);
    assert_eq!(garbled.derived.down_prob_6h, 0.0);
    assert_eq!(garbled.meta.output_kw, 0.0);
}

#[test]
fn numeric_strings_are_read_as_numbers() {
    let twins = fleet();
    let riverside = &twins[1];
    assert_eq!(riverside.location, GeoPoint::new(37.55, 126.95));
    assert_eq!(riverside.signals.status_code, 5);
    assert_eq!(riverside.signals.traffic_congestion, 0.2);
    assert_eq!(riverside.derived.down_prob_6h, 0.4);
    assert_eq!(riverside.meta.output_kw, 100.0);
}

#[test]
fn labels_and_timestamps() {
    let twins = fleet();
    assert_eq!(twins[0].derived.health, Some(Health::Down));
    assert_eq!(twins[0].derived.risk, Some(Risk::Alert));
    assert!(twins[0].last_update().is_some());
    // Present but malformed timestamps decode and parse to nothing.
    assert_eq!(twins[2].signals.stat_upd_dt.as_deref(), Some("bad"));
    assert!(twins[2].last_update().is_none());
}

#[test]
fn snapshots_share_one_decoded_fleet() {
    let provider = StaticSnapshot::new(fleet());
    let a = provider.snapshot().expect("snapshot");
    let b = provider.snapshot().expect("snapshot");
    assert_eq!(a.len(), 5);
    assert_eq!(a.twins(), b.twins());
}

#[test]
fn unreadable_section_keeps_the_record_and_its_down_label() {
    let text = r#"[
      {"stationId":"A","chargerId":"01","lat":37.5,"lon":127.0,
       "signals":"oops","derived":{"health":"DOWN","downProb6h":0.6}},
      {"stationId":"B","chargerId":"01","lat":37.6,"lon":127.1,
       "signals":{"statusCode":2}}
    ]"#;
    let twins = decode_twins(text).expect("decodes");
    let ids: Vec<&str> = twins.iter().map(|t| t.station_id.as_str()).collect();
    assert_eq!(ids, ["A", "B"]);

    let candidates = score(&twins, &ScoringParams::default(), test_now());
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].station_id, "A");
    assert_eq!(candidates[0].status_code, DEFAULT_STATUS_CODE);
    assert_eq!(candidates[0].down_minutes, None);
}

#[test]
fn recomputed_state_drives_scoring() {
    let text = r#"[
      {"stationId":"A","chargerId":"01","lat":37.5,"lon":127.0,
       "signals":{"statusCode":4,"trafficSpeed":6,"statUpdDt":"20260114110000"},
       "derived":{"health":"OK","downProb6h":0.0}},
      {"stationId":"B","chargerId":"01","lat":37.6,"lon":127.1,
       "signals":{"statusCode":2},"derived":{"health":"DOWN"}}
    ]"#;
    let mut twins = decode_twins(text).expect("decodes");
    twins.iter_mut().for_each(|t| t.recompute_derived());

    assert_eq!(twins[0].signals.traffic_congestion, 0.8);
    assert_eq!(twins[0].derived.health, Some(Health::Down));
    assert_eq!(twins[1].derived.health, Some(Health::Ok));

    // Only A is down once the shipped labels are replaced.
    let candidates = score(&twins, &ScoringParams::default(), test_now());
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].station_id, "A");
    assert_eq!(candidates[0].down_prob_6h, 0.686);
    assert_eq!(candidates[0].traffic_congestion, 0.8);
}
