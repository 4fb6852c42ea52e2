use fleet_core::snapshot::decode_twins;
use fleet_core::twin::Twin;

/// A small mixed fleet in the feed's JSON shape: two hard-down units, one
/// unit flagged DOWN only through derived health, one healthy unit and one
/// record with garbage numerics.
pub const FLEET_JSON: &str = r#"[
  {
    "stationId": "ST001", "chargerId": "01", "name": "City Hall",
    "lat": 37.50, "lon": 127.00,
    "signals": {"statusCode": 4, "trafficCongestion": 0.5, "statUpdDt": "20260114052000"},
    "derived": {"health": "DOWN", "risk": "ALERT", "downProb6h": 0.9},
    "meta": {"output": "50"}
  },
  {
    "stationId": "ST002", "chargerId": "02", "name": "Riverside",
    "lat": "37.55", "lon": "126.95",
    "signals": {"statusCode": "5", "trafficCongestion": "0.2", "statUpdDt": "20260114113000"},
    "derived": {"downProb6h": "0.4"},
    "meta": {"output": "100"}
  },
  {
    "stationId": "ST003", "chargerId": "01", "name": "Market",
    "lat": 37.58, "lon": 127.02,
    "signals": {"statusCode": 2, "statUpdDt": "bad"},
    "derived": {"health": "DOWN", "downProb6h": 0.7},
    "meta": {"output": 7}
  },
  {
    "stationId": "ST004", "chargerId": "01", "name": "Healthy",
    "lat": 37.60, "lon": 127.05,
    "signals": {"statusCode": 2},
    "derived": {"health": "OK", "risk": "NONE"}
  },
  {
    "stationId": "ST005", "chargerId": "03", "name": "Garbled",
    "lat": null, "lon": [1],
    "signals": {"statusCode": "x", "trafficCongestion": "high"},
    "derived": {"health": "SOMETHING", "downProb6h": {}},
    "meta": null
  }
]"#;

pub fn fleet() -> Vec<Twin> {
    decode_twins(FLEET_JSON).expect("fixture decodes")
}
