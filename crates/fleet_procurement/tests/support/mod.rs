#![allow(dead_code)]

use fleet_core::snapshot::decode_twins;
use fleet_core::twin::Twin;
use fleet_procurement::ProviderProfile;

/// Twelve units across Seoul, in the feed's JSON shape.
pub const POOL_JSON: &str = r#"[
  {"stationId":"P01","chargerId":"01","lat":37.5796,"lon":126.9770},
  {"stationId":"P02","chargerId":"01","lat":37.5512,"lon":126.9882},
  {"stationId":"P03","chargerId":"02","lat":37.5172,"lon":127.0473},
  {"stationId":"P04","chargerId":"01","lat":37.4979,"lon":127.0276},
  {"stationId":"P05","chargerId":"01","lat":37.5563,"lon":126.9236},
  {"stationId":"P06","chargerId":"03","lat":37.6543,"lon":127.0568},
  {"stationId":"P07","chargerId":"01","lat":37.5145,"lon":127.1059},
  {"stationId":"P08","chargerId":"01","lat":37.4837,"lon":126.9015},
  {"stationId":"P09","chargerId":"02","lat":37.6106,"lon":126.9296},
  {"stationId":"P10","chargerId":"01","lat":37.5407,"lon":127.0697},
  {"stationId":"P11","chargerId":"01","lat":37.5665,"lon":126.9780},
  {"stationId":"P12","chargerId":"01","lat":37.4563,"lon":126.7052}
]"#;

pub const PROVIDERS_JSON: &str = r#"[
  {"name":"CentralCare","base":{"lat":37.5665,"lon":126.9780},"remote_recovery_rate":0.35,"sla_minutes":60,"crews":4},
  {"name":"SouthGrid","base":{"lat":37.4979,"lon":127.0276},"remote_recovery_rate":0.55,"sla_minutes":45},
  {"name":"FarAway","base":{"lat":35.1796,"lon":129.0756},"remote_recovery_rate":0.10,"sla_minutes":60}
]"#;

pub fn pool() -> Vec<Twin> {
    decode_twins(POOL_JSON).expect("pool fixture decodes")
}

pub fn providers() -> Vec<ProviderProfile> {
    serde_json::from_str(PROVIDERS_JSON).expect("provider fixture decodes")
}
