use serde::Deserialize;

use super::error::FetchError;
use super::types::{Passthrough, TrackReading, Visibility};
use crate::geo::GeodeticPoint;

#[derive(Debug, Deserialize)]
struct Payload {
    id: u64,
    latitude: f64,
    longitude: f64,
    altitude: f64,
    velocity: f64,
    visibility: Visibility,
    #[serde(flatten)]
    passthrough: Passthrough,
}

/// Decode one position report from the telemetry feed.
pub fn parse_payload(body: &[u8]) -> Result<TrackReading, FetchError> {
    let payload: Payload = serde_json::from_slice(body)
        .map_err(|e| FetchError::MalformedPayload(e.to_string()))?;

    if !payload.latitude.is_finite() || !(-90.0..=90.0).contains(&payload.latitude) {
        return Err(FetchError::MalformedPayload(format!(
            "latitude out of range: {}",
            payload.latitude
        )));
    }
    for (field, value) in [
        ("longitude", payload.longitude),
        ("altitude", payload.altitude),
        ("velocity", payload.velocity),
    ] {
        if !value.is_finite() {
            return Err(FetchError::MalformedPayload(format!(
                "{field} is not finite"
            )));
        }
    }

    Ok(TrackReading {
        id: payload.id,
        position: GeodeticPoint::surface(payload.latitude, payload.longitude),
        altitude_km: payload.altitude,
        velocity_kmh: payload.velocity,
        visibility: payload.visibility,
        passthrough: payload.passthrough,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISS_REPORT: &str = r#"{
        "name": "iss",
        "id": 25544,
        "latitude": 50.11496269845,
        "longitude": 118.07900427317,
        "altitude": 408.05526028199,
        "velocity": 27635.971970874,
        "visibility": "daylight",
        "footprint": 4446.1877699772,
        "timestamp": 1364069476,
        "daynum": 2456375.3411574,
        "solar_lat": 1.3327003598631,
        "solar_lon": 238.78610691196,
        "units": "kilometers"
    }"#;

    #[test]
    fn parses_full_report() {
        let reading = parse_payload(ISS_REPORT.as_bytes()).unwrap();
        assert_eq!(reading.id, 25544);
        assert!((reading.position.latitude_deg() - 50.11496269845).abs() < 1e-12);
        assert!((reading.position.longitude_deg() - 118.07900427317).abs() < 1e-12);
        assert_eq!(reading.position.altitude(), 0.0);
        assert!((reading.altitude_km - 408.05526028199).abs() < 1e-9);
        assert!((reading.velocity_kmh - 27635.971970874).abs() < 1e-9);
        assert_eq!(reading.visibility, Visibility::Daylight);

        let extra = &reading.passthrough;
        assert_eq!(extra.name.as_deref(), Some("iss"));
        assert_eq!(extra.timestamp, Some(1364069476));
        assert_eq!(extra.units.as_deref(), Some("kilometers"));
        assert_eq!(extra.solar_lon, Some(238.78610691196));
        assert!(extra.extra.is_empty());
    }

    #[test]
    fn keeps_unknown_fields_and_tolerates_missing_passthrough() {
        let body = r#"{"id":1,"latitude":-10,"longitude":190,"altitude":400,
            "velocity":27000,"visibility":"eclipsed","source":"test"}"#;
        let reading = parse_payload(body.as_bytes()).unwrap();
        assert_eq!(reading.visibility, Visibility::Eclipsed);
        assert_eq!(reading.position.longitude_deg(), -170.0);
        assert_eq!(reading.passthrough.name, None);
        assert_eq!(
            reading.passthrough.extra.get("source"),
            Some(&serde_json::Value::String("test".into()))
        );
    }

    #[test]
    fn rejects_bad_payloads() {
        for body in [
            "",
            "not json",
            "[]",
            r#"{"id":1,"latitude":0,"longitude":0}"#,
            r#"{"id":1,"latitude":"north","longitude":0,"altitude":1,"velocity":1,"visibility":"daylight"}"#,
            r#"{"id":1,"latitude":91,"longitude":0,"altitude":1,"velocity":1,"visibility":"daylight"}"#,
        ] {
            assert!(
                matches!(parse_payload(body.as_bytes()), Err(FetchError::MalformedPayload(_))),
                "accepted {body:?}"
            );
        }
    }
}
