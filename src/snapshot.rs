//! Snapshot encoding of the workout list.
//!
//! Current form is `{"version": 1, "workouts": [...]}`. The bare array the
//! browser app used to write is still accepted on read.

use crate::error::PersistenceError;
use crate::types::Workout;
use serde::{Deserialize, Serialize};

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct Envelope<'a> {
    version: u32,
    workouts: &'a [Workout],
}

#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

#[derive(Deserialize)]
struct StoredEnvelope {
    workouts: Vec<Workout>,
}

pub fn encode(workouts: &[Workout]) -> Result<String, PersistenceError> {
    serde_json::to_string(&Envelope {
        version: SNAPSHOT_VERSION,
        workouts,
    })
    .map_err(PersistenceError::Encode)
}

/// Decodes either snapshot form. Stored derived fields are taken as-is.
pub fn decode(raw: &str) -> Result<Vec<Workout>, PersistenceError> {
    let trimmed = raw.trim();
    // `JSON.parse` of a cleared slot gives null; treat like a missing blob.
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).map_err(PersistenceError::Decode);
    }

    // Check the version before committing to a record layout.
    let probe: VersionProbe = serde_json::from_str(trimmed).map_err(PersistenceError::Decode)?;
    if probe.version != SNAPSHOT_VERSION {
        return Err(PersistenceError::UnsupportedVersion(probe.version));
    }
    let envelope: StoredEnvelope =
        serde_json::from_str(trimmed).map_err(PersistenceError::Decode)?;
    Ok(envelope.workouts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Activity, Coords};
    use chrono::{TimeZone, Utc};
    use serde_json::{Value, json};

    fn sample() -> Vec<Workout> {
        let at = Utc.with_ymd_and_hms(2024, 4, 14, 9, 30, 0).unwrap();
        let coords = Coords::new(42.0, 50.0);
        let mut run = Workout::running("1713087000000".into(), coords, 5.0, 25.0, 180.0, at);
        run.mark_visited();
        let coords = Coords::new(52.0, 100.0);
        let ride = Workout::cycling("1713087000001".into(), coords, 20.0, 60.0, -10.0, at);
        vec![run, ride]
    }

    #[test]
    fn encodes_flat_records_in_order() {
        let encoded = encode(&sample()).unwrap();
        let v: Value = serde_json::from_str(&encoded).unwrap();

        assert_eq!(v["version"], json!(1));
        let first = &v["workouts"][0];
        assert_eq!(first["type"], json!("running"));
        assert_eq!(first["id"], json!("1713087000000"));
        assert_eq!(first["coords"], json!([42.0, 50.0]));
        assert_eq!(first["pace"], json!(5.0));
        assert_eq!(first["cadence"], json!(180.0));
        assert_eq!(first["visitCount"], json!(1));
        assert_eq!(first["createdAt"], json!("2024-04-14T09:30:00Z"));

        let second = &v["workouts"][1];
        assert_eq!(second["type"], json!("cycling"));
        assert_eq!(second["elevationGain"], json!(-10.0));
        assert!(second.get("pace").is_none());
    }

    #[test]
    fn decode_restores_what_encode_wrote() {
        let workouts = sample();
        let back = decode(&encode(&workouts).unwrap()).unwrap();
        assert_eq!(back, workouts);
    }

    #[test]
    fn decodes_legacy_browser_array() {
        let raw = r#"[{"date":"2024-04-14T09:30:00.000Z","id":"3087000000","clicks":2,
            "coords":[42,50],"distance":5,"duration":25,"type":"running","cadence":180,
            "pace":5,"description":"Running on April 14"},
            {"date":"2024-04-15T09:30:00.000Z","id":"3087000001","clicks":0,
            "coords":[52,100],"distance":20,"duration":60,"type":"cycling",
            "elevationgain":-10,"speed":0.3333333333333333,"description":"Cycling on April 15"}]"#;

        let workouts = decode(raw).unwrap();
        assert_eq!(workouts.len(), 2);
        assert_eq!(workouts[0].visit_count(), 2);
        assert_eq!(workouts[0].description(), "Running on April 14");
        assert_eq!(
            workouts[1].activity(),
            &Activity::Cycling {
                elevation_gain: -10.0,
                speed: 0.333_333_333_333_333_3
            }
        );
    }

    #[test]
    fn stored_derived_fields_are_trusted() {
        let raw = r#"{"version":1,"workouts":[{"id":"1","coords":[0,0],"distance":10,
            "duration":10,"createdAt":"2024-01-01T00:00:00Z","description":"hand edited",
            "type":"running","cadence":170,"pace":99}]}"#;

        let workouts = decode(raw).unwrap();
        assert_eq!(workouts[0].metric(), 99.0);
        assert_eq!(workouts[0].description(), "hand edited");
        assert_eq!(workouts[0].visit_count(), 0);
    }

    #[test]
    fn empty_and_null_are_empty_lists() {
        assert!(decode("").unwrap().is_empty());
        assert!(decode("null").unwrap().is_empty());
        assert!(decode("[]").unwrap().is_empty());
    }

    #[test]
    fn rejects_future_versions_and_garbage() {
        let err = decode(r#"{"version":7,"workouts":[]}"#).unwrap_err();
        assert!(matches!(err, PersistenceError::UnsupportedVersion(7)));

        let err = decode("{not json").unwrap_err();
        assert!(matches!(err, PersistenceError::Decode(_)));

        let err = decode(r#"[{"id":"1","type":"swimming"}]"#).unwrap_err();
        assert!(matches!(err, PersistenceError::Decode(_)));
    }
}
