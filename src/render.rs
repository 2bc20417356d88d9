//! Plain-text rendering of workouts for list entries and map popups.

use crate::types::{Activity, Workout, WorkoutType};

pub const fn icon(kind: WorkoutType) -> &'static str {
    match kind {
        WorkoutType::Running => "🏃‍♂️",
        WorkoutType::Cycling => "🚴‍♀️",
    }
}

/// CSS-style class name of the marker popup.
pub fn popup_class(kind: WorkoutType) -> String {
    format!("{kind}-popup")
}

/// Popup text shown on the map marker.
pub fn marker_popup(w: &Workout) -> String {
    format!("{} {}", icon(w.kind()), w.description())
}

/// One list entry: title line, then distance, duration and the variant fields.
pub fn list_entry(w: &Workout) -> String {
    let mut out = format!(
        "[{}] {}\n  {} {} km  ⏱ {} min",
        w.id(),
        w.description(),
        icon(w.kind()),
        num(w.distance()),
        num(w.duration())
    );

    match w.activity() {
        Activity::Running { cadence, pace } => {
            out.push_str(&format!("  ⚡️ {pace:.1} min/km  🦶🏼 {} spm", num(*cadence)));
        }
        Activity::Cycling {
            elevation_gain,
            speed,
        } => {
            out.push_str(&format!("  ⚡️ {speed:.1} km/h  ⛰ {} m", num(*elevation_gain)));
        }
    }
    out
}

/// Shortest form of a user-entered number: `5` rather than `5.0`.
pub fn num(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        format!("{v}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coords;
    use chrono::{TimeZone, Utc};

    fn at() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 14, 12, 0, 0).unwrap()
    }

    #[test]
    fn running_entry_shows_pace_and_cadence() {
        let w = Workout::running("7".into(), Coords::new(42.0, 50.0), 5.0, 27.0, 180.0, at());
        let entry = list_entry(&w);

        assert!(entry.starts_with(&format!("[7] {}\n", w.description())));
        assert!(entry.contains("🏃‍♂️ 5 km"));
        assert!(entry.contains("⏱ 27 min"));
        assert!(entry.contains("5.4 min/km"));
        assert!(entry.contains("180 spm"));
        assert!(!entry.contains("km/h"));
    }

    #[test]
    fn cycling_entry_shows_speed_and_elevation() {
        let w = Workout::cycling("8".into(), Coords::new(52.0, 100.0), 20.0, 60.0, -10.5, at());
        let entry = list_entry(&w);

        assert!(entry.contains("🚴‍♀️ 20 km"));
        assert!(entry.contains("0.3 km/h"));
        assert!(entry.contains("-10.5 m"));
        assert!(!entry.contains("spm"));
    }

    #[test]
    fn popup_text_and_class() {
        let w = Workout::cycling("8".into(), Coords::new(0.0, 0.0), 1.0, 1.0, 0.0, at());
        assert_eq!(marker_popup(&w), format!("🚴‍♀️ {}", w.description()));
        assert_eq!(popup_class(WorkoutType::Running), "running-popup");
        assert_eq!(popup_class(w.kind()), "cycling-popup");
    }

    #[test]
    fn num_drops_trailing_zero() {
        assert_eq!(num(5.0), "5");
        assert_eq!(num(5.25), "5.25");
        assert_eq!(num(-10.0), "-10");
    }
}
