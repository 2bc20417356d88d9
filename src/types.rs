use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A map position in degrees. Stored as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for Coords {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coords> for [f64; 2] {
    fn from(c: Coords) -> Self {
        [c.lat, c.lng]
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum WorkoutType {
    Running,
    Cycling,
}

impl WorkoutType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Cycling => "cycling",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Cycling => "Cycling",
        }
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown workout type: {0:?}")]
pub struct UnknownWorkoutType(pub String);

impl FromStr for WorkoutType {
    type Err = UnknownWorkoutType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("running") {
            Ok(Self::Running)
        } else if s.eq_ignore_ascii_case("cycling") {
            Ok(Self::Cycling)
        } else {
            Err(UnknownWorkoutType(s.to_string()))
        }
    }
}

/// Variant-specific part of a workout, tagged by `type` in the flat record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Activity {
    Running {
        /// steps/min
        cadence: f64,
        /// min/km
        pace: f64,
    },
    Cycling {
        #[serde(rename = "elevationGain", alias = "elevationgain")]
        elevation_gain: f64,
        speed: f64,
    },
}

impl Activity {
    pub const fn kind(&self) -> WorkoutType {
        match self {
            Self::Running { .. } => WorkoutType::Running,
            Self::Cycling { .. } => WorkoutType::Cycling,
        }
    }

    /// Pace for running, speed for cycling.
    pub const fn metric(&self) -> f64 {
        match self {
            Self::Running { pace, .. } => *pace,
            Self::Cycling { speed, .. } => *speed,
        }
    }
}

/// One logged session.
///
/// Everything except `visit_count` is fixed at construction. The derived
/// metric and the description are computed once and carried verbatim
/// through snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    id: String,
    coords: Coords,
    distance: f64,
    duration: f64,
    #[serde(alias = "date")]
    created_at: DateTime<Utc>,
    description: String,
    #[serde(default, alias = "clicks")]
    visit_count: u64,
    #[serde(flatten)]
    activity: Activity,
}

impl Workout {
    /// Build a running workout. Inputs are expected to be validated already.
    pub fn running(
        id: String,
        coords: Coords,
        distance: f64,
        duration: f64,
        cadence: f64,
        created_at: DateTime<Utc>,
    ) -> Self {
        let activity = Activity::Running {
            cadence,
            pace: duration / distance,
        };
        Self::build(id, coords, distance, duration, created_at, activity)
    }

    /// Build a cycling workout. Inputs are expected to be validated already.
    pub fn cycling(
        id: String,
        coords: Coords,
        distance: f64,
        duration: f64,
        elevation_gain: f64,
        created_at: DateTime<Utc>,
    ) -> Self {
        let activity = Activity::Cycling {
            elevation_gain,
            speed: distance / duration,
        };
        Self::build(id, coords, distance, duration, created_at, activity)
    }

    fn build(
        id: String,
        coords: Coords,
        distance: f64,
        duration: f64,
        created_at: DateTime<Utc>,
        activity: Activity,
    ) -> Self {
        let local_day = created_at.with_timezone(&Local).date_naive();
        let description = describe(activity.kind(), local_day);
        Self {
            id,
            coords,
            distance,
            duration,
            created_at,
            description,
            visit_count: 0,
            activity,
        }
    }

    pub const fn mark_visited(&mut self) {
        self.visit_count = self.visit_count.saturating_add(1);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub const fn coords(&self) -> Coords {
        self.coords
    }

    /// km
    pub const fn distance(&self) -> f64 {
        self.distance
    }

    /// minutes
    pub const fn duration(&self) -> f64 {
        self.duration
    }

    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub const fn visit_count(&self) -> u64 {
        self.visit_count
    }

    pub const fn activity(&self) -> &Activity {
        &self.activity
    }

    pub const fn kind(&self) -> WorkoutType {
        self.activity.kind()
    }

    pub const fn metric(&self) -> f64 {
        self.activity.metric()
    }
}

/// `"{Type} on {Month} {Day}"`, e.g. `"Running on April 14"`.
pub fn describe(kind: WorkoutType, date: NaiveDate) -> String {
    let month = MONTHS[date.month0() as usize];
    format!("{} on {month} {}", kind.label(), date.day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 14, 12, 0, 0).unwrap()
    }

    #[test]
    fn running_pace_is_duration_over_distance() {
        let w = Workout::running("1".into(), Coords::new(42.0, 50.0), 5.0, 25.0, 180.0, at());
        assert_eq!(w.metric(), 25.0 / 5.0);
        assert_eq!(w.kind(), WorkoutType::Running);
        assert_eq!(
            w.activity(),
            &Activity::Running {
                cadence: 180.0,
                pace: 5.0
            }
        );
    }

    #[test]
    fn cycling_speed_is_distance_over_duration() {
        let w = Workout::cycling("2".into(), Coords::new(52.0, 100.0), 20.0, 60.0, -10.0, at());
        assert_eq!(w.metric(), 20.0 / 60.0);
        assert!((w.metric() - 0.333).abs() < 1e-3);
    }

    #[test]
    fn description_uses_local_month_and_day() {
        let w = Workout::running("1".into(), Coords::new(0.0, 0.0), 1.0, 1.0, 1.0, at());
        let day = at().with_timezone(&Local).date_naive();
        assert_eq!(w.description(), describe(WorkoutType::Running, day));
    }

    #[test]
    fn describe_formats_month_names() {
        let d = NaiveDate::from_ymd_opt(2024, 4, 14).unwrap();
        assert_eq!(describe(WorkoutType::Running, d), "Running on April 14");
        let d = NaiveDate::from_ymd_opt(2023, 12, 1).unwrap();
        assert_eq!(describe(WorkoutType::Cycling, d), "Cycling on December 1");
    }

    #[test]
    fn mark_visited_counts_up() {
        let mut w = Workout::running("1".into(), Coords::new(0.0, 0.0), 1.0, 1.0, 1.0, at());
        assert_eq!(w.visit_count(), 0);
        w.mark_visited();
        w.mark_visited();
        assert_eq!(w.visit_count(), 2);
    }

    #[test]
    fn workout_type_parses_loosely() {
        assert_eq!(" Running ".parse::<WorkoutType>(), Ok(WorkoutType::Running));
        assert_eq!("CYCLING".parse::<WorkoutType>(), Ok(WorkoutType::Cycling));
        assert!("swimming".parse::<WorkoutType>().is_err());
    }

    #[test]
    fn coords_serialize_as_pair() {
        let json = serde_json::to_string(&Coords::new(42.5, -1.25)).unwrap();
        assert_eq!(json, "[42.5,-1.25]");
    }
}
