use crate::dlog;
use crate::error::{Result, StoreError, ValidationError};
use crate::snapshot;
use crate::storage::KeyValueStore;
use crate::types::{Coords, Workout, WorkoutType};
use chrono::{DateTime, Utc};

/// Storage key the snapshot lives under.
pub const DEFAULT_KEY: &str = "workouts";

#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub key: String,
    /// Re-save the snapshot after every visit so counts survive a reload.
    pub persist_visits: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            key: DEFAULT_KEY.to_string(),
            persist_visits: false,
        }
    }
}

/// Raw form values as typed by the user.
///
/// Text is read the way a browser coerces a form field to a number: an
/// empty field counts as `0`, `0x`/`0o`/`0b` prefixes read as integers, and
/// anything unparsable (or missing) as NaN.
#[derive(Debug, Clone, Default)]
pub struct RawFields {
    pub distance: Option<String>,
    pub duration: Option<String>,
    pub cadence: Option<String>,
    pub elevation_gain: Option<String>,
}

impl RawFields {
    #[must_use]
    pub fn distance(mut self, v: impl Into<String>) -> Self {
        self.distance = Some(v.into());
        self
    }

    #[must_use]
    pub fn duration(mut self, v: impl Into<String>) -> Self {
        self.duration = Some(v.into());
        self
    }

    #[must_use]
    pub fn cadence(mut self, v: impl Into<String>) -> Self {
        self.cadence = Some(v.into());
        self
    }

    #[must_use]
    pub fn elevation_gain(mut self, v: impl Into<String>) -> Self {
        self.elevation_gain = Some(v.into());
        self
    }
}

fn coerce(raw: Option<&str>) -> f64 {
    let Some(s) = raw else {
        return f64::NAN;
    };
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }

    // Unsigned `0x`/`0o`/`0b` integers, as a browser reads them.
    let radix = match s.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &s[2..];
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return f64::NAN;
        }
        return u128::from_str_radix(digits, radix).map_or(f64::NAN, |n| n as f64);
    }

    // `f64::from_str` also takes "inf"/"nan" spellings; those are never
    // valid input, so only decimal notation gets through.
    let decimal = s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !decimal {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

struct Checked {
    distance: f64,
    duration: f64,
    /// cadence or elevation gain
    extra: f64,
}

fn validate(kind: WorkoutType, raw: &RawFields) -> Result<Checked, ValidationError> {
    let distance = coerce(raw.distance.as_deref());
    let duration = coerce(raw.duration.as_deref());

    let mut bad = Vec::new();
    let positive = |v: f64| v.is_finite() && v > 0.0;
    if !positive(distance) {
        bad.push("distance");
    }
    if !positive(duration) {
        bad.push("duration");
    }

    let extra = match kind {
        WorkoutType::Running => {
            let cadence = coerce(raw.cadence.as_deref());
            if !positive(cadence) {
                bad.push("cadence");
            }
            cadence
        }
        // Any finite gain, negative included.
        WorkoutType::Cycling => {
            let gain = coerce(raw.elevation_gain.as_deref());
            if !gain.is_finite() {
                bad.push("elevation_gain");
            }
            gain
        }
    };

    if bad.is_empty() {
        Ok(Checked {
            distance,
            duration,
            extra,
        })
    } else {
        Err(ValidationError::InvalidFields { kind, fields: bad })
    }
}

/// Hands out millisecond-timestamp ids, strictly increasing within a session.
#[derive(Debug, Default)]
struct IdIssuer {
    last: u64,
}

impl IdIssuer {
    fn next(&mut self, now: DateTime<Utc>) -> String {
        let ms = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        self.last = ms.max(self.last.saturating_add(1));
        self.last.to_string()
    }

    fn seed<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        for id in ids {
            if let Ok(n) = id.parse::<u64>() {
                self.last = self.last.max(n);
            }
        }
    }
}

/// The ordered, authoritative list of workouts and its bridge to storage.
pub struct WorkoutStore<S> {
    storage: S,
    options: StoreOptions,
    workouts: Vec<Workout>,
    ids: IdIssuer,
    clock: fn() -> DateTime<Utc>,
}

impl<S: KeyValueStore> WorkoutStore<S> {
    /// Empty store; nothing is read from storage.
    pub fn new(storage: S, options: StoreOptions) -> Self {
        Self {
            storage,
            options,
            workouts: Vec::new(),
            ids: IdIssuer::default(),
            clock: Utc::now,
        }
    }

    /// Startup path: build the store and replay the persisted snapshot.
    pub fn open(storage: S, options: StoreOptions) -> Result<Self> {
        let mut store = Self::new(storage, options);
        store.load_snapshot()?;
        Ok(store)
    }

    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Validate, build, append and persist a new workout.
    ///
    /// Nothing is appended when validation fails. When persisting fails the
    /// new workout is dropped again, so memory never runs ahead of storage.
    pub fn create(
        &mut self,
        kind: WorkoutType,
        coords: Coords,
        raw: &RawFields,
    ) -> Result<&Workout> {
        let checked = validate(kind, raw)?;

        let now = (self.clock)();
        let id = self.ids.next(now);
        let workout = match kind {
            WorkoutType::Running => Workout::running(
                id,
                coords,
                checked.distance,
                checked.duration,
                checked.extra,
                now,
            ),
            WorkoutType::Cycling => Workout::cycling(
                id,
                coords,
                checked.distance,
                checked.duration,
                checked.extra,
                now,
            ),
        };

        let idx = self.workouts.len();
        self.workouts.push(workout);
        if let Err(e) = self.save_snapshot() {
            self.workouts.pop();
            tracing::error!(err = %e, "could not persist new workout; discarded");
            return Err(e);
        }

        let w = &self.workouts[idx];
        tracing::info!(id = %w.id(), kind = %kind, coords = %w.coords(), "workout created");
        Ok(w)
    }

    /// Like [`Self::create`], with the type given as text (`"running"`, `"cycling"`).
    pub fn create_from_str(
        &mut self,
        kind: &str,
        coords: Coords,
        raw: &RawFields,
    ) -> Result<&Workout> {
        let kind = kind
            .parse::<WorkoutType>()
            .map_err(|e| ValidationError::UnknownType(e.0))?;
        self.create(kind, coords, raw)
    }

    pub fn find_by_id(&self, id: &str) -> Result<&Workout> {
        self.workouts
            .iter()
            .find(|w| w.id() == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Bump the visit counter of `id`.
    ///
    /// With `persist_visits` on, a failed save reverts the counter.
    pub fn mark_visited(&mut self, id: &str) -> Result<&Workout> {
        let Some(idx) = self.workouts.iter().position(|w| w.id() == id) else {
            tracing::warn!(id = %id, "mark_visited: no workout with that id");
            return Err(StoreError::NotFound(id.to_string()));
        };

        let before = self.workouts[idx].clone();
        self.workouts[idx].mark_visited();
        if self.options.persist_visits
            && let Err(e) = self.save_snapshot()
        {
            self.workouts[idx] = before;
            tracing::error!(err = %e, id = %id, "could not persist visit; reverted");
            return Err(e);
        }

        let w = &self.workouts[idx];
        dlog!("visited id={} visit_count={}", w.id(), w.visit_count());
        Ok(w)
    }

    /// Creation order, which is also render order.
    pub fn list(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Overwrite the stored snapshot with the full in-memory list.
    pub fn save_snapshot(&mut self) -> Result<()> {
        let encoded = snapshot::encode(&self.workouts)?;
        self.storage.set_item(&self.options.key, &encoded)?;
        dlog!(
            "snapshot_saved key={} workouts={} bytes={}",
            self.options.key,
            self.workouts.len(),
            encoded.len()
        );
        Ok(())
    }

    /// Replace the in-memory list with the stored snapshot.
    ///
    /// A missing snapshot yields an empty list. On a decode failure the
    /// in-memory list is left as it was.
    pub fn load_snapshot(&mut self) -> Result<usize> {
        let loaded = match self.storage.get_item(&self.options.key)? {
            Some(raw) => snapshot::decode(&raw)?,
            None => Vec::new(),
        };

        self.ids.seed(loaded.iter().map(Workout::id));
        self.workouts = loaded;
        tracing::info!(key = %self.options.key, workouts = self.workouts.len(), "snapshot loaded");
        Ok(self.workouts.len())
    }

    /// Drop every workout, in memory and in storage.
    pub fn clear_all(&mut self) -> Result<()> {
        self.storage.remove_item(&self.options.key)?;
        let dropped = self.workouts.len();
        self.workouts.clear();
        tracing::info!(key = %self.options.key, dropped, "all workouts cleared");
        Ok(())
    }
}
