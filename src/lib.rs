//! Workout tracking core: running and cycling sessions logged at map
//! positions, kept in an ordered store and mirrored to key-value storage.

pub mod cli;
pub mod database;
pub mod error;
pub mod render;
pub mod snapshot;
pub mod storage;
pub mod store;
pub mod types;
pub mod utils;

pub use database::SqliteStorage;
pub use error::{PersistenceError, StorageError, StoreError, ValidationError};
pub use storage::{FileStorage, KeyValueStore, MemoryStorage};
pub use store::{RawFields, StoreOptions, WorkoutStore};
pub use types::{Activity, Coords, Workout, WorkoutType};
