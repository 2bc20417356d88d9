use crate::types::WorkoutType;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const DEFAULT_DATA_DIR: &str = "mapty-data";

/// Zoom level the map recenters at when a workout is selected.
pub const MAP_ZOOM_LEVEL: u8 = 13;

#[derive(Parser, Debug)]
#[command(
    name = "mapty",
    about = "Log running and cycling workouts at map positions and keep them on disk"
)]
pub struct Cli {
    /// Data directory holding the workout snapshot.
    #[arg(long, env = "MAPTY_DATA", default_value = DEFAULT_DATA_DIR, global = true)]
    pub data: PathBuf,

    /// Storage backend for the snapshot.
    #[arg(long, value_enum, default_value_t = Backend::File, global = true)]
    pub backend: Backend,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq). Defaults to INFO.
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// `<data>/workouts.json`
    File,
    /// `<data>/mapty.sqlite3`
    Sqlite,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Log a workout at a map position.
    Add {
        #[arg(value_enum)]
        kind: WorkoutType,

        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lng: f64,

        /// km
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        distance: String,

        /// minutes
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        duration: String,

        /// steps/min (running)
        #[arg(long, allow_hyphen_values = true)]
        cadence: Option<String>,

        /// meters (cycling)
        #[arg(long, allow_hyphen_values = true)]
        elevation_gain: Option<String>,
    },

    /// List workouts in the order they were logged.
    List {
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Select a workout: bump its visit counter and print where to center the map.
    Visit {
        id: String,

        /// Save the new visit count right away.
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        persist_visits: bool,
    },

    /// Show a single workout.
    Show { id: String },

    /// Delete every workout.
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_add_with_negative_numbers() {
        let cli = Cli::try_parse_from([
            "mapty", "add", "cycling", "--lat", "-33.9", "--lng", "18.4", "--distance", "20",
            "--duration", "60", "--elevation-gain", "-10",
        ])
        .unwrap();

        match cli.cmd {
            Cmd::Add {
                kind,
                lat,
                elevation_gain,
                cadence,
                ..
            } => {
                assert_eq!(kind, WorkoutType::Cycling);
                assert_eq!(lat, -33.9);
                assert_eq!(elevation_gain.as_deref(), Some("-10"));
                assert_eq!(cadence, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.backend, Backend::File);
    }

    #[test]
    fn visit_persists_by_default() {
        let cli = Cli::try_parse_from(["mapty", "--backend", "sqlite", "visit", "123"]).unwrap();
        assert_eq!(cli.backend, Backend::Sqlite);
        assert!(matches!(
            cli.cmd,
            Cmd::Visit { ref id, persist_visits: true } if id == "123"
        ));

        let cli = Cli::try_parse_from(["mapty", "visit", "123", "--persist-visits", "false"]).unwrap();
        assert!(matches!(cli.cmd, Cmd::Visit { persist_visits: false, .. }));
    }
}
