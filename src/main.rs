#![deny(
    warnings,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::{Context, Result};
use clap::Parser;
use mapty::{
    FileStorage, KeyValueStore, RawFields, SqliteStorage, StoreError, StoreOptions,
    WorkoutStore, cli, render, types::Coords, utils,
};

#[macro_use]
extern crate mapty;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    utils::init_logging(cli.verbose, cli.quiet);
    dlog!("data={} backend={:?}", cli.data.display(), cli.backend);

    let persist_visits = matches!(
        cli.cmd,
        cli::Cmd::Visit {
            persist_visits: true,
            ..
        }
    );
    let options = StoreOptions {
        persist_visits,
        ..StoreOptions::default()
    };

    match cli.backend {
        cli::Backend::File => {
            let storage = FileStorage::open(&cli.data)
                .with_context(|| format!("opening data dir: {}", cli.data.display()))?;
            run(storage, options, cli.cmd)
        }
        cli::Backend::Sqlite => {
            let path = utils::sqlite_path(&cli.data);
            let storage = SqliteStorage::open(&path)
                .with_context(|| format!("opening sqlite db: {}", path.display()))?;
            run(storage, options, cli.cmd)
        }
    }
}

fn run<S: KeyValueStore>(storage: S, options: StoreOptions, cmd: cli::Cmd) -> Result<()> {
    let mut store = WorkoutStore::open(storage, options).context("loading saved workouts")?;

    match cmd {
        cli::Cmd::Add {
            kind,
            lat,
            lng,
            distance,
            duration,
            cadence,
            elevation_gain,
        } => {
            let raw = RawFields {
                distance: Some(distance),
                duration: Some(duration),
                cadence,
                elevation_gain,
            };
            match store.create(kind, Coords::new(lat, lng), &raw) {
                Ok(w) => {
                    println!("{}", render::list_entry(w));
                    println!(
                        "marker {} ({}) {}",
                        w.coords(),
                        render::popup_class(w.kind()),
                        render::marker_popup(w)
                    );
                    Ok(())
                }
                Err(StoreError::Validation(e)) => {
                    tracing::warn!(err = %e, "rejected workout");
                    anyhow::bail!("DATA ENTERED IS NOT VALID");
                }
                Err(e) => Err(e).context("saving workout"),
            }
        }
        cli::Cmd::List { count } => {
            if store.is_empty() {
                println!("No workouts yet.");
                return Ok(());
            }
            for w in store.list().iter().take(count.unwrap_or(usize::MAX)) {
                println!("{}", render::list_entry(w));
            }
            Ok(())
        }
        cli::Cmd::Visit { id, .. } => match store.mark_visited(&id) {
            Ok(w) => {
                println!(
                    "center {} zoom {} ({} visits)",
                    w.coords(),
                    cli::MAP_ZOOM_LEVEL,
                    w.visit_count()
                );
                Ok(())
            }
            Err(StoreError::NotFound(_)) => {
                tracing::warn!(id = %id, "no workout with that id; nothing to do");
                Ok(())
            }
            Err(e) => Err(e).context("saving visit"),
        },
        cli::Cmd::Show { id } => {
            let w = store.find_by_id(&id)?;
            println!("{}", render::list_entry(w));
            println!(
                "  at {}  logged {}  visits {}",
                w.coords(),
                w.created_at().to_rfc3339(),
                w.visit_count()
            );
            Ok(())
        }
        cli::Cmd::Reset => {
            let n = store.len();
            store.clear_all().context("clearing workouts")?;
            println!("Removed {n} workouts.");
            Ok(())
        }
    }
}
