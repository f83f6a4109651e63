// Copyright 2023 Remi Bernotavicius

use clap::Parser;
use std::path::PathBuf;

mod database;
mod query;
mod shopping_list;
mod ui;

type Error = Box<dyn std::error::Error + Send + Sync + 'static>;
type Result<T> = std::result::Result<T, Error>;

#[derive(Parser, Debug)]
struct Args {
    /// Use this database file instead of the one in the user data directory.
    #[arg(long)]
    database: Option<PathBuf>,
}

/// This is where the database lives on-disk. On Linux it should be like:
/// `~/.local/share/meal_planner/`
fn data_path() -> Result<PathBuf> {
    let dirs = directories::BaseDirs::new().expect("failed to get user home directory");
    let path = dirs.data_dir().join("meal_planner");
    std::fs::create_dir_all(&path)?;
    Ok(path)
}

fn main() -> Result<()> {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()?;

    let args = Args::parse();
    let database_path = match args.database {
        Some(path) => path,
        None => data_path()?.join("meals.sqlite"),
    };
    log::info!("using database at {}", database_path.display());

    let conn = database::establish_connection(database_path)?;
    ui::run(conn)
}
