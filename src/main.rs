mod config;
mod db;
mod error;
mod logging;
mod models;
mod report;
mod run;
mod search;
mod ui;

use anyhow::Result;

fn main() -> Result<()> {
    let mut args: Vec<String> = std::env::args().collect();
    let config = config::Config::resolve(&mut args)?;
    logging::init(&config.log_path);

    let mut db = db::Database::open(&config.db_path)?;

    match args.len() {
        1 => run::as_tui(&mut db),
        2.. => run::as_cli(&args, &mut db),
        _ => {
            eprintln!("Usage: stocktui [--db <path>] [command]");
            Ok(())
        }
    }
}
