mod categorize;
mod config;
mod db;
mod export;
mod models;
mod run;
mod stats;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let config = config::Config::load()?;
    tracing::debug!(db = %config.db_path.display(), user = %config.user_id, "starting");
    let mut db = db::Database::open(&config.db_path)?;

    run::as_cli(&args, &mut db, &config)
}

/// Logs go to stderr so report output on stdout stays clean. `RUST_LOG` overrides the default.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("areabudget=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
