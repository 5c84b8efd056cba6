//! Binary entry point: resolve the data directory, start logging, make sure the
//! article table exists, then hand control to the Ratatui event loop.
use towermourne_kb::{ensure_schema, logging, run_app, App, Config};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.ensure_data_dir()?;
    logging::init(&config.log_path)?;
    info!(db = %config.db_path.display(), "starting knowledge base");

    let conn = ensure_schema(&config.db_path)?;
    let mut app = App::new(conn)?;
    run_app(&mut app)
}
