//! Binary entry point: resolve the data directory, start file logging, open
//! the credential database, and drive the Ratatui event loop until the user
//! exits.
use anyhow::Context;
use log::info;
use student_records::logging::init_file_logger;
use student_records::{open_user_db, run_app, App, AppPaths};

fn main() -> anyhow::Result<()> {
    let paths = AppPaths::resolve()?;
    paths.ensure_data_dir()?;
    init_file_logger(&paths.log_file)?;
    info!("using data directory {}", paths.data_dir.display());

    let conn = open_user_db(&paths.user_db).context("failed to open credential database")?;

    let mut app = App::new(conn, paths);
    let result = run_app(&mut app);
    if let Err(err) = &result {
        log::error!("exiting after error: {err:#}");
    }
    result
}
