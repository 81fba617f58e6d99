//! Terminal client entry point.
mod app;
mod config;
mod input;
mod logging;
mod messages;
mod presentation;

use anyhow::Result;
use app::CliApp;
use config::CliConfig;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = CliConfig::from_env();

    // Keep the guard alive so buffered file logs are flushed on exit.
    let _guard = logging::init(config.engine.debug, config.log_dir.as_deref())?;

    CliApp::new(config).run()
}
